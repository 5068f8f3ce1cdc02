use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use sumgen_compiler::{InferOptions, infer_file};

use super::{exit_code, render_error};
use crate::error::CliError;

pub struct ShapesArgs {
    pub file: PathBuf,
    pub pretty: bool,
    pub color: bool,
}

pub fn run(args: ShapesArgs) -> ExitCode {
    exit_code(execute(&args, &mut io::stdout().lock(), &mut io::stderr().lock()))
}

/// Print the file's inferred shapes, unions and matches as JSON.
///
/// Inference diagnostics are not rendered; the dump is for tooling.
pub(crate) fn execute(args: &ShapesArgs, out: &mut dyn Write, err: &mut dyn Write) -> Result<bool, CliError> {
    let info = match infer_file(&args.file, &InferOptions::new()) {
        Ok(info) => info,
        Err(e) => {
            write!(err, "{}", render_error(&args.file, &e, args.color))?;
            return Ok(false);
        }
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &info)?;
    } else {
        serde_json::to_writer(&mut *out, &info)?;
    }
    writeln!(out)?;

    Ok(true)
}
