use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use sumgen_compiler::typegen::typescript;
use sumgen_compiler::{InferOptions, infer_file};

use super::{exit_code, render_diagnostics, render_error};
use crate::error::CliError;

pub struct TypescriptArgs {
    pub file: PathBuf,
    pub export: bool,
    pub enum_guards: bool,
    pub color: bool,
}

pub fn run(args: TypescriptArgs) -> ExitCode {
    exit_code(execute(&args, &mut io::stdout().lock(), &mut io::stderr().lock()))
}

pub(crate) fn execute(
    args: &TypescriptArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool, CliError> {
    let info = match infer_file(&args.file, &InferOptions::new()) {
        Ok(info) => info,
        Err(e) => {
            write!(err, "{}", render_error(&args.file, &e, args.color))?;
            return Ok(false);
        }
    };

    if !info.diagnostics.is_empty() {
        let source = std::fs::read_to_string(&args.file).unwrap_or_default();
        write!(
            err,
            "{}",
            render_diagnostics(&args.file, &info.diagnostics, &source, args.color)
        )?;
    }

    let config = typescript::Config::new()
        .export(args.export)
        .enum_guards(args.enum_guards);
    out.write_all(typescript::emit_with_config(&info, config).as_bytes())?;

    Ok(!info.diagnostics.has_errors())
}
