use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use sumgen_compiler::generate::runtime_source;

use super::exit_code;
use crate::error::CliError;

/// File name of the runtime source inside its package directory.
pub const RUNTIME_FILE: &str = "json.go";

pub struct RuntimeArgs {
    pub dir: Option<PathBuf>,
    pub runtime_import: String,
}

pub fn run(args: RuntimeArgs) -> ExitCode {
    exit_code(execute(&args, &mut io::stdout().lock()))
}

/// Write the Go runtime package generated codecs import.
///
/// The package clause follows the last segment of `--runtime-import`, so
/// the output drops into the directory that import path names.
pub(crate) fn execute(args: &RuntimeArgs, out: &mut dyn Write) -> Result<bool, CliError> {
    let text = runtime_source(&args.runtime_import);
    let Some(dir) = &args.dir else {
        out.write_all(text.as_bytes())?;
        return Ok(true);
    };

    let target = dir.join(RUNTIME_FILE);
    std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::write(&target, text))
        .map_err(|source| CliError::Write {
            path: target.clone(),
            source,
        })?;
    tracing::info!(path = %target.display(), "wrote runtime package");
    Ok(true)
}
