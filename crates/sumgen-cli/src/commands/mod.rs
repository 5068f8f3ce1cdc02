pub mod generate;
pub mod runtime;
pub mod shapes;
pub mod typescript;

#[cfg(test)]
mod inspect_tests;
#[cfg(test)]
mod runtime_tests;

use std::path::Path;
use std::process::ExitCode;

use sumgen_compiler::{Diagnostics, Error};

use crate::error::CliError;

/// Render diagnostics against the file they were reported for.
pub(crate) fn render_diagnostics(path: &Path, diagnostics: &Diagnostics, source: &str, color: bool) -> String {
    let name = path.display().to_string();
    diagnostics.printer(source).path(&name).colored(color).render()
}

/// Render a per-file failure. Parse errors are shown against the source.
pub(crate) fn render_error(path: &Path, err: &Error, color: bool) -> String {
    match err {
        Error::Parse(diagnostics) => {
            let source = std::fs::read_to_string(path).unwrap_or_default();
            render_diagnostics(path, diagnostics, &source, color)
        }
        other => format!("error: {other}\n"),
    }
}

pub(crate) fn exit_code(result: Result<bool, CliError>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
