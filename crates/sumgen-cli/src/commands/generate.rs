use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use sumgen_compiler::{Config, GeneratedFile, Generator, Skip};
use sumgen_core::ShapeCache;

use super::{exit_code, render_diagnostics, render_error};
use crate::error::CliError;

pub struct GenerateArgs {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    /// Explicit union name and variant names.
    pub union: Option<(String, Vec<String>)>,
    pub package: Option<String>,
    pub skip: Skip,
    pub runtime_import: Option<String>,
    pub stdout: bool,
    pub color: bool,
}

impl GenerateArgs {
    pub fn config(&self) -> Config {
        let mut config = Config::new().skip(self.skip);
        if let Some((name, variants)) = &self.union {
            config = config.explicit_union(name, variants);
        }
        if let Some(package) = &self.package {
            config = config.package(package);
        }
        if let Some(import) = &self.runtime_import {
            config = config.runtime_import(import);
        }
        config
    }
}

pub fn run(args: GenerateArgs) -> ExitCode {
    let result = execute(
        &args,
        ShapeCache::global(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    exit_code(result)
}

/// Generate every input file, writing output files (or `out`) and
/// rendering diagnostics to `err`. Returns whether no file had errors.
pub(crate) fn execute(
    args: &GenerateArgs,
    cache: &ShapeCache,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool, CliError> {
    if args.output.is_some() && args.files.len() != 1 {
        return Err(CliError::OutputWithManyFiles(args.files.len()));
    }

    let generator = Generator::new(args.config()).with_cache(cache);
    let results = generate_all(&generator, &args.files);

    let mut ok = true;
    for (path, result) in args.files.iter().zip(results) {
        let file = match result {
            Ok(file) => file,
            Err(e) => {
                write!(err, "{}", render_error(path, &e, args.color))?;
                ok = false;
                continue;
            }
        };

        if !file.diagnostics.is_empty() {
            let rendered = render_diagnostics(path, &file.diagnostics, &file.source, args.color);
            write!(err, "{rendered}")?;
        }
        ok &= !file.diagnostics.has_errors();

        if file.is_empty() {
            tracing::info!(path = %path.display(), "nothing to generate");
            continue;
        }
        if args.stdout {
            out.write_all(file.text.as_bytes())?;
            continue;
        }
        write_output(args, &file)?;
    }

    Ok(ok)
}

/// One result per file, in input order. Files share the generator's cache.
fn generate_all(
    generator: &Generator<'_>,
    files: &[PathBuf],
) -> Vec<sumgen_compiler::Result<GeneratedFile>> {
    if let [file] = files {
        return vec![generator.generate_file(file)];
    }

    thread::scope(|s| {
        let handles: Vec<_> = files
            .iter()
            .map(|path| s.spawn(move || generator.generate_file(path)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

fn write_output(args: &GenerateArgs, file: &GeneratedFile) -> Result<(), CliError> {
    let Some(target) = args.output.clone().or_else(|| file.default_output_path()) else {
        tracing::warn!("no output path for in-memory source");
        return Ok(());
    };
    std::fs::write(&target, &file.text).map_err(|source| CliError::Write {
        path: target.clone(),
        source,
    })?;
    tracing::info!(path = %target.display(), package = %file.package, "wrote generated code");
    Ok(())
}
