//! Turn clap matches into the typed argument structs each command runs on.
//!
//! `*Params` structs mirror the command `*Args` but are populated from clap;
//! the `Into<*Args>` impls resolve choices like `--color auto`.

use std::path::PathBuf;

use clap::ArgMatches;
use sumgen_compiler::Skip;
use sumgen_compiler::generate::DEFAULT_RUNTIME_IMPORT;

use super::ColorChoice;
use crate::commands::generate::GenerateArgs;
use crate::commands::runtime::RuntimeArgs;
use crate::commands::shapes::ShapesArgs;
use crate::commands::typescript::TypescriptArgs;

pub struct GenerateParams {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub variants: Vec<String>,
    pub package: Option<String>,
    pub skip: Skip,
    pub runtime_import: Option<String>,
    pub stdout: bool,
    pub color: ColorChoice,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            files: m
                .get_many::<PathBuf>("files")
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
            output: m.get_one::<PathBuf>("output").cloned(),
            name: m.get_one::<String>("name").cloned(),
            variants: m
                .get_many::<String>("variants")
                .map(|v| v.filter(|s| !s.is_empty()).cloned().collect())
                .unwrap_or_default(),
            package: m.get_one::<String>("package").cloned(),
            skip: parse_skip(m),
            runtime_import: m.get_one::<String>("runtime_import").cloned(),
            stdout: m.get_flag("stdout"),
            color: parse_color(m),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            files: p.files,
            output: p.output,
            union: p.name.map(|name| (name, p.variants)),
            package: p.package,
            skip: p.skip,
            runtime_import: p.runtime_import,
            stdout: p.stdout,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TypescriptParams {
    pub file: PathBuf,
    pub export: bool,
    pub enum_guards: bool,
    pub color: ColorChoice,
}

impl TypescriptParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().unwrap_or_default(),
            export: !m.get_flag("no_export"),
            enum_guards: !m.get_flag("no_enum_guards"),
            color: parse_color(m),
        }
    }
}

impl From<TypescriptParams> for TypescriptArgs {
    fn from(p: TypescriptParams) -> Self {
        Self {
            file: p.file,
            export: p.export,
            enum_guards: p.enum_guards,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ShapesParams {
    pub file: PathBuf,
    pub pretty: bool,
    pub color: ColorChoice,
}

impl ShapesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().unwrap_or_default(),
            pretty: m.get_flag("pretty"),
            color: parse_color(m),
        }
    }
}

impl From<ShapesParams> for ShapesArgs {
    fn from(p: ShapesParams) -> Self {
        Self {
            file: p.file,
            pretty: p.pretty,
            color: p.color.should_colorize(),
        }
    }
}

pub struct RuntimeParams {
    pub dir: Option<PathBuf>,
    pub runtime_import: Option<String>,
}

impl RuntimeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            dir: m.get_one::<PathBuf>("dir").cloned(),
            runtime_import: m.get_one::<String>("runtime_import").cloned(),
        }
    }
}

impl From<RuntimeParams> for RuntimeArgs {
    fn from(p: RuntimeParams) -> Self {
        Self {
            dir: p.dir,
            runtime_import: p
                .runtime_import
                .unwrap_or_else(|| DEFAULT_RUNTIME_IMPORT.to_string()),
        }
    }
}

fn parse_skip(m: &ArgMatches) -> Skip {
    let mut skip = Skip::default();
    for name in m.get_many::<String>("skip").into_iter().flatten() {
        match name.as_str() {
            "json" => skip.json = true,
            "reducer" => skip.reducer = true,
            "match" => skip.matching = true,
            _ => {}
        }
    }
    skip
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
