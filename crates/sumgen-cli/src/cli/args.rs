//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that commands compose.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Go source files to generate from (positional, one or more).
pub fn files_arg() -> Arg {
    Arg::new("files")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .num_args(1..)
        .required(true)
        .help("Go source files")
}

/// Single Go source file (positional).
pub fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Go source file")
}

/// Target package directory (positional, optional).
pub fn dir_arg() -> Arg {
    Arg::new("dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Package directory to write into (default: print to stdout)")
}

/// Output path (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("Output file (default: <file>_union_gen.go next to the input)")
}

/// Union name for explicit mode (--name).
pub fn name_arg() -> Arg {
    Arg::new("name")
        .short('n')
        .long("name")
        .value_name("UNION")
        .requires("variants")
        .help("Union name; variants come from --variants instead of annotations")
}

/// Variant names for explicit mode (--variants).
pub fn variants_arg() -> Arg {
    Arg::new("variants")
        .short('v')
        .long("variants")
        .value_name("NAMES")
        .value_delimiter(',')
        .requires("name")
        .help("Comma-separated variant names, in order")
}

/// Package clause override (--package).
pub fn package_arg() -> Arg {
    Arg::new("package")
        .short('p')
        .long("package")
        .value_name("NAME")
        .help("Package name of the generated file")
}

/// Generators to leave out (--skip).
pub fn skip_arg() -> Arg {
    Arg::new("skip")
        .long("skip")
        .value_name("GENERATORS")
        .value_delimiter(',')
        .value_parser(["json", "reducer", "match"])
        .help("Generators to skip (comma-separated: json, reducer, match)")
}

/// Import path of the Go runtime package (--runtime-import).
pub fn runtime_import_arg() -> Arg {
    Arg::new("runtime_import")
        .long("runtime-import")
        .value_name("PATH")
        .help("Import path of the runtime package")
}

/// Print to stdout instead of writing files (--stdout).
pub fn stdout_arg() -> Arg {
    Arg::new("stdout")
        .long("stdout")
        .action(ArgAction::SetTrue)
        .conflicts_with("output")
        .help("Print generated code instead of writing files")
}

/// Omit the `export` keyword (--no-export).
pub fn no_export_arg() -> Arg {
    Arg::new("no_export")
        .long("no-export")
        .action(ArgAction::SetTrue)
        .help("Do not export generated types")
}

/// Keep enum-guarded fields as plain strings (--no-enum-guards).
pub fn no_enum_guards_arg() -> Arg {
    Arg::new("no_enum_guards")
        .long("no-enum-guards")
        .action(ArgAction::SetTrue)
        .help("Render enum-guarded fields as string")
}

/// Pretty-print JSON output (--pretty).
pub fn pretty_arg() -> Arg {
    Arg::new("pretty")
        .long("pretty")
        .action(ArgAction::SetTrue)
        .help("Pretty-print JSON")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}
