//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("sumgen")
        .about("Sum type code generator for Go")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(typescript_command())
        .subcommand(shapes_command())
        .subcommand(runtime_command())
}

/// Generate unions, matchers, reducers and JSON codecs.
pub fn generate_command() -> Command {
    Command::new("generate")
        .visible_alias("gen")
        .about("Generate sum type code for annotated Go files")
        .override_usage(
            "\
  sumgen generate <FILE>...
  sumgen generate <FILE> -o <PATH>
  sumgen generate <FILE> --name <UNION> --variants <A,B,...>",
        )
        .after_help(
            r#"EXAMPLES:
  sumgen generate shapes.go                          # writes shapes_union_gen.go
  sumgen generate a.go b.go --skip json              # no JSON codecs
  sumgen generate shapes.go -n Shape -v Circle,Rect  # ignore annotations
  sumgen generate shapes.go --stdout                 # print instead of writing"#,
        )
        .arg(files_arg())
        .arg(output_arg())
        .arg(name_arg())
        .arg(variants_arg())
        .arg(package_arg())
        .arg(skip_arg())
        .arg(runtime_import_arg())
        .arg(stdout_arg())
        .arg(color_arg())
}

/// Print TypeScript definitions for a Go file.
pub fn typescript_command() -> Command {
    Command::new("typescript")
        .visible_alias("ts")
        .about("Print TypeScript definitions matching the JSON wire format")
        .after_help(
            r#"EXAMPLES:
  sumgen typescript shapes.go
  sumgen typescript shapes.go --no-export"#,
        )
        .arg(file_arg())
        .arg(no_export_arg())
        .arg(no_enum_guards_arg())
        .arg(color_arg())
}

/// Dump inferred shapes as JSON.
pub fn shapes_command() -> Command {
    Command::new("shapes")
        .about("Print inferred shapes as JSON")
        .after_help(
            r#"EXAMPLES:
  sumgen shapes shapes.go
  sumgen shapes shapes.go --pretty | jq '.unions[].name'"#,
        )
        .arg(file_arg())
        .arg(pretty_arg())
        .arg(color_arg())
}

/// Write the Go runtime package.
pub fn runtime_command() -> Command {
    Command::new("runtime")
        .about("Print or write the Go runtime package generated codecs import")
        .after_help(
            r#"EXAMPLES:
  sumgen runtime                                                # print to stdout
  sumgen runtime internal/sumrt --runtime-import example.com/app/internal/sumrt"#,
        )
        .arg(dir_arg())
        .arg(runtime_import_arg())
}
