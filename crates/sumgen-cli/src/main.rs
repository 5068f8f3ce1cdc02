#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use cli::{GenerateParams, RuntimeParams, ShapesParams, TypescriptParams, build_cli};

fn main() -> ExitCode {
    logging::init();
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("generate", m)) => {
            let params = GenerateParams::from_matches(m);
            commands::generate::run(params.into())
        }
        Some(("typescript", m)) => {
            let params = TypescriptParams::from_matches(m);
            commands::typescript::run(params.into())
        }
        Some(("shapes", m)) => {
            let params = ShapesParams::from_matches(m);
            commands::shapes::run(params.into())
        }
        Some(("runtime", m)) => {
            let params = RuntimeParams::from_matches(m);
            commands::runtime::run(params.into())
        }
        _ => unreachable!("clap should have caught this"),
    }
}
