//! sumgen compiler: Go declaration inference and code generation.
//!
//! This crate provides the generation pipeline:
//! - `source` - Go parsing (tree-sitter) and module discovery
//! - `infer` - declarations to shapes, union and match grouping
//! - `generate` - union, match, reducer and JSON codec emitters
//! - `render` - Go file assembly and imports
//! - `typegen` - TypeScript type generation
//! - `diagnostics` - error reporting
//! - `pipeline` - parse → infer → generate → render

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod generate;
pub mod infer;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod typegen;

#[cfg(test)]
pub mod test_utils;

use std::path::PathBuf;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity, Span};
pub use infer::{InferOptions, InferredInfo, ShapeLookup, infer_file, infer_source};
pub use pipeline::{Config, GeneratedFile, Generator, Skip};
pub use render::GoFile;

/// Errors that stop processing of a whole file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Go grammar could not be loaded into the parser.
    #[error("failed to load Go grammar: {0}")]
    Language(String),

    #[error("Go parsing failed with {} errors", .0.error_count())]
    Parse(Diagnostics),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
