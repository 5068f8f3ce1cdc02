use std::path::PathBuf;

/// Failures that stop a command before or after per-file processing.
///
/// Per-file problems are rendered diagnostics, not errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("--output takes a single input file, got {0}")]
    OutputWithManyFiles(usize),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize shapes: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Stdio(#[from] std::io::Error),
}
