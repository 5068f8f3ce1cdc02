//! TypeScript definitions matching the JSON wire format.
//!
//! Structs become interfaces keyed by their JSON field names, aliases become
//! type aliases, and unions become a union of `{"$type": ..., "<pkg>.<V>": V}`
//! wrappers.

mod config;
mod emitter;
mod render;

#[cfg(test)]
mod typescript_tests;

pub use config::Config;
pub use emitter::Emitter;

use crate::infer::InferredInfo;

/// Emit TypeScript for every declaration and union of a file.
pub fn emit(info: &InferredInfo) -> String {
    Emitter::new(info, Config::default()).emit()
}

/// Emit TypeScript with a custom configuration.
pub fn emit_with_config(info: &InferredInfo, config: Config) -> String {
    Emitter::new(info, config).emit()
}
