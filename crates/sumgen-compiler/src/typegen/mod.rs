//! Type definitions for other languages, generated from inferred shapes.

pub mod typescript;
