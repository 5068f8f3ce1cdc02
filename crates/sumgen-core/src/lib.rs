#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for sumgen.
//!
//! - `shape` - the closed Shape model describing Go declarations
//! - `visit` - the exhaustive visitor primitive and operations derived from it
//! - `tags` - `key:"value,opt"` annotation parsing
//! - `guard` - validation guards carried on struct fields
//! - `cases` - match declarations (case tuples)
//! - `recursion` - child-reference analysis shared by reducers
//! - `cache` - process-wide shape lookup cache

pub mod cache;
pub mod cases;
pub mod error;
pub mod guard;
pub mod recursion;
pub mod shape;
pub mod tags;
pub mod utils;
pub mod visit;

pub use cache::ShapeCache;
pub use cases::{MatchCase, MatchDecl};
pub use error::ConfigError;
pub use guard::Guard;
pub use recursion::{ChildKind, ChildRef, child_refs, is_recursive};
pub use shape::{
    AliasLike, FieldLike, ListLike, MapLike, NumberKind, PointerLike, PrimitiveKind,
    PrimitiveLike, RefName, Shape, StructLike, TypeParam, UnionLike,
};
pub use tags::{Tag, TagExtractor, Tags, parse_tags};
pub use visit::{GoTypeOptions, ImportSet, ShapeVisitor};

#[cfg(test)]
mod utils_tests;
