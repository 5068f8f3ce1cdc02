#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime counterpart of the generated Go code.
//!
//! Works over dynamic [`Value`]s described by `sumgen-core` shapes:
//! - `codec` - the `$type`-discriminated JSON wire format
//! - `registry` - named shapes and custom codecs by fully-qualified name
//! - `carrier` - the one-of carrier and per-variant dispatch
//! - `matching` - case-tuple matching from match declarations
//! - `arena` / `reduce` - depth-first and breadth-first reducers over
//!   structurally shared trees

pub mod arena;
pub mod carrier;
pub mod codec;
pub mod error;
pub mod matching;
pub mod reduce;
pub mod registry;
pub mod value;

#[cfg(test)]
mod test_utils;

pub use arena::{Arena, NodeId};
pub use carrier::{Cases, OneOf};
pub use codec::JsonCodec;
pub use error::{CodecError, MatchError, ReduceError};
pub use matching::CaseMatcher;
pub use reduce::{
    DefaultReduction, Reducer, Step, reduce_breadth_first, reduce_depth_first,
};
pub use registry::{CustomCodec, Registry};
pub use value::{Record, Value};
