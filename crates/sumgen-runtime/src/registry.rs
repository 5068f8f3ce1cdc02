//! Named shapes and custom codecs, keyed by fully-qualified Go name.
//!
//! The runtime mirror of the process-wide registry the generated `init`
//! functions populate.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use sumgen_core::{Shape, UnionLike};

use crate::codec::JsonCodec;
use crate::error::CodecError;
use crate::value::Value;

/// Hand-written encoding for one named type. Takes precedence over the
/// shape the type is registered with.
pub trait CustomCodec: Send + Sync {
    fn encode(&self, codec: &JsonCodec<'_>, value: &Value) -> Result<serde_json::Value, CodecError>;
    fn decode(&self, codec: &JsonCodec<'_>, json: &serde_json::Value) -> Result<Value, CodecError>;
}

#[derive(Default)]
pub struct Registry {
    shapes: IndexMap<String, Shape>,
    codecs: HashMap<String, Box<dyn CustomCodec>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named shape. A union also registers its variants.
    ///
    /// The first registration of a name wins; unnamed shapes are ignored.
    pub fn register(&mut self, shape: Shape) -> bool {
        let Some(full_name) = shape.full_name() else {
            return false;
        };
        if let Shape::UnionLike(union) = &shape {
            for variant in &union.variants {
                self.register(variant.clone());
            }
        }
        if self.shapes.contains_key(&full_name) {
            return false;
        }
        tracing::debug!(name = %full_name, "registered shape");
        self.shapes.insert(full_name, shape);
        true
    }

    pub fn register_all(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        for shape in shapes {
            self.register(shape);
        }
    }

    pub fn register_codec(&mut self, full_name: impl Into<String>, codec: impl CustomCodec + 'static) {
        self.codecs.insert(full_name.into(), Box::new(codec));
    }

    pub fn shape(&self, full_name: &str) -> Option<&Shape> {
        self.shapes.get(full_name)
    }

    pub fn union(&self, full_name: &str) -> Option<&UnionLike> {
        self.shape(full_name).and_then(Shape::as_union)
    }

    pub fn codec(&self, full_name: &str) -> Option<&dyn CustomCodec> {
        self.codecs.get(full_name).map(|c| c.as_ref())
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.shapes.contains_key(full_name) || self.codecs.contains_key(full_name)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Registered shape names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codecs: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        codecs.sort_unstable();
        f.debug_struct("Registry")
            .field("shapes", &self.shapes.keys().collect::<Vec<_>>())
            .field("codecs", &codecs)
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
