//! Process-wide shape lookup cache keyed by fully-qualified name.
//!
//! The cache is an injected service: code that resolves cross-package
//! references takes a `&ShapeCache`. The CLI uses `ShapeCache::global()`,
//! tests build fresh instances.

use std::sync::{Arc, LazyLock};

use dashmap::{DashMap, DashSet};

use crate::shape::Shape;

#[derive(Debug, Default)]
pub struct ShapeCache {
    shapes: DashMap<String, Arc<Shape>>,
    packages: DashSet<String>,
}

static GLOBAL: LazyLock<ShapeCache> = LazyLock::new(ShapeCache::new);

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static ShapeCache {
        &GLOBAL
    }

    pub fn get(&self, full_name: &str) -> Option<Arc<Shape>> {
        self.shapes.get(full_name).map(|s| Arc::clone(s.value()))
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.shapes.contains_key(full_name)
    }

    /// Store a shape unless one is already present; returns the stored one.
    pub fn insert(&self, full_name: impl Into<String>, shape: Shape) -> Arc<Shape> {
        let entry = self
            .shapes
            .entry(full_name.into())
            .or_insert_with(|| Arc::new(shape));
        Arc::clone(entry.value())
    }

    /// Load-or-create. `load` runs without holding a shard lock, so it may
    /// consult the cache itself; when two loaders race, the first stored
    /// value wins and both callers observe it.
    pub fn get_or_try_insert_with<E>(
        &self,
        full_name: &str,
        load: impl FnOnce() -> Result<Shape, E>,
    ) -> Result<Arc<Shape>, E> {
        if let Some(found) = self.get(full_name) {
            return Ok(found);
        }
        let shape = load()?;
        Ok(self.insert(full_name, shape))
    }

    /// Record that a package's shapes were loaded. Returns `false` if it
    /// already was.
    pub fn mark_package_loaded(&self, import_path: &str) -> bool {
        self.packages.insert(import_path.to_string())
    }

    pub fn is_package_loaded(&self, import_path: &str) -> bool {
        self.packages.contains(import_path)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
