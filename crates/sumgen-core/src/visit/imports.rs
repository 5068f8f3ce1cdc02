use std::collections::BTreeMap;

use crate::shape::{
    AliasLike, ListLike, MapLike, PointerLike, PrimitiveLike, RefName, StructLike, UnionLike,
};

use super::ShapeVisitor;
use crate::utils::last_path_segment;

/// Go imports, keyed by import path and sorted by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    by_path: BTreeMap<String, String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` under package name `name`. The first name seen for a path wins.
    pub fn add(&mut self, name: impl Into<String>, path: impl Into<String>) {
        let path = path.into();
        if path.is_empty() {
            return;
        }
        self.by_path.entry(path).or_insert_with(|| name.into());
    }

    pub fn merge(&mut self, other: &ImportSet) {
        for (path, name) in &other.by_path {
            self.add(name.clone(), path.clone());
        }
    }

    pub fn remove(&mut self, path: &str) {
        self.by_path.remove(path);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// `(name, path)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_path
            .iter()
            .map(|(path, name)| (name.as_str(), path.as_str()))
    }

    /// The explicit alias needed for `path`, if its package name differs
    /// from the last path segment.
    pub fn alias_for(&self, path: &str) -> Option<&str> {
        let name = self.by_path.get(path)?;
        (name != last_path_segment(path)).then_some(name.as_str())
    }
}

/// Collects the imports a rendering of a shape requires.
pub struct ImportCollector {
    current_import: String,
    imports: ImportSet,
}

impl ImportCollector {
    pub fn new(current_import: impl Into<String>) -> Self {
        Self {
            current_import: current_import.into(),
            imports: ImportSet::new(),
        }
    }

    pub fn finish(self) -> ImportSet {
        self.imports
    }

    fn named(&mut self, pkg_name: &str, import: &str) {
        if pkg_name.is_empty() || import.is_empty() || import == self.current_import {
            return;
        }
        self.imports.add(pkg_name, import);
    }
}

impl ShapeVisitor for ImportCollector {
    type Output = ();

    fn visit_any(&mut self) {}

    fn visit_ref_name(&mut self, x: &RefName) {
        self.named(&x.pkg_name, &x.pkg_import_name);
        for arg in &x.indexed {
            arg.accept(self);
        }
    }

    fn visit_alias_like(&mut self, x: &AliasLike) {
        self.named(&x.pkg_name, &x.pkg_import_name);
    }

    fn visit_primitive_like(&mut self, _: &PrimitiveLike) {}

    fn visit_list_like(&mut self, x: &ListLike) {
        x.element.accept(self);
    }

    fn visit_map_like(&mut self, x: &MapLike) {
        x.key.accept(self);
        x.value.accept(self);
    }

    fn visit_pointer_like(&mut self, x: &PointerLike) {
        x.inner.accept(self);
    }

    fn visit_struct_like(&mut self, x: &StructLike) {
        self.named(&x.pkg_name, &x.pkg_import_name);
    }

    fn visit_union_like(&mut self, x: &UnionLike) {
        self.named(&x.pkg_name, &x.pkg_import_name);
    }
}
