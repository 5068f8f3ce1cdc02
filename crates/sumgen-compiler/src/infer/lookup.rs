//! Cross-package shape resolution over a shared `ShapeCache`.

use std::path::Path;
use std::sync::Arc;

use sumgen_core::{RefName, Shape, ShapeCache};

use super::{InferOptions, InferredInfo, infer_file};
use crate::source::GoModule;

/// The reference's package has no source directory we can read.
#[derive(Debug, thiserror::Error)]
#[error("no declaration for {0}")]
pub struct NotFound(String);

pub struct ShapeLookup<'c> {
    cache: &'c ShapeCache,
    module: Option<GoModule>,
    options: InferOptions,
}

impl<'c> ShapeLookup<'c> {
    pub fn new(cache: &'c ShapeCache) -> Self {
        Self {
            cache,
            module: None,
            options: InferOptions::default(),
        }
    }

    /// Module used to map import paths to package directories.
    pub fn module(mut self, module: Option<GoModule>) -> Self {
        self.module = module;
        self
    }

    pub fn options(mut self, options: InferOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cache(&self) -> &'c ShapeCache {
        self.cache
    }

    /// Store every declaration and union of an inferred file.
    pub fn register(&self, info: &InferredInfo) {
        for shape in info.retrieve_shapes() {
            if let Some(full_name) = shape.full_name() {
                self.cache.insert(full_name, shape);
            }
        }
        if !info.pkg_import_name.is_empty() {
            self.cache.mark_package_loaded(&info.pkg_import_name);
        }
    }

    /// The declaration a reference names, loading its package on first use.
    pub fn lookup_ref(&self, reference: &RefName) -> Option<Arc<Shape>> {
        let full_name = reference.full_name();
        let loaded = self.cache.get_or_try_insert_with(&full_name, || {
            self.load_package(&reference.pkg_import_name);
            // The package load stores what it finds; hand back that entry.
            self.cache
                .get(&full_name)
                .map(|shape| Shape::clone(&shape))
                .ok_or_else(|| NotFound(full_name.clone()))
        });

        match loaded {
            Ok(shape) => Some(shape),
            Err(err) => {
                tracing::debug!("{err}");
                None
            }
        }
    }

    fn load_package(&self, import_path: &str) {
        if import_path.is_empty() || !self.cache.mark_package_loaded(import_path) {
            return;
        }
        let Some(dir) = self.module.as_ref().and_then(|m| m.package_dir(import_path)) else {
            tracing::debug!(import_path, "package outside the module, not loaded");
            return;
        };
        self.load_dir(&dir, import_path);
    }

    #[tracing::instrument(level = "debug", skip(self), fields(dir = %dir.display()))]
    fn load_dir(&self, dir: &Path, import_path: &str) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("cannot read package directory {}: {err}", dir.display());
                return;
            }
        };

        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| is_package_source(p))
            .collect();
        files.sort();

        let options = self.options.clone().pkg_import_name(import_path);
        for file in files {
            match infer_file(&file, &options) {
                Ok(info) => {
                    for shape in info.retrieve_shapes() {
                        if let Some(full_name) = shape.full_name() {
                            self.cache.insert(full_name, shape);
                        }
                    }
                }
                Err(err) => tracing::warn!("skipping {}: {err}", file.display()),
            }
        }
    }
}

/// Non-test `.go` files.
fn is_package_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file() && name.ends_with(".go") && !name.ends_with("_test.go")
}
