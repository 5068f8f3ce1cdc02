//! Inference: Go declarations to shapes.
//!
//! Walks one file's syntax tree, converts every struct, alias and defined
//! type into a `Shape`, and groups `mkunion`-annotated declarations into
//! unions and `mkmatch`-annotated interfaces into match declarations.

mod decls;
mod lookup;
mod types;

#[cfg(test)]
mod infer_tests;

pub use lookup::ShapeLookup;

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use sumgen_core::{MatchDecl, Shape, StructLike, TagExtractor, Tags, UnionLike};

use crate::diagnostics::{Diagnostics, Span};
use crate::source::{GoSource, find_module};
use crate::{Error, Result};

/// Tag key marking a union group, and the file-level option switch.
pub const UNION_TAG: &str = "mkunion";
/// Tag key marking a match declaration.
pub const MATCH_TAG: &str = "mkmatch";
/// Tag key requesting a JSON codec for a plain struct.
pub const SERDE_TAG: &str = "serde";

#[derive(Debug, Clone, Default)]
pub struct InferOptions {
    pub(crate) tags: TagExtractor,
    pub(crate) pkg_import_name: Option<String>,
}

impl InferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment prefix marking tag lines (default `//go:tag `).
    pub fn tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tags = self.tags.prefix(prefix);
        self
    }

    /// Import path of the package being inferred, skipping `go.mod` discovery.
    pub fn pkg_import_name(mut self, path: impl Into<String>) -> Self {
        self.pkg_import_name = Some(path.into());
        self
    }
}

/// Everything inferred from one Go file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InferredInfo {
    pub pkg_name: String,
    pub pkg_import_name: String,
    /// Local package name → import path.
    pub imports: IndexMap<String, String>,
    pub file_tags: Tags,
    /// Struct, alias and defined-type declarations by name.
    pub shapes: IndexMap<String, Shape>,
    pub unions: Vec<UnionLike>,
    pub matches: Vec<MatchDecl>,
    #[serde(skip)]
    pub(crate) decl_spans: HashMap<String, Span>,
    #[serde(skip)]
    pub(crate) union_spans: HashMap<String, Span>,
    #[serde(skip)]
    pub(crate) match_spans: HashMap<String, Span>,
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

impl InferredInfo {
    pub fn retrieve_union(&self, name: &str) -> Option<&UnionLike> {
        self.unions.iter().find(|u| u.name == name)
    }

    pub fn retrieve_struct(&self, name: &str) -> Option<&StructLike> {
        self.shapes.get(name).and_then(Shape::as_struct)
    }

    pub fn retrieve_match(&self, name: &str) -> Option<&MatchDecl> {
        self.matches.iter().find(|m| m.name == name)
    }

    /// Every declaration shape, then every union, in source order.
    pub fn retrieve_shapes(&self) -> Vec<Shape> {
        self.shapes
            .values()
            .cloned()
            .chain(self.unions.iter().cloned().map(Shape::UnionLike))
            .collect()
    }

    pub fn decl_span(&self, name: &str) -> Span {
        self.decl_spans.get(name).copied().unwrap_or_default()
    }

    pub fn union_span(&self, name: &str) -> Span {
        self.union_spans
            .get(name)
            .copied()
            .unwrap_or_else(|| self.decl_span(name))
    }

    pub fn match_span(&self, name: &str) -> Span {
        self.match_spans.get(name).copied().unwrap_or_default()
    }

    /// False when the file opts out with `mkunion:",no-type-registry"`.
    pub fn has_type_registry(&self) -> bool {
        !self
            .file_tags
            .get(UNION_TAG)
            .is_some_and(|t| t.has_option("no-type-registry"))
    }
}

/// Infer shapes from in-memory Go source.
#[tracing::instrument(level = "debug", skip_all)]
pub fn infer_source(text: &str, options: &InferOptions) -> Result<InferredInfo> {
    let source = GoSource::parse(text)?;
    let import = options.pkg_import_name.clone().unwrap_or_default();
    Ok(decls::Inferrer::new(&source, options, import).run())
}

/// Infer shapes from a Go file, resolving its import path from `go.mod`.
#[tracing::instrument(level = "debug", skip(options), fields(path = %path.display()))]
pub fn infer_file(path: &Path, options: &InferOptions) -> Result<InferredInfo> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut options = options.clone();
    if options.pkg_import_name.is_none() {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        match find_module(dir).and_then(|m| m.import_path(dir)) {
            Some(import) => options.pkg_import_name = Some(import),
            None => tracing::debug!("no go.mod above {}, import path left empty", dir.display()),
        }
    }

    infer_source(&text, &options)
}
