//! Go code generators: union dispatch, match functions, reducers, JSON codecs.
//!
//! Each generator writes one `Generated` body plus the imports it needs.
//! Assembly into a file is done by `render::GoFile`.

mod json;
mod matching;
mod reducer;
mod runtime;
mod union;

#[cfg(test)]
mod reducer_tests;

pub use json::{JsonGenerator, StructCodec};
pub use matching::MatchGenerator;
pub use reducer::ReducerGenerator;
pub use runtime::{RUNTIME_FUNCS, RUNTIME_SOURCE, runtime_source};
pub use union::UnionGenerator;

use std::sync::Arc;

use indexmap::IndexMap;
use sumgen_core::utils::last_path_segment;
use sumgen_core::{GoTypeOptions, ImportSet, RefName, Shape, TypeParam, UnionLike};

use crate::infer::ShapeLookup;

/// Import path of the Go runtime package generated code links against.
pub const DEFAULT_RUNTIME_IMPORT: &str = "github.com/sumgen-lang/sumgen/x/shared";

/// Generated Go declarations and the imports they use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    pub body: String,
    pub imports: ImportSet,
}

impl Generated {
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// The package generated code lands in, and how to resolve references.
pub struct GenContext<'a> {
    pub(crate) pkg_name: String,
    pub(crate) pkg_import: String,
    pub(crate) types: GoTypeOptions,
    pub(crate) runtime_import: String,
    pub(crate) type_registry: bool,
    local: Option<&'a IndexMap<String, Shape>>,
    unions: &'a [UnionLike],
    lookup: Option<&'a ShapeLookup<'a>>,
}

impl<'a> GenContext<'a> {
    pub fn new(pkg_name: impl Into<String>, pkg_import: impl Into<String>) -> Self {
        let pkg_name = pkg_name.into();
        let pkg_import = pkg_import.into();
        Self {
            types: GoTypeOptions::new().current_package(&pkg_name, &pkg_import),
            pkg_name,
            pkg_import,
            runtime_import: DEFAULT_RUNTIME_IMPORT.to_string(),
            type_registry: true,
            local: None,
            unions: &[],
            lookup: None,
        }
    }

    pub fn runtime_import(mut self, path: impl Into<String>) -> Self {
        self.runtime_import = path.into();
        self
    }

    /// Emit `init()` registrations for unions and codecs.
    pub fn type_registry(mut self, value: bool) -> Self {
        self.type_registry = value;
        self
    }

    /// Declarations of the file being generated, by name.
    pub fn local_shapes(mut self, shapes: &'a IndexMap<String, Shape>) -> Self {
        self.local = Some(shapes);
        self
    }

    /// Unions declared in the file being generated.
    pub fn local_unions(mut self, unions: &'a [UnionLike]) -> Self {
        self.unions = unions;
        self
    }

    pub fn lookup(mut self, lookup: &'a ShapeLookup<'a>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Package name used to qualify runtime helpers, e.g. `shared`.
    pub(crate) fn runtime_pkg(&self) -> &str {
        last_path_segment(&self.runtime_import)
    }

    pub(crate) fn go_type(&self, shape: &Shape) -> String {
        shape.go_type(&self.types)
    }

    /// `geo.Circle`: the name a variant carries on the JSON wire.
    pub(crate) fn wire_name(&self, name: &str) -> String {
        format!("{}.{name}", self.pkg_name)
    }

    /// Registry key: the fully-qualified Go name.
    pub(crate) fn registry_name(&self, name: &str) -> String {
        sumgen_core::shape::full_name(&self.pkg_import, name)
    }

    /// The declaration a reference names: this file first, then the lookup.
    pub(crate) fn resolve(&self, reference: &RefName) -> Option<Arc<Shape>> {
        let local = self
            .local
            .filter(|_| reference.refers_to(&reference.name, &self.pkg_name, &self.pkg_import))
            .and_then(|shapes| shapes.get(&reference.name));
        if let Some(shape) = local {
            return Some(Arc::new(shape.clone()));
        }
        if let Some(union) = self
            .unions
            .iter()
            .find(|u| reference.refers_to(&u.name, &self.pkg_name, &self.pkg_import))
        {
            return Some(Arc::new(Shape::UnionLike(union.clone())));
        }
        if reference.pkg_import_name.is_empty() && reference.pkg_name.is_empty() {
            return None;
        }
        self.lookup?.lookup_ref(reference)
    }

    /// Imports required to spell `shape` in this package.
    pub(crate) fn imports_of(&self, shape: &Shape) -> ImportSet {
        shape.imports(&self.pkg_import)
    }
}

/// `[A any, B comparable]`, or empty when there are no params.
pub(crate) fn decl_params(ctx: &GenContext<'_>, params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = params
        .iter()
        .map(|p| format!("{} {}", p.name, ctx.go_type(&p.constraint)))
        .collect();
    format!("[{}]", parts.join(", "))
}

/// `[A, B]`, or empty when there are no params.
pub(crate) fn use_params(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("[{}]", names.join(", "))
}

/// Declared params followed by extra `any`-constrained ones.
pub(crate) fn decl_params_with(
    ctx: &GenContext<'_>,
    params: &[TypeParam],
    extra: &[String],
) -> String {
    let all: Vec<TypeParam> = params
        .iter()
        .cloned()
        .chain(extra.iter().map(TypeParam::any))
        .collect();
    decl_params(ctx, &all)
}

/// Use-site params followed by extra names.
pub(crate) fn use_params_with(params: &[TypeParam], extra: &[String]) -> String {
    let all: Vec<TypeParam> = params
        .iter()
        .cloned()
        .chain(extra.iter().map(TypeParam::any))
        .collect();
    use_params(&all)
}

/// `base`, or `base1`, `base2`... whichever is not taken.
pub(crate) fn fresh_name(base: &str, taken: &[&str]) -> String {
    if !taken.contains(&base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{base}{i}"))
        .find(|candidate| !taken.contains(&candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

/// `count` distinct names `{prefix}0, {prefix}1, ...` avoiding the given params.
pub(crate) fn result_params(prefix: &str, count: usize, params: &[TypeParam]) -> Vec<String> {
    let mut taken: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let refs: Vec<&str> = taken.iter().map(String::as_str).collect();
        let name = fresh_name(&format!("{prefix}{i}"), &refs);
        taken.push(name.clone());
        out.push(name);
    }
    out
}

/// Go result list: ``, `T0`, or `(T0, T1)`.
pub(crate) fn results(types: &[String]) -> String {
    match types {
        [] => String::new(),
        [single] => single.clone(),
        many => format!("({})", many.join(", ")),
    }
}

/// Pad every column but the last so the next one lines up, the way gofmt
/// aligns struct fields.
pub(crate) fn align_columns(rows: &[Vec<String>], indent: &str) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter(|row| c + 1 < row.len())
                .map(|row| row[c].len())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let mut line = indent.to_string();
        for (c, cell) in row.iter().enumerate() {
            if c + 1 < row.len() {
                line.push_str(&format!("{cell:width$} ", width = widths[c]));
            } else {
                line.push_str(cell);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
