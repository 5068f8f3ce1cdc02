//! Parse → infer → generate → render for one Go file.
//!
//! Union and match configuration errors become diagnostics and abort only
//! the offending declaration; everything else in the file is still
//! generated.

use std::path::{Path, PathBuf};

use sumgen_core::{ConfigError, ShapeCache, UnionLike, is_recursive};

use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::generate::{
    DEFAULT_RUNTIME_IMPORT, GenContext, Generated, JsonGenerator, MatchGenerator,
    ReducerGenerator, UnionGenerator,
};
use crate::infer::{InferOptions, InferredInfo, SERDE_TAG, ShapeLookup, UNION_TAG, infer_source};
use crate::render::GoFile;
use crate::source::{GoModule, find_module};
use crate::{Error, Result};

/// Generators to leave out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Skip {
    pub json: bool,
    pub reducer: bool,
    pub matching: bool,
}

/// A union given by name and variant list instead of by annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitUnion {
    pub name: String,
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    skip: Skip,
    runtime_import: Option<String>,
    package: Option<String>,
    union: Option<ExplicitUnion>,
    infer: InferOptions,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: Skip) -> Self {
        self.skip = skip;
        self
    }

    /// Import path of the Go runtime package.
    pub fn runtime_import(mut self, path: impl Into<String>) -> Self {
        self.runtime_import = Some(path.into());
        self
    }

    /// Package clause of the generated file, when it differs from the source's.
    pub fn package(mut self, name: impl Into<String>) -> Self {
        self.package = Some(name.into());
        self
    }

    /// Form one union from the named declarations, ignoring annotations.
    pub fn explicit_union(
        mut self,
        name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.union = Some(ExplicitUnion {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn infer_options(mut self, options: InferOptions) -> Self {
        self.infer = options;
        self
    }
}

/// Result of generating one file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Input path, if the source was read from disk.
    pub path: Option<PathBuf>,
    pub package: String,
    /// Rendered Go file; empty when the source declares nothing to generate.
    pub text: String,
    pub diagnostics: Diagnostics,
    /// Input text, for rendering diagnostics.
    pub source: String,
}

impl GeneratedFile {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `<stem>_union_gen.go` next to the input.
    pub fn default_output_path(&self) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        let stem = path.file_stem()?.to_string_lossy();
        Some(path.with_file_name(format!("{stem}_union_gen.go")))
    }
}

/// Union-level switches from `mkunion:"Name,opt,..."`.
#[derive(Debug, Clone, Copy, Default)]
struct UnionOptions {
    no_serde: bool,
    no_reducer: bool,
    reducer: bool,
}

impl UnionOptions {
    fn of(union: &UnionLike) -> Self {
        let Some(tag) = union.tags.get(UNION_TAG) else {
            return Self::default();
        };
        Self {
            no_serde: tag.has_option("no-serde"),
            no_reducer: tag.has_option("no-reducer"),
            reducer: tag.has_option("reducer"),
        }
    }
}

pub struct Generator<'c> {
    config: Config,
    cache: &'c ShapeCache,
}

impl Generator<'static> {
    /// A generator sharing the process-wide shape cache.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: ShapeCache::global(),
        }
    }
}

impl<'c> Generator<'c> {
    pub fn with_cache<'n>(self, cache: &'n ShapeCache) -> Generator<'n> {
        Generator {
            config: self.config,
            cache,
        }
    }

    #[tracing::instrument(level = "debug", skip(self), fields(path = %path.display()))]
    pub fn generate_file(&self, path: &Path) -> Result<GeneratedFile> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = dir.canonicalize().unwrap_or(dir);
        let module = find_module(&dir);

        let mut options = self.config.infer.clone();
        if options.pkg_import_name.is_none() {
            options.pkg_import_name = module.as_ref().and_then(|m| m.import_path(&dir));
        }

        let info = infer_source(&text, &options)?;
        let mut file = self.generate_inferred(info, text, module);
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Generate from in-memory source. Cross-package references resolve
    /// only through what the cache already holds.
    pub fn generate_source(&self, text: &str) -> Result<GeneratedFile> {
        let info = infer_source(text, &self.config.infer)?;
        Ok(self.generate_inferred(info, text.to_string(), None))
    }

    fn generate_inferred(
        &self,
        mut info: InferredInfo,
        source: String,
        module: Option<GoModule>,
    ) -> GeneratedFile {
        let mut diagnostics = std::mem::take(&mut info.diagnostics);

        if let Some(explicit) = &self.config.union {
            match explicit_union(&info, explicit) {
                Ok(union) => info.unions = vec![union],
                Err(missing) => {
                    diagnostics
                        .report(DiagnosticKind::UnknownVariant, Span::default())
                        .message(missing)
                        .emit();
                    info.unions.clear();
                }
            }
        }

        let lookup = ShapeLookup::new(self.cache)
            .module(module)
            .options(self.config.infer.clone());
        lookup.register(&info);

        let runtime_import = self
            .config
            .runtime_import
            .clone()
            .unwrap_or_else(|| DEFAULT_RUNTIME_IMPORT.to_string());
        let ctx = GenContext::new(&info.pkg_name, &info.pkg_import_name)
            .runtime_import(runtime_import)
            .type_registry(info.has_type_registry())
            .local_shapes(&info.shapes)
            .local_unions(&info.unions)
            .lookup(&lookup);

        let package = self
            .config
            .package
            .clone()
            .unwrap_or_else(|| info.pkg_name.clone());
        let mut file = GoFile::new(&package).current_import(&info.pkg_import_name);
        let mut json = JsonGenerator::new(&ctx);
        let mut coded = Vec::new();

        for union in &info.unions {
            let span = info.union_span(&union.name);
            if let Err(err) = union.validate() {
                diagnostics.config_error(&err, span);
                continue;
            }

            let options = UnionOptions::of(union);
            let recursive = is_recursive(union);
            if options.reducer && !recursive {
                let err = ConfigError::ReducerNotRecursive {
                    union: union.name.clone(),
                };
                diagnostics.config_error(&err, span);
                continue;
            }

            file = add(file, UnionGenerator::new(&ctx, union).generate());

            if !recursive {
                tracing::debug!(union = %union.name, "no child references, skipping reducer");
            } else if self.config.skip.reducer || options.no_reducer {
                tracing::debug!(union = %union.name, "reducer disabled");
            } else {
                file = add(file, ReducerGenerator::new(&ctx, union).generate());
            }

            if !self.config.skip.json && !options.no_serde {
                json.union_codec(union, span);
                coded.extend(union.variant_names().into_iter().map(str::to_string));
            }
        }

        for decl in &info.matches {
            if let Err(err) = decl.validate() {
                diagnostics.config_error(&err, info.match_span(&decl.name));
                continue;
            }
            if self.config.skip.matching {
                continue;
            }
            file = add(file, MatchGenerator::new(&ctx, decl).generate());
        }

        if !self.config.skip.json {
            for st in info.shapes.values().filter_map(|s| s.as_struct()) {
                let requested = st
                    .tags
                    .get(SERDE_TAG)
                    .is_some_and(|t| t.value == "json");
                if requested && !coded.contains(&st.name) {
                    json.standalone_struct_codec(st, info.decl_span(&st.name));
                }
            }
        }

        let (codecs, codec_diagnostics) = json.finish();
        diagnostics.extend(codec_diagnostics);
        file = add(file, codecs);

        tracing::debug!(
            package = %package,
            unions = info.unions.len(),
            matches = info.matches.len(),
            diagnostics = diagnostics.len(),
            "generated"
        );

        GeneratedFile {
            path: None,
            text: if file.is_empty() {
                String::new()
            } else {
                file.render()
            },
            package,
            diagnostics,
            source,
        }
    }
}

fn add(file: GoFile, generated: Generated) -> GoFile {
    if generated.is_empty() {
        return file;
    }
    file.imports(&generated.imports).body(generated.body)
}

/// The union formed by the named declarations, or the first missing name.
fn explicit_union(info: &InferredInfo, explicit: &ExplicitUnion) -> std::result::Result<UnionLike, String> {
    let mut variants = Vec::with_capacity(explicit.variants.len());
    for name in &explicit.variants {
        let shape = info.shapes.get(name).ok_or_else(|| name.clone())?;
        variants.push(shape.clone());
    }

    let type_params = variants
        .first()
        .map(|v| v.type_params().to_vec())
        .unwrap_or_default();

    Ok(UnionLike {
        name: explicit.name.clone(),
        pkg_name: info.pkg_name.clone(),
        pkg_import_name: info.pkg_import_name.clone(),
        type_params,
        variants,
        tags: Default::default(),
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod pipeline_tests;
