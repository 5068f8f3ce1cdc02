//! Declaration walk: package clause, imports, type declarations.

use std::collections::HashMap;

use arborium_tree_sitter::Node;
use indexmap::IndexMap;
use sumgen_core::utils::{is_exported, last_path_segment};
use sumgen_core::{
    AliasLike, FieldLike, Guard, MatchCase, MatchDecl, Shape, StructLike, Tag, Tags, TypeParam,
    UnionLike, parse_tags,
};

use super::types::TypeResolver;
use super::{InferOptions, InferredInfo, MATCH_TAG, UNION_TAG};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::source::{
    GoSource, comment_body, doc_comments, field_children, named_children, node_text, span,
    trailing_comment,
};

/// What a single type spec declares.
enum Declared {
    Shape(Shape),
    Match(MatchDecl),
}

pub(super) struct Inferrer<'s, 'o> {
    source: &'s GoSource<'s>,
    options: &'o InferOptions,
    pkg_name: String,
    pkg_import: String,
    imports: IndexMap<String, String>,
    file_tags: Tags,
    shapes: IndexMap<String, Shape>,
    unions: Vec<UnionLike>,
    matches: Vec<MatchDecl>,
    decl_spans: HashMap<String, Span>,
    union_spans: HashMap<String, Span>,
    match_spans: HashMap<String, Span>,
    diagnostics: Diagnostics,
}

impl<'s, 'o> Inferrer<'s, 'o> {
    pub(super) fn new(source: &'s GoSource<'s>, options: &'o InferOptions, import: String) -> Self {
        Self {
            source,
            options,
            pkg_name: String::new(),
            pkg_import: import,
            imports: IndexMap::new(),
            file_tags: Tags::default(),
            shapes: IndexMap::new(),
            unions: Vec::new(),
            matches: Vec::new(),
            decl_spans: HashMap::new(),
            union_spans: HashMap::new(),
            match_spans: HashMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub(super) fn run(mut self) -> InferredInfo {
        let root = self.source.root();
        let text = self.source.text();
        let mut header_comments = Vec::new();
        let mut seen_package = false;

        for node in named_children(root) {
            match node.kind() {
                "comment" if !seen_package => header_comments.push(node_text(node, text)),
                "package_clause" => {
                    seen_package = true;
                    self.file_tags = self.options.tags.extract(header_comments.drain(..));
                    if let Some(ident) = named_children(node).first() {
                        self.pkg_name = node_text(*ident, text).to_string();
                    }
                }
                "import_declaration" => self.import_declaration(node),
                "type_declaration" => self.type_declaration(node),
                _ => {}
            }
        }

        tracing::debug!(
            package = %self.pkg_name,
            shapes = self.shapes.len(),
            unions = self.unions.len(),
            matches = self.matches.len(),
            "inferred file"
        );

        InferredInfo {
            pkg_name: self.pkg_name,
            pkg_import_name: self.pkg_import,
            imports: self.imports,
            file_tags: self.file_tags,
            shapes: self.shapes,
            unions: self.unions,
            matches: self.matches,
            decl_spans: self.decl_spans,
            union_spans: self.union_spans,
            match_spans: self.match_spans,
            diagnostics: self.diagnostics,
        }
    }

    fn import_declaration(&mut self, node: Node<'_>) {
        let text = self.source.text();
        for child in named_children(node) {
            match child.kind() {
                "import_spec_list" => self.import_declaration(child),
                "import_spec" => {
                    let Some(path) = child.child_by_field_name("path") else {
                        continue;
                    };
                    let path = unquote(node_text(path, text));
                    let alias = match child.child_by_field_name("name") {
                        Some(name) => node_text(name, text),
                        None => last_path_segment(&path),
                    };
                    // Blank and dot imports introduce no qualifier.
                    if alias == "_" || alias == "." {
                        continue;
                    }
                    self.imports.insert(alias.to_string(), path.clone());
                }
                _ => {}
            }
        }
    }

    fn type_declaration(&mut self, decl: Node<'_>) {
        let text = self.source.text();
        let decl_tags = self.options.tags.extract(doc_comments(decl, text));
        let grouped = has_token(decl, "(");

        let mut variants = Vec::new();
        for spec in named_children(decl) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            let tags = if grouped {
                self.options.tags.extract(doc_comments(spec, text))
            } else {
                decl_tags.clone()
            };

            let mut diagnostics = Diagnostics::new();
            let declared = self.type_spec(spec, tags, &mut diagnostics);
            self.diagnostics.extend(diagnostics);

            match declared {
                Some(Declared::Shape(shape)) => {
                    let Some(name) = shape.name().map(str::to_string) else {
                        continue;
                    };
                    self.decl_spans.insert(name.clone(), span(spec));
                    variants.push(shape.clone());
                    self.shapes.insert(name, shape);
                }
                Some(Declared::Match(matcher)) => {
                    self.match_spans.insert(matcher.name.clone(), span(spec));
                    self.matches.push(matcher);
                }
                None => {}
            }
        }

        if let Some(tag) = decl_tags.get(UNION_TAG).filter(|t| !t.value.is_empty()) {
            let tag = tag.clone();
            self.union(decl, &tag, variants, decl_tags);
        }
    }

    fn union(&mut self, decl: Node<'_>, tag: &Tag, variants: Vec<Shape>, tags: Tags) {
        let (name, params) = tag.type_params();

        if let Some(previous) = self.union_spans.get(&name).copied() {
            self.diagnostics
                .report(DiagnosticKind::DuplicateUnion, span(decl))
                .message(name.as_str())
                .related_to("first declared here", previous)
                .emit();
            return;
        }

        let type_params = params
            .into_iter()
            .map(|param| {
                variants
                    .iter()
                    .flat_map(Shape::type_params)
                    .find(|p| p.name == param)
                    .cloned()
                    .unwrap_or_else(|| TypeParam::any(param))
            })
            .collect();

        tracing::debug!(union = %name, variants = variants.len(), "grouped union");
        self.union_spans.insert(name.clone(), span(decl));
        self.unions.push(UnionLike {
            name,
            pkg_name: self.pkg_name.clone(),
            pkg_import_name: self.pkg_import.clone(),
            type_params,
            variants,
            tags,
        });
    }

    fn type_spec(
        &self,
        spec: Node<'_>,
        tags: Tags,
        diagnostics: &mut Diagnostics,
    ) -> Option<Declared> {
        let text = self.source.text();
        let name = node_text(spec.child_by_field_name("name")?, text).to_string();
        let type_node = spec.child_by_field_name("type")?;

        let param_decls = spec
            .child_by_field_name("type_parameters")
            .map(type_param_decls)
            .unwrap_or_default();
        let param_names: Vec<String> = param_decls
            .iter()
            .flat_map(|(names, _)| names.iter().map(|n| node_text(*n, text).to_string()))
            .collect();

        let resolver = TypeResolver::new(text, &self.pkg_name, &self.pkg_import, &self.imports)
            .with_type_params(param_names);

        let mut type_params = Vec::new();
        for (names, constraint) in &param_decls {
            let constraint = constraint
                .map(|c| resolver.resolve(c, diagnostics))
                .unwrap_or(Shape::Any);
            for name in names {
                type_params.push(TypeParam {
                    name: node_text(*name, text).to_string(),
                    constraint: constraint.clone(),
                });
            }
        }

        let declared = match type_node.kind() {
            "struct_type" if spec.kind() == "type_spec" => Declared::Shape(Shape::StructLike(StructLike {
                name,
                pkg_name: self.pkg_name.clone(),
                pkg_import_name: self.pkg_import.clone(),
                type_params,
                fields: self.struct_fields(type_node, &resolver, diagnostics),
                tags,
            })),
            "interface_type" if tags.contains_key(MATCH_TAG) => {
                let name = tags
                    .get(MATCH_TAG)
                    .map(|t| t.value.clone())
                    .filter(|v| !v.is_empty())
                    .unwrap_or(name);
                Declared::Match(MatchDecl {
                    name,
                    pkg_name: self.pkg_name.clone(),
                    pkg_import_name: self.pkg_import.clone(),
                    type_params,
                    cases: self.match_cases(type_node, &resolver, diagnostics),
                    tags,
                })
            }
            "interface_type" => {
                tracing::trace!(%name, "skipping interface declaration");
                return None;
            }
            _ => Declared::Shape(Shape::AliasLike(AliasLike {
                name,
                pkg_name: self.pkg_name.clone(),
                pkg_import_name: self.pkg_import.clone(),
                is_alias: spec.kind() == "type_alias",
                type_params,
                target: Box::new(resolver.resolve(type_node, diagnostics)),
                tags,
            })),
        };

        Some(declared)
    }

    fn struct_fields(
        &self,
        node: Node<'_>,
        resolver: &TypeResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<FieldLike> {
        let text = self.source.text();
        let Some(list) = named_children(node)
            .into_iter()
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        for decl in named_children(list) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some(type_node) = decl.child_by_field_name("type") else {
                continue;
            };
            let mut shape = resolver.resolve(type_node, diagnostics);

            let mut names: Vec<String> = field_children(decl, "name")
                .into_iter()
                .map(|n| node_text(n, text).to_string())
                .collect();
            if names.is_empty() {
                // Embedded field, named after its type.
                if has_token(decl, "*") {
                    shape = Shape::pointer(shape);
                }
                match shape.unwrap_pointer().name() {
                    Some(name) => names.push(name.to_string()),
                    None => continue,
                }
            }

            let tags = decl
                .child_by_field_name("tag")
                .map(|t| parse_tags(&unquote(node_text(t, text))))
                .unwrap_or_default();
            let guard = Guard::from_tags(&tags);
            let desc = field_desc(decl, text, self.options);

            for name in names {
                if !is_exported(&name) {
                    continue;
                }
                let mut field = FieldLike::new(name, shape.clone());
                field.desc = desc.clone();
                field.guard = guard.clone();
                field.tags = tags.clone();
                fields.push(field);
            }
        }

        fields
    }

    fn match_cases(
        &self,
        node: Node<'_>,
        resolver: &TypeResolver<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<MatchCase> {
        let text = self.source.text();
        let mut cases = Vec::new();

        for method in named_children(node) {
            if !matches!(method.kind(), "method_elem" | "method_spec") {
                continue;
            }
            let Some(name) = method.child_by_field_name("name") else {
                continue;
            };

            let mut inputs = Vec::new();
            if let Some(params) = method.child_by_field_name("parameters") {
                for param in named_children(params) {
                    if !matches!(
                        param.kind(),
                        "parameter_declaration" | "variadic_parameter_declaration"
                    ) {
                        continue;
                    }
                    let Some(ty) = param.child_by_field_name("type") else {
                        continue;
                    };
                    let shape = resolver.resolve(ty, diagnostics);
                    let count = field_children(param, "name").len().max(1);
                    inputs.extend(std::iter::repeat_n(shape, count));
                }
            }

            cases.push(MatchCase::new(node_text(name, text), inputs));
        }

        cases
    }
}

/// `(names, constraint)` for each entry of a type parameter list.
fn type_param_decls(list: Node<'_>) -> Vec<(Vec<Node<'_>>, Option<Node<'_>>)> {
    named_children(list)
        .into_iter()
        .filter(|n| matches!(n.kind(), "type_parameter_declaration" | "parameter_declaration"))
        .map(|n| (field_children(n, "name"), n.child_by_field_name("type")))
        .collect()
}

/// A field's description: its trailing comment, else its non-tag doc lines.
fn field_desc(decl: Node<'_>, text: &str, options: &InferOptions) -> Option<String> {
    if let Some(comment) = trailing_comment(decl, text) {
        return Some(comment_body(comment).to_string());
    }
    let lines: Vec<&str> = doc_comments(decl, text)
        .into_iter()
        .filter(|line| options.tags.parse_line(line).is_none())
        .map(comment_body)
        .collect();
    (!lines.is_empty()).then(|| lines.join(" "))
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == token);
    found
}

/// Strip Go string literal quotes: `"..."` (with `\"` escapes) or `` `...` ``.
fn unquote(literal: &str) -> String {
    if let Some(raw) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return raw.to_string();
    }
    match literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => literal.to_string(),
    }
}
