//! Go type expressions to shapes.

use arborium_tree_sitter::Node;
use indexmap::IndexMap;
use sumgen_core::{ListLike, PrimitiveKind, RefName, Shape};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::source::{named_children, node_text, span};

/// Predeclared non-primitive names that never take a package qualifier.
const BUILTINS: &[&str] = &["error", "comparable"];

pub(super) struct TypeResolver<'a> {
    text: &'a str,
    pkg_name: &'a str,
    pkg_import: &'a str,
    imports: &'a IndexMap<String, String>,
    type_params: Vec<String>,
}

impl<'a> TypeResolver<'a> {
    pub(super) fn new(
        text: &'a str,
        pkg_name: &'a str,
        pkg_import: &'a str,
        imports: &'a IndexMap<String, String>,
    ) -> Self {
        Self {
            text,
            pkg_name,
            pkg_import,
            imports,
            type_params: Vec::new(),
        }
    }

    /// Names that resolve as type parameters rather than declarations.
    pub(super) fn with_type_params(mut self, names: Vec<String>) -> Self {
        self.type_params = names;
        self
    }

    pub(super) fn resolve(&self, node: Node<'_>, diagnostics: &mut Diagnostics) -> Shape {
        match node.kind() {
            "type_identifier" | "identifier" => self.identifier(node_text(node, self.text)),
            "qualified_type" => {
                let shape = self.qualified(node, diagnostics);
                Shape::RefName(shape)
            }
            "generic_type" => self.generic(node, diagnostics),
            "pointer_type" => match named_children(node).first() {
                Some(inner) => Shape::pointer(self.resolve(*inner, diagnostics)),
                None => self.unsupported(node, diagnostics),
            },
            "slice_type" | "implicit_length_array_type" => {
                match node.child_by_field_name("element") {
                    Some(element) => Shape::list(self.resolve(element, diagnostics)),
                    None => self.unsupported(node, diagnostics),
                }
            }
            "array_type" => self.array(node, diagnostics),
            "map_type" => {
                let (Some(key), Some(value)) = (
                    node.child_by_field_name("key"),
                    node.child_by_field_name("value"),
                ) else {
                    return self.unsupported(node, diagnostics);
                };
                Shape::map(
                    self.resolve(key, diagnostics),
                    self.resolve(value, diagnostics),
                )
            }
            "parenthesized_type" | "type_elem" | "type_constraint" => {
                match named_children(node).as_slice() {
                    [single] => self.resolve(*single, diagnostics),
                    // `int | string` style constraints have no single shape
                    _ => Shape::Any,
                }
            }
            "interface_type" => {
                if named_children(node).is_empty() {
                    Shape::Any
                } else {
                    self.unsupported(node, diagnostics)
                }
            }
            _ => self.unsupported(node, diagnostics),
        }
    }

    fn identifier(&self, name: &str) -> Shape {
        if name == "any" {
            return Shape::Any;
        }
        if let Some(kind) = PrimitiveKind::from_go(name) {
            return Shape::primitive(kind);
        }
        if self.type_params.iter().any(|p| p == name) || BUILTINS.contains(&name) {
            return Shape::RefName(RefName::new(name));
        }
        Shape::RefName(RefName::new(name).in_package(self.pkg_name, self.pkg_import))
    }

    fn qualified(&self, node: Node<'_>, diagnostics: &mut Diagnostics) -> RefName {
        let alias = node
            .child_by_field_name("package")
            .map(|n| node_text(n, self.text))
            .unwrap_or_default();
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(n, self.text))
            .unwrap_or_default();

        match self.imports.get(alias) {
            Some(path) => RefName::new(name).in_package(alias, path.as_str()),
            None => {
                diagnostics
                    .report(DiagnosticKind::UnknownPackageAlias, span(node))
                    .message(alias)
                    .emit();
                RefName::new(name).in_package(alias, "")
            }
        }
    }

    fn generic(&self, node: Node<'_>, diagnostics: &mut Diagnostics) -> Shape {
        let Some(base) = node.child_by_field_name("type") else {
            return self.unsupported(node, diagnostics);
        };
        let mut reference = match base.kind() {
            "qualified_type" => self.qualified(base, diagnostics),
            _ => match self.identifier(node_text(base, self.text)) {
                Shape::RefName(r) => r,
                _ => return self.unsupported(node, diagnostics),
            },
        };

        if let Some(args) = node.child_by_field_name("type_arguments") {
            reference.indexed = named_children(args)
                .into_iter()
                .filter(|n| n.kind() != "comment")
                .map(|arg| self.resolve(arg, diagnostics))
                .collect();
        }

        Shape::RefName(reference)
    }

    fn array(&self, node: Node<'_>, diagnostics: &mut Diagnostics) -> Shape {
        let Some(element) = node.child_by_field_name("element") else {
            return self.unsupported(node, diagnostics);
        };
        let array_len = node
            .child_by_field_name("length")
            .and_then(|n| node_text(n, self.text).parse::<usize>().ok());
        let element = self.resolve(element, diagnostics);

        Shape::ListLike(ListLike {
            element_is_pointer: element.is_pointer(),
            element: Box::new(element),
            array_len,
        })
    }

    fn unsupported(&self, node: Node<'_>, diagnostics: &mut Diagnostics) -> Shape {
        let text = node_text(node, self.text);
        tracing::debug!(kind = node.kind(), text, "unsupported type, using any");
        diagnostics
            .report(DiagnosticKind::UnsupportedType, span(node))
            .message(format!("`{text}` is treated as `any`"))
            .emit();
        Shape::Any
    }
}
