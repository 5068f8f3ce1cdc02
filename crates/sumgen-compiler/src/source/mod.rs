//! Go source parsing on top of tree-sitter, plus module discovery.

mod module;

#[cfg(test)]
mod module_tests;

pub use module::{GoModule, find_module};

use arborium_tree_sitter::{Language, Node, Parser, Tree};

use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::{Error, Result};

/// A parsed Go file.
pub struct GoSource<'s> {
    text: &'s str,
    tree: Tree,
}

impl<'s> GoSource<'s> {
    /// Parse `text`. Any ERROR or MISSING node fails the whole file.
    pub fn parse(text: &'s str) -> Result<Self> {
        let language: Language = arborium_go::language().into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| Error::Language(e.to_string()))?;

        let Some(tree) = parser.parse(text, None) else {
            let mut diagnostics = Diagnostics::new();
            diagnostics
                .report(DiagnosticKind::SyntaxError, Span::new(0, text.len()))
                .message("parser produced no tree")
                .emit();
            return Err(Error::Parse(diagnostics));
        };

        let root = tree.root_node();
        if root.has_error() {
            let mut diagnostics = Diagnostics::new();
            let bad = first_error(root).unwrap_or(root);
            let kind = if bad.is_missing() {
                DiagnosticKind::MissingSyntax
            } else {
                DiagnosticKind::SyntaxError
            };
            let detail = if bad.is_missing() {
                format!("expected `{}`", bad.kind())
            } else {
                format!("unexpected `{}`", excerpt(node_text(bad, text)))
            };
            diagnostics.report(kind, span(bad)).message(detail).emit();
            return Err(Error::Parse(diagnostics));
        }

        Ok(Self { text, tree })
    }

    pub fn text(&self) -> &'s str {
        self.text
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn node_text(&self, node: Node<'_>) -> &'s str {
        node_text(node, self.text)
    }
}

pub fn node_text<'s>(node: Node<'_>, text: &'s str) -> &'s str {
    &text[node.byte_range()]
}

pub fn span(node: Node<'_>) -> Span {
    Span::from(node.byte_range())
}

pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

fn excerpt(text: &str) -> &str {
    let line = text.lines().next().unwrap_or_default();
    match line.char_indices().nth(24) {
        Some((i, _)) => &line[..i],
        None => line,
    }
}

/// The `//` comment lines directly above `node`, in source order.
///
/// A blank line between comment and node ends the block.
pub fn doc_comments<'s>(node: Node<'_>, text: &'s str) -> Vec<&'s str> {
    let mut lines = Vec::new();
    let mut expected_row = node.start_position().row;
    let mut current = node.prev_sibling();

    while let Some(prev) = current {
        if prev.kind() != "comment" || prev.end_position().row + 1 != expected_row {
            break;
        }
        lines.push(node_text(prev, text));
        expected_row = prev.start_position().row;
        current = prev.prev_sibling();
    }

    lines.reverse();
    lines
}

/// A `//` comment on the same line after `node`.
pub fn trailing_comment<'s>(node: Node<'_>, text: &'s str) -> Option<&'s str> {
    let next = node.next_sibling()?;
    (next.kind() == "comment" && next.start_position().row == node.end_position().row)
        .then(|| node_text(next, text))
}

/// Comment text without the `//` marker.
pub fn comment_body(comment: &str) -> &str {
    comment
        .strip_prefix("//")
        .map(str::trim)
        .unwrap_or_else(|| comment.trim())
}
