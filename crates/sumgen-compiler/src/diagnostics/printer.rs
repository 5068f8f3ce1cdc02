//! Source-annotated rendering of a [`Diagnostics`] collection.

use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity, Span};

pub struct DiagnosticsPrinter<'a> {
    diagnostics: &'a Diagnostics,
    source: &'a str,
    path: Option<&'a str>,
    colored: bool,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub fn new(diagnostics: &'a Diagnostics, source: &'a str) -> Self {
        Self {
            diagnostics,
            source,
            path: None,
            colored: false,
        }
    }

    /// File name shown in the `-->` header of every snippet.
    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// One block per diagnostic, separated by a blank line.
    pub fn render(&self) -> String {
        let renderer = match self.colored {
            true => Renderer::styled(),
            false => Renderer::plain(),
        };
        self.diagnostics
            .iter()
            .map(|diag| self.render_one(&renderer, diag))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_one(&self, renderer: &Renderer, diag: &DiagnosticMessage) -> String {
        let primary = AnnotationKind::Primary
            .span(self.clamp(diag.span))
            .label(&diag.message);
        let mut snippet = Snippet::source(self.source).line_start(1).annotation(primary);
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        snippet = diag.related.iter().fold(snippet, |snippet, note| {
            snippet.annotation(
                AnnotationKind::Context
                    .span(self.clamp(note.span))
                    .label(&note.message),
            )
        });

        let title = level(diag.severity()).primary_title(&diag.message);
        renderer.render(&[title.element(snippet)]).to_string()
    }

    /// Keep `span` inside the source; an empty span widens to one byte so
    /// the caret has something to point at.
    fn clamp(&self, span: Span) -> Range<usize> {
        let len = self.source.len();
        let start = span.start.min(len);
        let end = span.end.min(len);
        match start < end {
            true => start..end,
            false => start..(start + 1).min(len),
        }
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}
