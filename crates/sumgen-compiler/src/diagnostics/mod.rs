mod message;
mod printer;


use sumgen_core::ConfigError;

pub use message::{DiagnosticKind, DiagnosticMessage, RelatedInfo, Severity, Span};
pub use printer::DiagnosticsPrinter;

/// Problems found while inferring and generating one Go file.
///
/// Nothing here stops processing; callers check [`Diagnostics::has_errors`]
/// to decide whether the output is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Diagnostics,
    pending: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a diagnostic of `kind` at `span`, worded with the kind's
    /// fallback text until `.message()` supplies detail.
    pub fn report(&mut self, kind: DiagnosticKind, span: Span) -> DiagnosticBuilder<'_> {
        let pending = DiagnosticMessage::with_default_message(kind, span);
        DiagnosticBuilder {
            sink: self,
            pending,
        }
    }

    /// Report a union or match configuration error at `span`.
    pub fn config_error(&mut self, err: &ConfigError, span: Span) {
        self.report(DiagnosticKind::from(err), span)
            .message(err.to_string())
            .emit();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    fn count(&self, severity: Severity) -> usize {
        self.iter().filter(|d| d.severity() == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn printer<'a>(&'a self, source: &'a str) -> DiagnosticsPrinter<'a> {
        DiagnosticsPrinter::new(self, source)
    }

    /// Plain-text rendering against `source`, without a file path.
    pub fn render(&self, source: &str) -> String {
        self.printer(source).render()
    }
}

impl Extend<DiagnosticMessage> for Diagnostics {
    fn extend<I: IntoIterator<Item = DiagnosticMessage>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticMessage;
    type IntoIter = std::vec::IntoIter<DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl DiagnosticBuilder<'_> {
    /// Fill the kind's message template with `detail`.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.pending.message = self.pending.kind.message(Some(&detail));
        self
    }

    /// Point at a second location, e.g. the earlier declaration of a duplicate.
    pub fn related_to(mut self, note: impl Into<String>, span: Span) -> Self {
        self.pending.related.push(RelatedInfo::new(span, note));
        self
    }

    pub fn emit(self) {
        self.sink.messages.push(self.pending);
    }
}
