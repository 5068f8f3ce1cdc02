use sumgen_core::ConfigError;

/// Byte range in a Go source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Diagnostic kinds, grouped by the stage that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Source could not be parsed
    SyntaxError,
    MissingSyntax,

    // Union and match declarations that cannot be generated
    EmptyUnion,
    DuplicateVariant,
    UnnamedVariant,
    TypeParamMismatch,
    DuplicateUnion,
    ReducerNotRecursive,
    UnknownVariant,
    NoCases,
    CaseArity,
    DuplicateCase,
    MissingCatchAll,

    // Degraded but generated
    UnknownPackageAlias,
    UnsupportedType,
    UnresolvedReference,
    OpaqueCodec,
}

impl DiagnosticKind {
    /// Everything that still yields generated code is a warning.
    pub fn severity(self) -> Severity {
        use DiagnosticKind::*;
        match self {
            UnknownPackageAlias | UnsupportedType | UnresolvedReference | OpaqueCodec => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Text used when the reporter gives no detail.
    pub fn fallback_message(self) -> &'static str {
        use DiagnosticKind::*;
        match self {
            SyntaxError => "syntax error",
            MissingSyntax => "missing syntax",
            EmptyUnion => "union has no variants",
            DuplicateVariant => "duplicate variant",
            UnnamedVariant => "variant must be a named type",
            TypeParamMismatch => "variant type params differ from the union's",
            DuplicateUnion => "union is declared more than once",
            ReducerNotRecursive => "reducer requested for a non-recursive union",
            UnknownVariant => "unknown variant",
            NoCases => "match declaration has no cases",
            CaseArity => "case arity differs from the declaration",
            DuplicateCase => "duplicate case",
            MissingCatchAll => "last case must be a catch-all",
            UnknownPackageAlias => "unknown package",
            UnsupportedType => "unsupported type",
            UnresolvedReference => "unresolved reference",
            OpaqueCodec => "no codec for type",
        }
    }

    /// Final wording, with `detail` spliced in where the kind expects a name.
    pub fn message(self, detail: Option<&str>) -> String {
        use DiagnosticKind::*;
        let Some(detail) = detail else {
            return self.fallback_message().to_string();
        };
        match self {
            UnknownPackageAlias => format!("`{detail}` is not imported"),
            UnknownVariant => format!("`{detail}` is not declared in this file"),
            UnresolvedReference => format!("`{detail}` could not be resolved"),
            DuplicateUnion => format!("union `{detail}` is declared more than once"),
            SyntaxError | MissingSyntax | UnsupportedType | OpaqueCodec => {
                format!("{}: {detail}", self.fallback_message())
            }
            // Config errors already carry a full sentence.
            _ => detail.to_string(),
        }
    }
}

impl From<&ConfigError> for DiagnosticKind {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::EmptyUnion { .. } => Self::EmptyUnion,
            ConfigError::DuplicateVariant { .. } => Self::DuplicateVariant,
            ConfigError::UnnamedVariant { .. } => Self::UnnamedVariant,
            ConfigError::TypeParamMismatch { .. } => Self::TypeParamMismatch,
            ConfigError::DuplicateUnion { .. } => Self::DuplicateUnion,
            ConfigError::ReducerNotRecursive { .. } => Self::ReducerNotRecursive,
            ConfigError::NoCases { .. } => Self::NoCases,
            ConfigError::CaseArity { .. } => Self::CaseArity,
            ConfigError::DuplicateCase { .. } => Self::DuplicateCase,
            ConfigError::MissingCatchAll { .. } => Self::MissingCatchAll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Secondary location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        let message = message.into();
        Self { span, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self {
            kind,
            span,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// `error at 10..14: message (related: note at 2..6)`
impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Span { start, end } = self.span;
        write!(f, "{} at {start}..{end}: {}", self.severity(), self.message)?;
        self.related.iter().try_for_each(|r| {
            write!(f, " (related: {} at {}..{})", r.message, r.span.start, r.span.end)
        })
    }
}
