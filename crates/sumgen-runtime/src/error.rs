use crate::arena::NodeId;

/// JSON encode/decode failure.
///
/// Nested failures are wrapped in [`CodecError::At`] so the message reads
/// as a breadcrumb path, e.g. `Expr.Sum.Left: unknown key "x" in Lit`.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("no codec for type {0}")]
    NoCodec(String),

    #[error("unknown key {key:?} in {type_name}")]
    UnknownKey { key: String, type_name: String },

    #[error("expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("{union}: unknown variant {variant:?}")]
    UnknownVariant { union: String, variant: String },

    #[error("{union}: no variant payload")]
    MissingPayload { union: String },

    #[error("expected {expected} elements, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("{0}")]
    Custom(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Prefix the breadcrumb path with `segment`.
    pub fn at(self, segment: impl AsRef<str>) -> Self {
        let segment = segment.as_ref();
        match self {
            Self::At { path, source } => Self::At {
                path: format!("{segment}.{path}"),
                source,
            },
            other => Self::At {
                path: segment.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Breadcrumb path, if the error was raised below the top level.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::At { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The innermost error, without breadcrumbs.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            Self::At { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Dispatch or matching failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("{0} is not exhaustive")]
    NotExhaustive(String),

    #[error("{union}: no handler for {variant}")]
    MissingHandler { union: String, variant: String },

    #[error("{union}: {variant} is not a variant")]
    UnknownVariant { union: String, variant: String },

    #[error("{0}: no variant populated")]
    Empty(String),

    #[error("{name}: expected {expected} inputs, got {actual}")]
    Arity {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{name}: {case} is not a case")]
    UnknownCase { name: String, case: String },

    #[error("expected a struct value, got {0}")]
    NotARecord(String),
}

/// Reducer traversal failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    #[error("node {0} is not in the arena")]
    Dangling(NodeId),

    #[error("node {0} is its own descendant")]
    Cycle(NodeId),

    #[error("{union}: {variant} is not a variant")]
    UnknownVariant { union: String, variant: String },

    #[error("no reduction for {0}")]
    Fallback(String),
}
