/// Configuration problems in a union or match declaration.
///
/// Each aborts generation for the offending declaration only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("union {union} has no variants")]
    EmptyUnion { union: String },

    #[error("union {union} declares variant {variant} more than once")]
    DuplicateVariant { union: String, variant: String },

    #[error("union {union} has a variant that is not a named type: {variant}")]
    UnnamedVariant { union: String, variant: String },

    #[error(
        "variant {variant} of union {union} has type params [{found}], expected [{expected}]"
    )]
    TypeParamMismatch {
        union: String,
        variant: String,
        expected: String,
        found: String,
    },

    #[error("union {union} is declared more than once")]
    DuplicateUnion { union: String },

    #[error("union {union} requests a reducer but no variant refers back to it")]
    ReducerNotRecursive { union: String },

    #[error("match {name} has no cases")]
    NoCases { name: String },

    #[error("match {name}: case {case} takes {found} inputs, expected {expected}")]
    CaseArity {
        name: String,
        case: String,
        expected: usize,
        found: usize,
    },

    #[error("match {name} declares case {case} more than once")]
    DuplicateCase { name: String, case: String },

    #[error("match {name}: last case {case} must accept `any` in every position")]
    MissingCatchAll { name: String, case: String },
}

impl ConfigError {
    /// Name of the declaration the error belongs to.
    pub fn subject(&self) -> &str {
        match self {
            ConfigError::EmptyUnion { union }
            | ConfigError::DuplicateVariant { union, .. }
            | ConfigError::UnnamedVariant { union, .. }
            | ConfigError::TypeParamMismatch { union, .. }
            | ConfigError::DuplicateUnion { union }
            | ConfigError::ReducerNotRecursive { union } => union,
            ConfigError::NoCases { name }
            | ConfigError::CaseArity { name, .. }
            | ConfigError::DuplicateCase { name, .. }
            | ConfigError::MissingCatchAll { name, .. } => name,
        }
    }
}
