//! Match declarations: named case tuples tested top to bottom.
//!
//! ```go
//! //go:tag mkmatch:"MatchPairs"
//! type MatchPairs[T0 Shape, T1 Shape] interface {
//!     MatchCircles(x *Circle, y *Circle)
//!     Fallback(x, y any)
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::shape::{Shape, TypeParam};
use crate::tags::Tags;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_import_name: String,
    pub type_params: Vec<TypeParam>,
    pub cases: Vec<MatchCase>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

/// One case: an input shape per position. `Shape::Any` matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCase {
    pub name: String,
    pub inputs: Vec<Shape>,
}

impl MatchCase {
    pub fn new(name: impl Into<String>, inputs: Vec<Shape>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        self.inputs.iter().all(|s| matches!(s, Shape::Any))
    }
}

impl MatchDecl {
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(last) = self.cases.last() else {
            return Err(ConfigError::NoCases {
                name: self.name.clone(),
            });
        };

        let mut seen = std::collections::HashSet::new();
        for case in &self.cases {
            if case.inputs.len() != self.arity() {
                return Err(ConfigError::CaseArity {
                    name: self.name.clone(),
                    case: case.name.clone(),
                    expected: self.arity(),
                    found: case.inputs.len(),
                });
            }
            if !seen.insert(case.name.as_str()) {
                return Err(ConfigError::DuplicateCase {
                    name: self.name.clone(),
                    case: case.name.clone(),
                });
            }
        }

        if !last.is_catch_all() {
            return Err(ConfigError::MissingCatchAll {
                name: self.name.clone(),
                case: last.name.clone(),
            });
        }

        Ok(())
    }
}
