//! Case-tuple matching, the runtime form of a match declaration.
//!
//! Cases are tried top to bottom and the first whose every position
//! matches wins. An `any` position always matches; a named position
//! matches a record of that type.

use std::collections::HashMap;

use sumgen_core::{MatchDecl, NumberKind, PrimitiveKind, Shape};

use crate::error::MatchError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Any,
    Record(String),
    Primitive(PrimitiveKind),
    List,
    Map,
}

impl Pattern {
    fn of(shape: &Shape) -> Self {
        match shape.unwrap_pointer() {
            Shape::Any => Pattern::Any,
            Shape::PrimitiveLike(p) => Pattern::Primitive(p.kind),
            Shape::ListLike(_) => Pattern::List,
            Shape::MapLike(_) => Pattern::Map,
            named => match named.name() {
                Some(name) => Pattern::Record(name.to_string()),
                None => Pattern::Any,
            },
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Pattern::Any, _) => true,
            (Pattern::Record(name), Value::Record(r)) => r.type_name == *name,
            (Pattern::Primitive(PrimitiveKind::Boolean), Value::Bool(_)) => true,
            (Pattern::Primitive(PrimitiveKind::String), Value::String(_)) => true,
            (Pattern::Primitive(PrimitiveKind::Number(n)), value) => number_matches(*n, value),
            (Pattern::List, Value::List(_)) => true,
            (Pattern::Map, Value::Map(_)) => true,
            _ => false,
        }
    }
}

fn number_matches(kind: NumberKind, value: &Value) -> bool {
    match value {
        Value::Float(_) => kind.is_float(),
        Value::Uint(_) => kind.is_unsigned(),
        Value::Int(_) => !kind.is_float() && !kind.is_unsigned(),
        _ => false,
    }
}

type Handler<'f, T> = Box<dyn FnMut(&[&Value]) -> T + 'f>;

struct Case {
    name: String,
    patterns: Vec<Pattern>,
}

pub struct CaseMatcher<'f, T> {
    name: String,
    arity: usize,
    cases: Vec<Case>,
    handlers: HashMap<String, Handler<'f, T>>,
}

impl<'f, T> CaseMatcher<'f, T> {
    pub fn new(decl: &MatchDecl) -> Self {
        let cases = decl
            .cases
            .iter()
            .map(|case| Case {
                name: case.name.clone(),
                patterns: case.inputs.iter().map(Pattern::of).collect(),
            })
            .collect();
        Self {
            name: decl.name.clone(),
            arity: decl.type_params.len(),
            cases,
            handlers: HashMap::new(),
        }
    }

    pub fn on(mut self, case: impl Into<String>, handler: impl FnMut(&[&Value]) -> T + 'f) -> Self {
        self.handlers.insert(case.into(), Box::new(handler));
        self
    }

    /// Every handler names a case, and every case is handled.
    pub fn check(&self) -> Result<(), MatchError> {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        if let Some(unknown) = names
            .into_iter()
            .find(|n| !self.cases.iter().any(|c| c.name == **n))
        {
            return Err(MatchError::UnknownCase {
                name: self.name.clone(),
                case: unknown.clone(),
            });
        }
        match self.cases.iter().find(|c| !self.handlers.contains_key(&c.name)) {
            Some(missing) => Err(MatchError::MissingHandler {
                union: self.name.clone(),
                variant: missing.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Name of the first case matching `inputs`.
    pub fn select(&self, inputs: &[&Value]) -> Result<&str, MatchError> {
        if inputs.len() != self.arity {
            return Err(MatchError::Arity {
                name: self.name.clone(),
                expected: self.arity,
                actual: inputs.len(),
            });
        }
        self.cases
            .iter()
            .find(|case| {
                case.patterns
                    .iter()
                    .zip(inputs)
                    .all(|(pattern, value)| pattern.matches(value))
            })
            .map(|case| case.name.as_str())
            .ok_or_else(|| MatchError::NotExhaustive(self.name.clone()))
    }

    pub fn run(&mut self, inputs: &[&Value]) -> Result<T, MatchError> {
        let case = self.select(inputs)?.to_string();
        match self.handlers.get_mut(&case) {
            Some(handler) => Ok(handler(inputs)),
            None => Err(MatchError::MissingHandler {
                union: self.name.clone(),
                variant: case,
            }),
        }
    }
}

#[cfg(test)]
#[path = "matching_tests.rs"]
mod matching_tests;
