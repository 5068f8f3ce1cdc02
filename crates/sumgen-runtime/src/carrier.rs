//! The one-of carrier and per-variant dispatch.

use std::collections::HashMap;

use sumgen_core::UnionLike;

use crate::error::MatchError;
use crate::value::{Record, Value};

/// One optional slot per variant, in declaration order.
///
/// Unwrapping returns the first populated slot, so a carrier with several
/// slots set behaves like the earliest of them.
#[derive(Debug, Clone)]
pub struct OneOf<'u> {
    union: &'u UnionLike,
    slots: Vec<Option<Record>>,
}

impl<'u> OneOf<'u> {
    pub fn new(union: &'u UnionLike) -> Self {
        Self {
            union,
            slots: vec![None; union.variants.len()],
        }
    }

    pub fn from_record(union: &'u UnionLike, record: Record) -> Result<Self, MatchError> {
        let mut carrier = Self::new(union);
        carrier.set(record)?;
        Ok(carrier)
    }

    /// Populate the slot named by the record's type.
    pub fn set(&mut self, record: Record) -> Result<(), MatchError> {
        let index = self.slot(&record.type_name)?;
        self.slots[index] = Some(record);
        Ok(())
    }

    pub fn clear(&mut self, variant: &str) -> Result<(), MatchError> {
        let index = self.slot(variant)?;
        self.slots[index] = None;
        Ok(())
    }

    pub fn get(&self, variant: &str) -> Option<&Record> {
        let index = self.slot(variant).ok()?;
        self.slots[index].as_ref()
    }

    pub fn unwrap(&self) -> Result<&Record, MatchError> {
        self.slots
            .iter()
            .flatten()
            .next()
            .ok_or_else(|| MatchError::Empty(format!("{}OneOf", self.union.name)))
    }

    /// Dispatch the populated variant to `cases`.
    pub fn accept<T>(&self, cases: &mut Cases<'_, T>) -> Result<T, MatchError> {
        cases.apply(self.unwrap()?)
    }

    fn slot(&self, variant: &str) -> Result<usize, MatchError> {
        self.union
            .variants
            .iter()
            .position(|v| v.name() == Some(variant))
            .ok_or_else(|| MatchError::UnknownVariant {
                union: self.union.name.clone(),
                variant: variant.to_string(),
            })
    }
}

type Handler<'f, T> = Box<dyn FnMut(&Record) -> T + 'f>;

/// Per-variant handlers for one union.
///
/// Without [`Cases::otherwise`] every variant needs a handler, checked by
/// [`Cases::check`] and again on dispatch. With it, unhandled variants fall
/// back to the default handler.
pub struct Cases<'f, T> {
    union: String,
    variants: Vec<String>,
    handlers: HashMap<String, Handler<'f, T>>,
    fallback: Option<Handler<'f, T>>,
}

impl<'f, T> Cases<'f, T> {
    pub fn new(union: &UnionLike) -> Self {
        Self {
            union: union.name.clone(),
            variants: union.variant_names().into_iter().map(str::to_string).collect(),
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    pub fn on(mut self, variant: impl Into<String>, handler: impl FnMut(&Record) -> T + 'f) -> Self {
        self.handlers.insert(variant.into(), Box::new(handler));
        self
    }

    pub fn otherwise(mut self, handler: impl FnMut(&Record) -> T + 'f) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Every handler names a variant, and every variant is handled.
    pub fn check(&self) -> Result<(), MatchError> {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        if let Some(unknown) = names.into_iter().find(|n| !self.variants.contains(*n)) {
            return Err(MatchError::UnknownVariant {
                union: self.union.clone(),
                variant: unknown.clone(),
            });
        }
        if self.fallback.is_some() {
            return Ok(());
        }
        match self.variants.iter().find(|v| !self.handlers.contains_key(*v)) {
            Some(missing) => Err(MatchError::MissingHandler {
                union: self.union.clone(),
                variant: missing.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn apply(&mut self, record: &Record) -> Result<T, MatchError> {
        if !self.variants.contains(&record.type_name) {
            return Err(MatchError::UnknownVariant {
                union: self.union.clone(),
                variant: record.type_name.clone(),
            });
        }
        if let Some(handler) = self.handlers.get_mut(&record.type_name) {
            return Ok(handler(record));
        }
        match &mut self.fallback {
            Some(fallback) => Ok(fallback(record)),
            None => Err(MatchError::MissingHandler {
                union: self.union.clone(),
                variant: record.type_name.clone(),
            }),
        }
    }

    pub fn apply_value(&mut self, value: &Value) -> Result<T, MatchError> {
        match value {
            Value::Record(record) => self.apply(record),
            other => Err(MatchError::NotARecord(other.kind())),
        }
    }
}

#[cfg(test)]
#[path = "carrier_tests.rs"]
mod carrier_tests;
