//! Node storage for union trees with structural sharing.
//!
//! A child reference is a [`Value::Node`] holding a [`NodeId`]; two parents
//! may hold the same id. Reducers track visits by id, never by value.

use std::fmt;

use sumgen_core::{ChildKind, UnionLike, child_refs};

use crate::error::ReduceError;
use crate::value::{Record, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only node store.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<Record>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record whose children are already [`Value::Node`]s.
    pub fn push(&mut self, record: Record) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(record);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Record> {
        self.nodes.get(id.0 as usize)
    }

    /// Mutable access; rewiring children through this can create cycles.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Record> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store an inline tree of `union` values, children first.
    ///
    /// Only fields that refer back to the union become nodes; other nested
    /// records stay inline.
    pub fn intern(&mut self, union: &UnionLike, mut record: Record) -> Result<NodeId, ReduceError> {
        let variant = union
            .variants
            .iter()
            .find(|v| v.name() == Some(record.type_name.as_str()))
            .ok_or_else(|| ReduceError::UnknownVariant {
                union: union.name.clone(),
                variant: record.type_name.clone(),
            })?;

        for child in child_refs(union, variant) {
            let Some(value) = record.get_mut(&child.field) else {
                continue;
            };
            match (child.kind, value) {
                (ChildKind::Direct, slot) => self.intern_slot(union, slot)?,
                (ChildKind::ListElements, Value::List(items)) => {
                    for slot in items {
                        self.intern_slot(union, slot)?;
                    }
                }
                (ChildKind::MapValues, Value::Map(entries)) => {
                    for (_, slot) in entries {
                        self.intern_slot(union, slot)?;
                    }
                }
                _ => {}
            }
        }

        Ok(self.push(record))
    }

    /// Replace an inline record with a node; anything else is left alone.
    fn intern_slot(&mut self, union: &UnionLike, slot: &mut Value) -> Result<(), ReduceError> {
        if !matches!(slot, Value::Record(_)) {
            return Ok(());
        }
        if let Value::Record(record) = std::mem::replace(slot, Value::Null) {
            *slot = Value::Node(self.intern(union, record)?);
        }
        Ok(())
    }

    /// Inline copy of the tree under `id`, for encoding.
    ///
    /// Shared nodes are copied once per parent. A cycle is an error.
    pub fn resolve(&self, id: NodeId) -> Result<Value, ReduceError> {
        let mut path = Vec::new();
        self.resolve_node(id, &mut path)
    }

    fn resolve_node(&self, id: NodeId, path: &mut Vec<NodeId>) -> Result<Value, ReduceError> {
        if path.contains(&id) {
            return Err(ReduceError::Cycle(id));
        }
        let record = self.get(id).ok_or(ReduceError::Dangling(id))?;
        path.push(id);
        let mut inline = record.clone();
        for (_, value) in inline.fields.iter_mut() {
            self.resolve_value(value, path)?;
        }
        path.pop();
        Ok(Value::Record(inline))
    }

    fn resolve_value(&self, value: &mut Value, path: &mut Vec<NodeId>) -> Result<(), ReduceError> {
        match value {
            Value::Node(id) => *value = self.resolve_node(*id, path)?,
            Value::List(items) => {
                for item in items {
                    self.resolve_value(item, path)?;
                }
            }
            Value::Map(entries) => {
                for (_, item) in entries {
                    self.resolve_value(item, path)?;
                }
            }
            Value::Record(record) => {
                for (_, item) in record.fields.iter_mut() {
                    self.resolve_value(item, path)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "arena_tests.rs"]
mod arena_tests;
