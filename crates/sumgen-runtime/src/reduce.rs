//! Depth-first and breadth-first reducers over arena-stored union trees.
//!
//! Children of a node are the fields that refer back to the union, in field
//! declaration order: direct references, list elements, map values (see
//! `sumgen_core::child_refs`). Both traversals stop as soon as a reducer
//! returns [`Step::Stop`].

use std::collections::{HashMap, HashSet, VecDeque};

use sumgen_core::{ChildKind, ChildRef, UnionLike, child_refs};

use crate::arena::{Arena, NodeId};
use crate::error::ReduceError;
use crate::value::{Record, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<A> {
    Continue(A),
    Stop(A),
}

impl<A> Step<A> {
    pub fn into_inner(self) -> A {
        match self {
            Step::Continue(a) | Step::Stop(a) => a,
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Step::Stop(_))
    }
}

pub trait Reducer<A> {
    fn reduce(&mut self, node: NodeId, record: &Record, agg: A) -> Result<Step<A>, ReduceError>;
}

impl<A, F> Reducer<A> for F
where
    F: FnMut(NodeId, &Record, A) -> Step<A>,
{
    fn reduce(&mut self, node: NodeId, record: &Record, agg: A) -> Result<Step<A>, ReduceError> {
        Ok(self(node, record, agg))
    }
}

/// Child lookup with per-variant child references computed once.
struct Walk<'a> {
    arena: &'a Arena,
    union: &'a UnionLike,
    refs: HashMap<String, Vec<ChildRef>>,
}

impl<'a> Walk<'a> {
    fn new(arena: &'a Arena, union: &'a UnionLike) -> Self {
        let refs = union
            .variants
            .iter()
            .filter_map(|v| Some((v.name()?.to_string(), child_refs(union, v))))
            .collect();
        Self { arena, union, refs }
    }

    fn node(&self, id: NodeId) -> Result<&'a Record, ReduceError> {
        self.arena.get(id).ok_or(ReduceError::Dangling(id))
    }

    fn children(&self, record: &Record) -> Result<Vec<NodeId>, ReduceError> {
        let refs = self
            .refs
            .get(&record.type_name)
            .ok_or_else(|| ReduceError::UnknownVariant {
                union: self.union.name.clone(),
                variant: record.type_name.clone(),
            })?;

        let mut children = Vec::new();
        for child in refs {
            match (child.kind, record.get(&child.field)) {
                (ChildKind::Direct, Some(Value::Node(id))) => children.push(*id),
                (ChildKind::ListElements, Some(Value::List(items))) => {
                    children.extend(items.iter().filter_map(Value::as_node));
                }
                (ChildKind::MapValues, Some(Value::Map(entries))) => {
                    children.extend(entries.iter().filter_map(|(_, v)| v.as_node()));
                }
                _ => {}
            }
        }
        Ok(children)
    }
}

/// Reduce a node, then each child subtree in order.
///
/// A node reachable through two parents is reduced twice. A cycle does not
/// terminate.
pub fn reduce_depth_first<A>(
    arena: &Arena,
    union: &UnionLike,
    root: NodeId,
    reducer: &mut impl Reducer<A>,
    init: A,
) -> Result<A, ReduceError> {
    let walk = Walk::new(arena, union);
    depth_first(&walk, root, reducer, init).map(Step::into_inner)
}

fn depth_first<A>(
    walk: &Walk<'_>,
    id: NodeId,
    reducer: &mut impl Reducer<A>,
    agg: A,
) -> Result<Step<A>, ReduceError> {
    let record = walk.node(id)?;
    let mut agg = match reducer.reduce(id, record, agg)? {
        Step::Continue(agg) => agg,
        stop => return Ok(stop),
    };
    for child in walk.children(record)? {
        agg = match depth_first(walk, child, reducer, agg)? {
            Step::Continue(agg) => agg,
            stop => return Ok(stop),
        };
    }
    Ok(Step::Continue(agg))
}

/// Reduce nodes in queue order, each node at most once.
///
/// A dequeued node's children are queued before the node is reduced.
pub fn reduce_breadth_first<A>(
    arena: &Arena,
    union: &UnionLike,
    root: NodeId,
    reducer: &mut impl Reducer<A>,
    init: A,
) -> Result<A, ReduceError> {
    let walk = Walk::new(arena, union);
    let mut queue = VecDeque::from([root]);
    let mut visited = HashSet::new();
    let mut agg = init;

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let record = walk.node(id)?;
        queue.extend(walk.children(record)?);
        agg = match reducer.reduce(id, record, agg)? {
            Step::Continue(agg) => agg,
            Step::Stop(agg) => return Ok(agg),
        };
    }
    Ok(agg)
}

type Handler<'f, A> = Box<dyn FnMut(NodeId, &Record, A) -> Step<A> + 'f>;

/// A reducer from optional per-variant handlers.
///
/// Unhandled variants pass the aggregate through, stop when
/// `default_stop` is set, or fail when `fail_on_fallback` is set.
pub struct DefaultReduction<'f, A> {
    handlers: HashMap<String, Handler<'f, A>>,
    fail_on_fallback: bool,
    default_stop: bool,
}

impl<A> Default for DefaultReduction<'_, A> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            fail_on_fallback: false,
            default_stop: false,
        }
    }
}

impl<'f, A> DefaultReduction<'f, A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        mut self,
        variant: impl Into<String>,
        handler: impl FnMut(NodeId, &Record, A) -> Step<A> + 'f,
    ) -> Self {
        self.handlers.insert(variant.into(), Box::new(handler));
        self
    }

    pub fn fail_on_fallback(mut self, value: bool) -> Self {
        self.fail_on_fallback = value;
        self
    }

    pub fn default_stop(mut self, value: bool) -> Self {
        self.default_stop = value;
        self
    }
}

impl<A> Reducer<A> for DefaultReduction<'_, A> {
    fn reduce(&mut self, node: NodeId, record: &Record, agg: A) -> Result<Step<A>, ReduceError> {
        if let Some(handler) = self.handlers.get_mut(&record.type_name) {
            return Ok(handler(node, record, agg));
        }
        if self.fail_on_fallback {
            return Err(ReduceError::Fallback(record.type_name.clone()));
        }
        if self.default_stop {
            return Ok(Step::Stop(agg));
        }
        Ok(Step::Continue(agg))
    }
}

#[cfg(test)]
#[path = "reduce_tests.rs"]
mod reduce_tests;
