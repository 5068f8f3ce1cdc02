//! Child-reference analysis for recursive unions.
//!
//! A variant field is a child reference when it holds the union itself,
//! directly, as list elements, or as map values. Reducers on both the
//! generated Go side and the runtime side walk children in the order
//! returned here: fields in declaration order.

use serde::Serialize;

use crate::shape::{RefName, Shape, UnionLike};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChildKind {
    /// The field holds one union value.
    Direct,
    /// The field is a list of union values.
    ListElements,
    /// The field is a map whose values are union values.
    MapValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildRef {
    pub field: String,
    pub kind: ChildKind,
}

/// Children of `variant` that refer back to `union`.
pub fn child_refs(union: &UnionLike, variant: &Shape) -> Vec<ChildRef> {
    let Some(st) = variant.as_struct() else {
        return Vec::new();
    };

    st.fields
        .iter()
        .filter_map(|field| {
            let kind = classify(union, &field.shape)?;
            Some(ChildRef {
                field: field.name.clone(),
                kind,
            })
        })
        .collect()
}

/// Whether any variant of `union` refers back to it.
pub fn is_recursive(union: &UnionLike) -> bool {
    union
        .variants
        .iter()
        .any(|v| !child_refs(union, v).is_empty())
}

fn classify(union: &UnionLike, shape: &Shape) -> Option<ChildKind> {
    match shape.unwrap_pointer() {
        Shape::RefName(r) if names_union(union, r) => Some(ChildKind::Direct),
        Shape::ListLike(list) => {
            names_union_shape(union, &list.element).then_some(ChildKind::ListElements)
        }
        Shape::MapLike(map) => names_union_shape(union, &map.value).then_some(ChildKind::MapValues),
        _ => None,
    }
}

fn names_union_shape(union: &UnionLike, shape: &Shape) -> bool {
    match shape.unwrap_pointer() {
        Shape::RefName(r) => names_union(union, r),
        _ => false,
    }
}

fn names_union(union: &UnionLike, r: &RefName) -> bool {
    r.refers_to(&union.name, &union.pkg_name, &union.pkg_import_name)
}
