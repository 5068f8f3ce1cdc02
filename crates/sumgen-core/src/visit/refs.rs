use crate::shape::{
    AliasLike, ListLike, MapLike, PointerLike, PrimitiveLike, RefName, StructLike, UnionLike,
};

use super::ShapeVisitor;

/// Collects every `RefName` reachable from a shape, declarations included.
#[derive(Default)]
pub struct RefCollector {
    refs: Vec<RefName>,
}

impl RefCollector {
    pub fn finish(self) -> Vec<RefName> {
        self.refs
    }
}

impl ShapeVisitor for RefCollector {
    type Output = ();

    fn visit_any(&mut self) {}

    fn visit_ref_name(&mut self, x: &RefName) {
        self.refs.push(x.clone());
        for arg in &x.indexed {
            arg.accept(self);
        }
    }

    fn visit_alias_like(&mut self, x: &AliasLike) {
        x.target.accept(self);
    }

    fn visit_primitive_like(&mut self, _: &PrimitiveLike) {}

    fn visit_list_like(&mut self, x: &ListLike) {
        x.element.accept(self);
    }

    fn visit_map_like(&mut self, x: &MapLike) {
        x.key.accept(self);
        x.value.accept(self);
    }

    fn visit_pointer_like(&mut self, x: &PointerLike) {
        x.inner.accept(self);
    }

    fn visit_struct_like(&mut self, x: &StructLike) {
        for field in &x.fields {
            field.shape.accept(self);
        }
    }

    fn visit_union_like(&mut self, x: &UnionLike) {
        for variant in &x.variants {
            variant.accept(self);
        }
    }
}
