//! Exhaustive traversal over `Shape`.
//!
//! `ShapeVisitor` is the single matching primitive: one handler per variant,
//! with a generic `Output` so the same trait serves unit, single and tuple
//! results. Everything else in this module is built on top of it.

mod display;
mod go;
mod imports;
mod refs;
mod typescript;


pub use display::ShapeDisplay;
pub use go::{GoTypeName, GoTypeOptions};
pub use imports::{ImportCollector, ImportSet};
pub use refs::RefCollector;
pub use typescript::TypeScriptName;

use crate::shape::{
    AliasLike, ListLike, MapLike, PointerLike, PrimitiveLike, RefName, Shape, StructLike,
    UnionLike,
};

pub trait ShapeVisitor {
    type Output;

    fn visit_any(&mut self) -> Self::Output;
    fn visit_ref_name(&mut self, x: &RefName) -> Self::Output;
    fn visit_alias_like(&mut self, x: &AliasLike) -> Self::Output;
    fn visit_primitive_like(&mut self, x: &PrimitiveLike) -> Self::Output;
    fn visit_list_like(&mut self, x: &ListLike) -> Self::Output;
    fn visit_map_like(&mut self, x: &MapLike) -> Self::Output;
    fn visit_pointer_like(&mut self, x: &PointerLike) -> Self::Output;
    fn visit_struct_like(&mut self, x: &StructLike) -> Self::Output;
    fn visit_union_like(&mut self, x: &UnionLike) -> Self::Output;
}

impl Shape {
    pub fn accept<V: ShapeVisitor + ?Sized>(&self, v: &mut V) -> V::Output {
        match self {
            Shape::Any => v.visit_any(),
            Shape::RefName(x) => v.visit_ref_name(x),
            Shape::AliasLike(x) => v.visit_alias_like(x),
            Shape::PrimitiveLike(x) => v.visit_primitive_like(x),
            Shape::ListLike(x) => v.visit_list_like(x),
            Shape::MapLike(x) => v.visit_map_like(x),
            Shape::PointerLike(x) => v.visit_pointer_like(x),
            Shape::StructLike(x) => v.visit_struct_like(x),
            Shape::UnionLike(x) => v.visit_union_like(x),
        }
    }

    /// Go type syntax for this shape.
    pub fn go_type(&self, options: &GoTypeOptions) -> String {
        self.accept(&mut GoTypeName::new(options))
    }

    /// TypeScript type syntax for this shape.
    pub fn ts_type(&self) -> String {
        self.accept(&mut TypeScriptName)
    }

    /// Imports required to render this shape from within `current_import`.
    pub fn imports(&self, current_import: &str) -> ImportSet {
        let mut collector = ImportCollector::new(current_import);
        self.accept(&mut collector);
        collector.finish()
    }

    /// Every named reference reachable from this shape, in traversal order.
    pub fn refs(&self) -> Vec<RefName> {
        let mut collector = RefCollector::default();
        self.accept(&mut collector);
        collector.finish()
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.accept(&mut ShapeDisplay))
    }
}
