use crate::shape::{
    AliasLike, ListLike, MapLike, PointerLike, PrimitiveLike, RefName, Shape, StructLike,
    TypeParam, UnionLike,
};

use super::ShapeVisitor;

/// Compact one-line rendering used in logs and error messages.
pub struct ShapeDisplay;

impl ShapeDisplay {
    fn params(&mut self, params: &[TypeParam]) -> String {
        if params.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        format!("[{}]", names.join(", "))
    }

    fn list(&mut self, shapes: &[Shape]) -> String {
        shapes
            .iter()
            .map(|s| s.accept(self))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ShapeVisitor for ShapeDisplay {
    type Output = String;

    fn visit_any(&mut self) -> String {
        "any".to_string()
    }

    fn visit_ref_name(&mut self, x: &RefName) -> String {
        let mut out = String::new();
        if x.is_pointer {
            out.push('*');
        }
        if !x.pkg_name.is_empty() {
            out.push_str(&x.pkg_name);
            out.push('.');
        }
        out.push_str(&x.name);
        if !x.indexed.is_empty() {
            out.push('[');
            out.push_str(&self.list(&x.indexed));
            out.push(']');
        }
        out
    }

    fn visit_alias_like(&mut self, x: &AliasLike) -> String {
        let op = if x.is_alias { " = " } else { " " };
        format!(
            "alias {}{}{}{}",
            x.name,
            self.params(&x.type_params),
            op,
            x.target.accept(self)
        )
    }

    fn visit_primitive_like(&mut self, x: &PrimitiveLike) -> String {
        x.kind.go_name().to_string()
    }

    fn visit_list_like(&mut self, x: &ListLike) -> String {
        match x.array_len {
            Some(n) => format!("[{n}]{}", x.element.accept(self)),
            None => format!("[]{}", x.element.accept(self)),
        }
    }

    fn visit_map_like(&mut self, x: &MapLike) -> String {
        format!("map[{}]{}", x.key.accept(self), x.value.accept(self))
    }

    fn visit_pointer_like(&mut self, x: &PointerLike) -> String {
        format!("*{}", x.inner.accept(self))
    }

    fn visit_struct_like(&mut self, x: &StructLike) -> String {
        let fields: Vec<String> = x
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.shape.accept(self)))
            .collect();
        format!(
            "struct {}{}{{{}}}",
            x.name,
            self.params(&x.type_params),
            fields.join("; ")
        )
    }

    fn visit_union_like(&mut self, x: &UnionLike) -> String {
        let variants: Vec<&str> = x.variants.iter().filter_map(Shape::name).collect();
        format!(
            "union {}{}{{{}}}",
            x.name,
            self.params(&x.type_params),
            variants.join(" | ")
        )
    }
}
