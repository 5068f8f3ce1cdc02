use crate::shape::{
    AliasLike, ListLike, MapLike, PointerLike, PrimitiveKind, PrimitiveLike, RefName, Shape,
    StructLike, TypeParam, UnionLike,
};

use super::ShapeVisitor;

/// Renders TypeScript type syntax.
///
/// Named shapes render by name; their definitions come from the typegen
/// emitter. Pointers become `T | null`.
pub struct TypeScriptName;

fn generic(name: &str, params: &[TypeParam]) -> String {
    if params.is_empty() {
        return name.to_string();
    }
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("{name}<{}>", names.join(", "))
}

fn needs_parens(ts: &str) -> bool {
    ts.contains(" | ")
}

impl ShapeVisitor for TypeScriptName {
    type Output = String;

    fn visit_any(&mut self) -> String {
        "unknown".to_string()
    }

    fn visit_ref_name(&mut self, x: &RefName) -> String {
        let mut out = x.name.clone();
        if !x.indexed.is_empty() {
            let args: Vec<String> = x.indexed.iter().map(|s| s.accept(self)).collect();
            out = format!("{out}<{}>", args.join(", "));
        }
        if x.is_pointer {
            out.push_str(" | null");
        }
        out
    }

    fn visit_alias_like(&mut self, x: &AliasLike) -> String {
        generic(&x.name, &x.type_params)
    }

    fn visit_primitive_like(&mut self, x: &PrimitiveLike) -> String {
        match x.kind {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::String => "string",
            PrimitiveKind::Number(_) => "number",
        }
        .to_string()
    }

    fn visit_list_like(&mut self, x: &ListLike) -> String {
        let element = x.element.accept(self);
        if needs_parens(&element) {
            format!("({element})[]")
        } else {
            format!("{element}[]")
        }
    }

    fn visit_map_like(&mut self, x: &MapLike) -> String {
        let key = match x.key.unwrap_pointer() {
            Shape::PrimitiveLike(PrimitiveLike {
                kind: PrimitiveKind::Number(_),
            }) => "number".to_string(),
            _ => "string".to_string(),
        };
        format!("Record<{key}, {}>", x.value.accept(self))
    }

    fn visit_pointer_like(&mut self, x: &PointerLike) -> String {
        let inner = x.inner.accept(self);
        if inner.ends_with(" | null") {
            inner
        } else {
            format!("{inner} | null")
        }
    }

    fn visit_struct_like(&mut self, x: &StructLike) -> String {
        generic(&x.name, &x.type_params)
    }

    fn visit_union_like(&mut self, x: &UnionLike) -> String {
        generic(&x.name, &x.type_params)
    }
}
