use crate::shape::{
    AliasLike, ListLike, MapLike, PointerLike, PrimitiveLike, RefName, Shape, StructLike,
    TypeParam, UnionLike,
};

use super::ShapeVisitor;

/// How to render Go type names.
#[derive(Debug, Clone, Default)]
pub struct GoTypeOptions {
    current_pkg_name: String,
    current_pkg_import: String,
    instantiate: bool,
}

impl GoTypeOptions {
    pub fn new() -> Self {
        Self {
            instantiate: true,
            ..Self::default()
        }
    }

    /// Names declared in this package are rendered unqualified.
    pub fn current_package(mut self, name: impl Into<String>, import: impl Into<String>) -> Self {
        self.current_pkg_name = name.into();
        self.current_pkg_import = import.into();
        self
    }

    /// Render declarations with their type parameter list, `Name[A, B]`.
    pub fn instantiate(mut self, value: bool) -> Self {
        self.instantiate = value;
        self
    }

    pub fn current_pkg_name(&self) -> &str {
        &self.current_pkg_name
    }

    pub fn current_pkg_import(&self) -> &str {
        &self.current_pkg_import
    }

    /// Whether a name declared in (`pkg_name`, `import`) needs a qualifier.
    pub fn needs_qualifier(&self, pkg_name: &str, import: &str) -> bool {
        if pkg_name.is_empty() {
            return false;
        }
        if !import.is_empty() && !self.current_pkg_import.is_empty() {
            return import != self.current_pkg_import;
        }
        pkg_name != self.current_pkg_name
    }
}

/// Renders Go type syntax.
pub struct GoTypeName<'a> {
    options: &'a GoTypeOptions,
}

impl<'a> GoTypeName<'a> {
    pub fn new(options: &'a GoTypeOptions) -> Self {
        Self { options }
    }

    fn qualified(&self, name: &str, pkg_name: &str, import: &str) -> String {
        if self.options.needs_qualifier(pkg_name, import) {
            format!("{pkg_name}.{name}")
        } else {
            name.to_string()
        }
    }

    fn declared(&self, name: &str, pkg_name: &str, import: &str, params: &[TypeParam]) -> String {
        let base = self.qualified(name, pkg_name, import);
        if !self.options.instantiate || params.is_empty() {
            return base;
        }
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        format!("{base}[{}]", names.join(", "))
    }
}

impl ShapeVisitor for GoTypeName<'_> {
    type Output = String;

    fn visit_any(&mut self) -> String {
        "any".to_string()
    }

    fn visit_ref_name(&mut self, x: &RefName) -> String {
        let mut out = String::new();
        if x.is_pointer {
            out.push('*');
        }
        out.push_str(&self.qualified(&x.name, &x.pkg_name, &x.pkg_import_name));
        if !x.indexed.is_empty() {
            let args: Vec<String> = x.indexed.iter().map(|s| s.accept(self)).collect();
            out.push('[');
            out.push_str(&args.join(", "));
            out.push(']');
        }
        out
    }

    fn visit_alias_like(&mut self, x: &AliasLike) -> String {
        self.declared(&x.name, &x.pkg_name, &x.pkg_import_name, &x.type_params)
    }

    fn visit_primitive_like(&mut self, x: &PrimitiveLike) -> String {
        x.kind.go_name().to_string()
    }

    fn visit_list_like(&mut self, x: &ListLike) -> String {
        let element = x.element.accept(self);
        match x.array_len {
            Some(n) => format!("[{n}]{element}"),
            None => format!("[]{element}"),
        }
    }

    fn visit_map_like(&mut self, x: &MapLike) -> String {
        let key = x.key.accept(self);
        let value = x.value.accept(self);
        format!("map[{key}]{value}")
    }

    fn visit_pointer_like(&mut self, x: &PointerLike) -> String {
        format!("*{}", x.inner.accept(self))
    }

    fn visit_struct_like(&mut self, x: &StructLike) -> String {
        self.declared(&x.name, &x.pkg_name, &x.pkg_import_name, &x.type_params)
    }

    fn visit_union_like(&mut self, x: &UnionLike) -> String {
        self.declared(&x.name, &x.pkg_name, &x.pkg_import_name, &x.type_params)
    }
}

impl Shape {
    /// Go type name of a declaration, unqualified, with its type params.
    pub fn go_decl_name(&self) -> String {
        self.go_type(&GoTypeOptions::new().current_package(
            self.pkg_name().unwrap_or_default(),
            self.pkg_import_name().unwrap_or_default(),
        ))
    }
}
