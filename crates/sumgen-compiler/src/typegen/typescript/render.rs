//! Output rendering methods.

use sumgen_core::{AliasLike, FieldLike, PrimitiveKind, Shape, StructLike, TypeParam, UnionLike};

use super::Emitter;

impl Emitter<'_> {
    fn export(&self) -> &'static str {
        if self.config.export { "export " } else { "" }
    }

    /// Emit `export type Name = Body;`.
    pub(super) fn emit_type_decl(&mut self, name: &str, body: &str) {
        self.output
            .push_str(&format!("{}type {name} = {body};\n\n", self.export()));
    }

    pub(super) fn emit_interface(&mut self, st: &StructLike) {
        let name = generic(&st.name, &st.type_params);
        self.output
            .push_str(&format!("{}interface {name} {{\n", self.export()));

        for field in &st.fields {
            let json = field.tags.get("json");
            let key = match json {
                Some(tag) if tag.value == "-" && tag.options.is_empty() => continue,
                Some(tag) if !tag.value.is_empty() => tag.value.clone(),
                _ => field.name.clone(),
            };
            let optional = field.shape.is_pointer()
                || json.is_some_and(|t| t.has_option("omitempty"));

            if let Some(desc) = &field.desc {
                self.output.push_str(&format!("  /** {desc} */\n"));
            }
            self.output.push_str(&format!(
                "  {}{}: {};\n",
                property_key(&key),
                if optional { "?" } else { "" },
                self.field_type(field)
            ));
        }

        self.output.push_str("}\n\n");
    }

    pub(super) fn emit_alias(&mut self, alias: &AliasLike) {
        let name = generic(&alias.name, &alias.type_params);
        let body = alias.target.ts_type();
        self.emit_type_decl(&name, &body);
    }

    pub(super) fn emit_union(&mut self, union: &UnionLike) {
        let params = params(&union.type_params);
        let mut wrappers = Vec::new();

        for v in union.variant_names() {
            let wrapper = self.unique_name(&format!("{}{v}", union.name));
            let wire = format!("{}.{v}", union.pkg_name);
            self.output.push_str(&format!(
                "{}interface {wrapper}{params} {{\n  $type: \"{wire}\";\n  \"{wire}\": {v}{params};\n}}\n\n",
                self.export()
            ));
            wrappers.push(format!("{wrapper}{params}"));
        }

        let body = if wrappers.is_empty() {
            "never".to_string()
        } else {
            wrappers.join(" | ")
        };
        self.emit_type_decl(&format!("{}{params}", union.name), &body);
    }

    fn field_type(&self, field: &FieldLike) -> String {
        let options = field
            .guard
            .as_ref()
            .and_then(|g| g.enum_options())
            .filter(|_| self.config.enum_guards);
        let is_string = matches!(
            field.shape.unwrap_pointer(),
            Shape::PrimitiveLike(p) if p.kind == PrimitiveKind::String
        );
        match options {
            Some(options) if is_string && !options.is_empty() => options
                .iter()
                .map(|o| format!("{o:?}"))
                .collect::<Vec<_>>()
                .join(" | "),
            _ => field.shape.ts_type(),
        }
    }
}

fn params(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

fn generic(name: &str, type_params: &[TypeParam]) -> String {
    format!("{name}{}", params(type_params))
}

/// Quote keys that are not plain identifiers.
fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain { key.to_string() } else { format!("{key:?}") }
}
