//! JSON codecs for unions and their variant structs.
//!
//! Unions travel as `{"$type": "pkg.V", "pkg.V": {...}}`. Struct fields are
//! encoded one by one through per-type helper methods; collections are
//! walked element by element so interface-typed elements go through the
//! runtime registry individually.

use std::collections::HashSet;

use sumgen_core::utils::sanitize_ident;
use sumgen_core::{
    AliasLike, ImportSet, MapLike, PrimitiveKind, RefName, Shape, StructLike, UnionLike,
};

use super::{GenContext, Generated, align_columns, decl_params, use_params};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};

const BYTES_IMPORT: &str = "bytes";
const JSON_IMPORT: &str = "encoding/json";
const FMT_IMPORT: &str = "fmt";

/// Collects codecs for one output file.
pub struct JsonGenerator<'c, 'a> {
    ctx: &'c GenContext<'a>,
    output: String,
    imports: ImportSet,
    uses_runtime: bool,
    diagnostics: Diagnostics,
}

impl<'c, 'a> JsonGenerator<'c, 'a> {
    pub fn new(ctx: &'c GenContext<'a>) -> Self {
        Self {
            ctx,
            output: String::new(),
            imports: ImportSet::new(),
            uses_runtime: false,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Wire codec for a union plus codecs for every variant.
    pub fn union_codec(&mut self, union: &UnionLike, span: Span) {
        let registered = self.ctx.type_registry && union.type_params.is_empty();
        if registered {
            let mut names = vec![union.name.as_str()];
            names.extend(union.variant_names());
            self.emit_registry(&names);
        }

        self.imports.add("bytes", BYTES_IMPORT);
        self.emit_union_json(union);
        self.emit_union_from_json(union);
        self.emit_union_to_json(union);

        for variant in &union.variants {
            match variant {
                Shape::StructLike(st) => self.struct_codec(st, span),
                Shape::AliasLike(alias) => self.alias_codec(alias),
                other => tracing::debug!(variant = %other, "no codec for unnamed variant"),
            }
        }
    }

    /// Codec for a struct outside any union, registered by name.
    pub fn standalone_struct_codec(&mut self, st: &StructLike, span: Span) {
        if self.ctx.type_registry && st.type_params.is_empty() {
            self.emit_registry(&[st.name.as_str()]);
        }
        self.struct_codec(st, span);
    }

    pub fn finish(mut self) -> (Generated, Diagnostics) {
        if !self.output.is_empty() {
            self.imports.add("json", JSON_IMPORT);
            self.imports.add("fmt", FMT_IMPORT);
        }
        if self.uses_runtime {
            self.imports
                .add(self.ctx.runtime_pkg(), self.ctx.runtime_import.as_str());
        }
        self.imports.remove(&self.ctx.pkg_import);

        let generated = Generated {
            body: self.output,
            imports: self.imports,
        };
        (generated, self.diagnostics)
    }

    fn struct_codec(&mut self, st: &StructLike, span: Span) {
        let mut codec = StructCodec::new(self.ctx, st);
        codec.emit();
        self.uses_runtime |= codec.uses_runtime;
        for field in &st.fields {
            self.imports.merge(&self.ctx.imports_of(&field.shape));
        }
        for (kind, detail) in codec.warnings {
            self.diagnostics.report(kind, span).message(detail).emit();
        }
        self.section(codec.output);
    }

    fn alias_codec(&mut self, alias: &AliasLike) {
        let v = &alias.name;
        let pkg = &self.ctx.pkg_name;
        let decl = decl_params(self.ctx, &alias.type_params);
        let ty = format!("{v}{}", use_params(&alias.type_params));

        self.section(format!(
            "func {v}FromJSON{decl}(x []byte) (*{ty}, error) {{\n\
             \tresult := new({ty})\n\
             \terr := json.Unmarshal(x, result)\n\
             \tif err != nil {{\n\
             \t\treturn nil, fmt.Errorf(\"{pkg}.{v}FromJSON: %w\", err)\n\
             \t}}\n\
             \treturn result, nil\n\
             }}\n"
        ));
        self.section(format!(
            "func {v}ToJSON{decl}(x *{ty}) ([]byte, error) {{\n\
             \treturn json.Marshal(x)\n\
             }}\n"
        ));
    }

    fn emit_registry(&mut self, names: &[&str]) {
        let shared = self.ctx.runtime_pkg().to_string();
        let mut out = String::from("func init() {\n");
        for name in names {
            out.push_str(&format!(
                "\t{shared}.JSONMarshallerRegister(\"{}\", {name}FromJSON, {name}ToJSON)\n",
                self.ctx.registry_name(name)
            ));
        }
        out.push_str("}\n");
        self.uses_runtime = true;
        self.section(out);
    }

    fn emit_union_json(&mut self, union: &UnionLike) {
        let u = &union.name;
        let mut rows = vec![vec![
            "Type".to_string(),
            "string".to_string(),
            "`json:\"$type,omitempty\"`".to_string(),
        ]];
        for v in union.variant_names() {
            rows.push(vec![
                v.to_string(),
                "json.RawMessage".to_string(),
                format!("`json:\"{},omitempty\"`", self.ctx.wire_name(v)),
            ]);
        }
        let mut out = format!("type {u}UnionJSON struct {{\n");
        out.push_str(&align_columns(&rows, "\t"));
        out.push_str("}\n");
        self.section(out);
    }

    fn emit_union_from_json(&mut self, union: &UnionLike) {
        let u = &union.name;
        let pkg = &self.ctx.pkg_name;
        let decl = decl_params(self.ctx, &union.type_params);
        let args = use_params(&union.type_params);

        let mut out = format!(
            "func {u}FromJSON{decl}(x []byte) ({u}{args}, error) {{\n\
             \tif len(x) == 0 || string(x) == \"null\" {{\n\
             \t\treturn nil, nil\n\
             \t}}\n\n\
             \tvar data {u}UnionJSON\n\
             \tdec := json.NewDecoder(bytes.NewReader(x))\n\
             \tdec.DisallowUnknownFields()\n\
             \terr := dec.Decode(&data)\n\
             \tif err != nil {{\n\
             \t\treturn nil, fmt.Errorf(\"{pkg}.{u}FromJSON: %w\", err)\n\
             \t}}\n\n\
             \tswitch data.Type {{\n"
        );
        for v in union.variant_names() {
            out.push_str(&format!(
                "\tcase \"{}\":\n\t\treturn {v}FromJSON{args}(data.{v})\n",
                self.ctx.wire_name(v)
            ));
        }
        out.push_str("\t}\n\n");
        for v in union.variant_names() {
            out.push_str(&format!(
                "\tif data.{v} != nil {{\n\t\treturn {v}FromJSON{args}(data.{v})\n\t}}\n"
            ));
        }
        out.push_str(&format!(
            "\n\treturn nil, fmt.Errorf(\"{pkg}.{u}FromJSON: unknown type: %s\", data.Type)\n}}\n"
        ));
        self.section(out);
    }

    fn emit_union_to_json(&mut self, union: &UnionLike) {
        let u = &union.name;
        let pkg = &self.ctx.pkg_name;
        let decl = decl_params(self.ctx, &union.type_params);
        let args = use_params(&union.type_params);

        let mut out = format!(
            "func {u}ToJSON{decl}(x {u}{args}) ([]byte, error) {{\n\
             \tif x == nil {{\n\
             \t\treturn []byte(\"null\"), nil\n\
             \t}}\n\
             \treturn Match{u}R2(\n\
             \t\tx,\n"
        );
        for v in union.variant_names() {
            let rows = vec![
                vec!["Type:".to_string(), format!("\"{}\",", self.ctx.wire_name(v))],
                vec![format!("{v}:"), "body,".to_string()],
            ];
            out.push_str(&format!(
                "\t\tfunc(y *{v}{args}) ([]byte, error) {{\n\
                 \t\t\tbody, err := {v}ToJSON(y)\n\
                 \t\t\tif err != nil {{\n\
                 \t\t\t\treturn nil, fmt.Errorf(\"{pkg}.{v}ToJSON: %w\", err)\n\
                 \t\t\t}}\n\
                 \t\t\treturn json.Marshal({u}UnionJSON{{\n"
            ));
            out.push_str(&align_columns(&rows, "\t\t\t\t"));
            out.push_str("\t\t\t})\n\t\t},\n");
        }
        out.push_str("\t)\n}\n");
        self.section(out);
    }

    fn section(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(&text);
    }
}

/// `MarshalJSON`/`UnmarshalJSON` for one struct, with one pair of helper
/// methods per distinct field type.
pub struct StructCodec<'c, 'a> {
    ctx: &'c GenContext<'a>,
    st: &'c StructLike,
    emitted: HashSet<String>,
    helpers: String,
    output: String,
    uses_runtime: bool,
    warnings: Vec<(DiagnosticKind, String)>,
}

/// How a field appears in the JSON object.
struct WireField<'s> {
    name: &'s str,
    key: String,
    shape: &'s Shape,
    omit_empty: bool,
}

impl<'c, 'a> StructCodec<'c, 'a> {
    pub fn new(ctx: &'c GenContext<'a>, st: &'c StructLike) -> Self {
        // The struct's own methods double as the helper pair for fields
        // referring back to it.
        let emitted = HashSet::from([st.name.clone()]);
        Self {
            ctx,
            st,
            emitted,
            helpers: String::new(),
            output: String::new(),
            uses_runtime: false,
            warnings: Vec::new(),
        }
    }

    fn name(&self) -> &'c str {
        let st = self.st;
        &st.name
    }

    /// `Circle` or `Left[A, B]`.
    fn self_type(&self) -> String {
        format!("{}{}", self.st.name, use_params(&self.st.type_params))
    }

    /// Breadcrumb prefix for errors raised in `method`.
    fn crumb(&self, method: &str) -> String {
        format!("{}: {}.{method}", self.ctx.pkg_name, self.name())
    }

    fn wire_fields(&self) -> Vec<WireField<'c>> {
        let st = self.st;
        st.fields
            .iter()
            .filter_map(|f| {
                let json = f.tags.get("json");
                let key = match json {
                    Some(tag) if tag.value == "-" && tag.options.is_empty() => return None,
                    Some(tag) if !tag.value.is_empty() => tag.value.clone(),
                    _ => f.name.clone(),
                };
                Some(WireField {
                    name: &f.name,
                    key,
                    shape: &f.shape,
                    omit_empty: json.is_some_and(|t| t.has_option("omitempty")),
                })
            })
            .collect()
    }

    pub fn emit(&mut self) {
        let v = self.name();
        let pkg = self.ctx.pkg_name.clone();
        let decl = decl_params(self.ctx, &self.st.type_params);
        let ty = self.self_type();

        self.section(format!(
            "func {v}FromJSON{decl}(x []byte) (*{ty}, error) {{\n\
             \tresult := new({ty})\n\
             \terr := result.UnmarshalJSON(x)\n\
             \tif err != nil {{\n\
             \t\treturn nil, fmt.Errorf(\"{pkg}.{v}FromJSON: %w\", err)\n\
             \t}}\n\
             \treturn result, nil\n\
             }}\n"
        ));
        self.section(format!(
            "func {v}ToJSON{decl}(x *{ty}) ([]byte, error) {{\n\
             \treturn x.MarshalJSON()\n\
             }}\n"
        ));
        if self.st.type_params.is_empty() {
            let rows = vec![
                vec!["_ json.Unmarshaler".to_string(), format!("= (*{v})(nil)")],
                vec!["_ json.Marshaler".to_string(), format!("= (*{v})(nil)")],
            ];
            let mut out = String::from("var (\n");
            out.push_str(&align_columns(&rows, "\t"));
            out.push_str(")\n");
            self.section(out);
        }

        self.emit_marshal();
        self.emit_unmarshal();

        let helpers = std::mem::take(&mut self.helpers);
        if !helpers.is_empty() {
            self.output.push('\n');
            self.output.push_str(&helpers);
        }
    }

    fn emit_marshal(&mut self) {
        let v = self.name();
        let ty = self.self_type();
        let method = format!("_marshalJSON{v}");
        let crumb = self.crumb(&method);

        self.section(format!(
            "func (r *{ty}) MarshalJSON() ([]byte, error) {{\n\
             \tif r == nil {{\n\
             \t\treturn []byte(\"null\"), nil\n\
             \t}}\n\
             \treturn r.{method}(*r)\n\
             }}\n"
        ));

        let mut out = format!(
            "func (r *{ty}) {method}(x {ty}) ([]byte, error) {{\n\
             \tpartial := make(map[string]json.RawMessage)\n"
        );
        for field in self.wire_fields() {
            let helper = self.helper(field.shape);
            let var = format!("field{}", field.name);
            let access = format!("x.{}", field.name);
            let mut block = format!(
                "{var}, err := r._marshalJSON{helper}({access})\n\
                 if err != nil {{\n\
                 \treturn nil, fmt.Errorf(\"{crumb}: field {}; %w\", err)\n\
                 }}\n\
                 partial[\"{}\"] = {var}\n",
                field.name, field.key
            );
            let condition = if field.omit_empty {
                self.non_empty_check(field.shape, &access)
            } else {
                None
            };
            if let Some(condition) = condition {
                block = format!("if {condition} {{\n{}}}\n", indent(&block));
            }
            out.push_str(&indent(&block));
        }
        out.push_str(&format!(
            "\tresult, err := json.Marshal(partial)\n\
             \tif err != nil {{\n\
             \t\treturn nil, fmt.Errorf(\"{crumb}: struct; %w\", err)\n\
             \t}}\n\
             \treturn result, nil\n\
             }}\n"
        ));
        self.section(out);
    }

    fn emit_unmarshal(&mut self) {
        let v = self.name();
        let ty = self.self_type();
        let method = format!("_unmarshalJSON{v}");
        let crumb = self.crumb(&method);
        let outer = self.crumb("UnmarshalJSON");

        self.section(format!(
            "func (r *{ty}) UnmarshalJSON(data []byte) error {{\n\
             \tresult, err := r.{method}(data)\n\
             \tif err != nil {{\n\
             \t\treturn fmt.Errorf(\"{outer}: %w\", err)\n\
             \t}}\n\
             \t*r = result\n\
             \treturn nil\n\
             }}\n"
        ));

        let fields = self.wire_fields();
        let mut out = format!(
            "func (r *{ty}) {method}(data []byte) ({ty}, error) {{\n\
             \tresult := {ty}{{}}\n\
             \tvar partial map[string]json.RawMessage\n\
             \terr := json.Unmarshal(data, &partial)\n\
             \tif err != nil {{\n\
             \t\treturn result, fmt.Errorf(\"{crumb}: native struct unwrap; %w\", err)\n\
             \t}}\n\
             \tfor key := range partial {{\n\
             \t\tswitch key {{\n"
        );
        if !fields.is_empty() {
            let keys: Vec<String> = fields.iter().map(|f| format!("\"{}\"", f.key)).collect();
            out.push_str(&format!("\t\tcase {}:\n", keys.join(", ")));
        }
        out.push_str(&format!(
            "\t\tdefault:\n\
             \t\t\treturn result, fmt.Errorf(\"{crumb}: unknown key %q\", key)\n\
             \t\t}}\n\
             \t}}\n"
        ));
        for field in &fields {
            let helper = self.helper(field.shape);
            let var = format!("field{}", field.name);
            out.push_str(&format!(
                "\tif {var}, ok := partial[\"{key}\"]; ok {{\n\
                 \t\tresult.{name}, err = r._unmarshalJSON{helper}({var})\n\
                 \t\tif err != nil {{\n\
                 \t\t\treturn result, fmt.Errorf(\"{crumb}: field {name}; %w\", err)\n\
                 \t\t}}\n\
                 \t}}\n",
                key = field.key,
                name = field.name,
            ));
        }
        out.push_str("\treturn result, nil\n}\n");
        self.section(out);
    }

    /// Go expression that is true when `access` holds a non-empty value.
    fn non_empty_check(&self, shape: &Shape, access: &str) -> Option<String> {
        match self.underlying(shape) {
            Shape::ListLike(l) if l.array_len.is_none() => Some(format!("len({access}) != 0")),
            Shape::MapLike(_) => Some(format!("len({access}) != 0")),
            Shape::PointerLike(_) | Shape::Any => Some(format!("{access} != nil")),
            Shape::PrimitiveLike(p) => Some(match p.kind {
                PrimitiveKind::String => format!("{access} != \"\""),
                PrimitiveKind::Boolean => access.to_string(),
                PrimitiveKind::Number(_) => format!("{access} != 0"),
            }),
            _ => None,
        }
    }

    /// Alias-of-primitive references resolve to their primitive target.
    fn underlying(&self, shape: &Shape) -> Shape {
        if let Shape::RefName(r) = shape
            && let Some(target) = self.primitive_alias(r)
        {
            return Shape::primitive(target);
        }
        shape.clone()
    }

    fn primitive_alias(&self, reference: &RefName) -> Option<PrimitiveKind> {
        if reference.is_pointer || !reference.indexed.is_empty() {
            return None;
        }
        let resolved = self.ctx.resolve(reference)?;
        match &*resolved {
            Shape::AliasLike(alias) => match &*alias.target {
                Shape::PrimitiveLike(p) => Some(p.kind),
                _ => None,
            },
            _ => None,
        }
    }

    fn is_type_param(&self, reference: &RefName) -> bool {
        reference.pkg_name.is_empty()
            && reference.indexed.is_empty()
            && self.st.type_params.iter().any(|p| p.name == reference.name)
    }

    /// Name suffix of the helper pair for `shape`, emitting it on first use.
    fn helper(&mut self, shape: &Shape) -> String {
        let suffix = self.suffix(shape);
        if self.emitted.insert(suffix.clone()) {
            let go = self.ctx.go_type(shape);
            let (marshal, unmarshal) = self.helper_bodies(shape, &suffix, &go);
            let ty = self.self_type();
            self.helpers_section(format!(
                "func (r *{ty}) _marshalJSON{suffix}(x {go}) ([]byte, error) {{\n{marshal}}}\n"
            ));
            self.helpers_section(format!(
                "func (r *{ty}) _unmarshalJSON{suffix}(data []byte) ({go}, error) {{\n{unmarshal}}}\n"
            ));
        }
        suffix
    }

    fn suffix(&self, shape: &Shape) -> String {
        let raw = match shape {
            Shape::Any => "any".to_string(),
            Shape::PrimitiveLike(p) => p.kind.go_name().to_string(),
            Shape::ListLike(l) => match l.array_len {
                Some(n) => format!("Array{n}_{}", self.suffix(&l.element)),
                None => format!("Slice_{}", self.suffix(&l.element)),
            },
            Shape::MapLike(m) => format!("Map_{}_{}", self.suffix(&m.key), self.suffix(&m.value)),
            Shape::PointerLike(p) => format!("Ptr_{}", self.suffix(&p.inner)),
            Shape::RefName(r) => {
                let mut out = String::new();
                if r.is_pointer {
                    out.push_str("Ptr_");
                }
                if self.ctx.types.needs_qualifier(&r.pkg_name, &r.pkg_import_name) {
                    out.push_str(&r.pkg_name);
                    out.push('_');
                }
                out.push_str(&r.name);
                for arg in &r.indexed {
                    out.push('_');
                    out.push_str(&self.suffix(arg));
                }
                out
            }
            named => named.name().unwrap_or("any").to_string(),
        };
        sanitize_ident(&raw)
    }

    /// Bodies (without signature) of the marshal and unmarshal helpers.
    fn helper_bodies(&mut self, shape: &Shape, suffix: &str, go: &str) -> (String, String) {
        let m = self.crumb(&format!("_marshalJSON{suffix}"));
        let u = self.crumb(&format!("_unmarshalJSON{suffix}"));

        match shape {
            Shape::ListLike(list) => {
                let element = self.helper(&list.element);
                let marshal_nil = if list.array_len.is_none() {
                    "\tif x == nil {\n\t\treturn []byte(\"null\"), nil\n\t}\n"
                } else {
                    ""
                };
                let marshal = format!(
                    "{marshal_nil}\
                     \tpartial := make([]json.RawMessage, len(x))\n\
                     \tfor i, v := range x {{\n\
                     \t\titem, err := r._marshalJSON{element}(v)\n\
                     \t\tif err != nil {{\n\
                     \t\t\treturn nil, fmt.Errorf(\"{m}: at index %d; %w\", i, err)\n\
                     \t\t}}\n\
                     \t\tpartial[i] = item\n\
                     \t}}\n\
                     \tresult, err := json.Marshal(partial)\n\
                     \tif err != nil {{\n\
                     \t\treturn nil, fmt.Errorf(\"{m}: overall; %w\", err)\n\
                     \t}}\n\
                     \treturn result, nil\n"
                );
                let unmarshal = match list.array_len {
                    None => {
                        let element_go = self.ctx.go_type(&list.element);
                        format!(
                            "\tif len(data) == 0 || string(data) == \"null\" {{\n\
                             \t\treturn nil, nil\n\
                             \t}}\n\
                             \tvar partial []json.RawMessage\n\
                             \terr := json.Unmarshal(data, &partial)\n\
                             \tif err != nil {{\n\
                             \t\treturn nil, fmt.Errorf(\"{u}: native list unwrap; %w\", err)\n\
                             \t}}\n\
                             \tresult := make([]{element_go}, len(partial))\n\
                             \tfor i, v := range partial {{\n\
                             \t\titem, err := r._unmarshalJSON{element}(v)\n\
                             \t\tif err != nil {{\n\
                             \t\t\treturn nil, fmt.Errorf(\"{u}: at index %d; %w\", i, err)\n\
                             \t\t}}\n\
                             \t\tresult[i] = item\n\
                             \t}}\n\
                             \treturn result, nil\n"
                        )
                    }
                    Some(n) => format!(
                        "\tvar result {go}\n\
                         \tif len(data) == 0 || string(data) == \"null\" {{\n\
                         \t\treturn result, nil\n\
                         \t}}\n\
                         \tvar partial []json.RawMessage\n\
                         \terr := json.Unmarshal(data, &partial)\n\
                         \tif err != nil {{\n\
                         \t\treturn result, fmt.Errorf(\"{u}: native array unwrap; %w\", err)\n\
                         \t}}\n\
                         \tif len(partial) > {n} {{\n\
                         \t\treturn result, fmt.Errorf(\"{u}: expected at most {n} elements, got %d\", len(partial))\n\
                         \t}}\n\
                         \tfor i, v := range partial {{\n\
                         \t\titem, err := r._unmarshalJSON{element}(v)\n\
                         \t\tif err != nil {{\n\
                         \t\t\treturn result, fmt.Errorf(\"{u}: at index %d; %w\", i, err)\n\
                         \t\t}}\n\
                         \t\tresult[i] = item\n\
                         \t}}\n\
                         \treturn result, nil\n"
                    ),
                };
                (marshal, unmarshal)
            }
            Shape::MapLike(map) => self.map_bodies(map, go, &m, &u),
            Shape::PointerLike(pointer) => {
                let inner = self.helper(&pointer.inner);
                let marshal = format!(
                    "\tif x == nil {{\n\
                     \t\treturn []byte(\"null\"), nil\n\
                     \t}}\n\
                     \treturn r._marshalJSON{inner}(*x)\n"
                );
                let unmarshal = format!(
                    "\tif len(data) == 0 || string(data) == \"null\" {{\n\
                     \t\treturn nil, nil\n\
                     \t}}\n\
                     \tresult, err := r._unmarshalJSON{inner}(data)\n\
                     \tif err != nil {{\n\
                     \t\treturn nil, fmt.Errorf(\"{u}: pointer; %w\", err)\n\
                     \t}}\n\
                     \treturn &result, nil\n"
                );
                (marshal, unmarshal)
            }
            Shape::RefName(reference) => self.ref_bodies(reference, go, &m, &u),
            // Primitives, `any` and inline declarations use encoding/json.
            _ => native_bodies(go, &m, &u),
        }
    }

    fn map_bodies(&mut self, map: &MapLike, go: &str, m: &str, u: &str) -> (String, String) {
        let value = self.helper(&map.value);
        let key_go = self.ctx.go_type(&map.key);
        let string_key = matches!(
            self.underlying(&map.key),
            Shape::PrimitiveLike(p) if p.kind == PrimitiveKind::String
        );

        let (marshal_key, unmarshal_key) = if string_key {
            (
                "\t\tkey := string(k)\n".to_string(),
                format!("\t\tkey := {key_go}(k)\n"),
            )
        } else {
            let key = self.helper(&map.key);
            (
                format!(
                    "\t\trawKey, err := r._marshalJSON{key}(k)\n\
                     \t\tif err != nil {{\n\
                     \t\t\treturn nil, fmt.Errorf(\"{m}: key %v; %w\", k, err)\n\
                     \t\t}}\n\
                     \t\tkey := string(rawKey)\n\
                     \t\tif len(rawKey) > 0 && rawKey[0] == '\"' {{\n\
                     \t\t\tif err := json.Unmarshal(rawKey, &key); err != nil {{\n\
                     \t\t\t\treturn nil, fmt.Errorf(\"{m}: key %v; %w\", k, err)\n\
                     \t\t\t}}\n\
                     \t\t}}\n"
                ),
                format!(
                    "\t\tkey, err := r._unmarshalJSON{key}([]byte(k))\n\
                     \t\tif err != nil {{\n\
                     \t\t\tquoted, _ := json.Marshal(k)\n\
                     \t\t\tkey, err = r._unmarshalJSON{key}(quoted)\n\
                     \t\t}}\n\
                     \t\tif err != nil {{\n\
                     \t\t\treturn nil, fmt.Errorf(\"{u}: key %s; %w\", k, err)\n\
                     \t\t}}\n"
                ),
            )
        };

        let marshal = format!(
            "\tif x == nil {{\n\
             \t\treturn []byte(\"null\"), nil\n\
             \t}}\n\
             \tpartial := make(map[string]json.RawMessage, len(x))\n\
             \tfor k, v := range x {{\n\
             {marshal_key}\
             \t\tvalue, err := r._marshalJSON{value}(v)\n\
             \t\tif err != nil {{\n\
             \t\t\treturn nil, fmt.Errorf(\"{m}: value at key %v; %w\", k, err)\n\
             \t\t}}\n\
             \t\tpartial[key] = value\n\
             \t}}\n\
             \tresult, err := json.Marshal(partial)\n\
             \tif err != nil {{\n\
             \t\treturn nil, fmt.Errorf(\"{m}: overall; %w\", err)\n\
             \t}}\n\
             \treturn result, nil\n"
        );
        let unmarshal = format!(
            "\tif len(data) == 0 || string(data) == \"null\" {{\n\
             \t\treturn nil, nil\n\
             \t}}\n\
             \tvar partial map[string]json.RawMessage\n\
             \terr := json.Unmarshal(data, &partial)\n\
             \tif err != nil {{\n\
             \t\treturn nil, fmt.Errorf(\"{u}: native map unwrap; %w\", err)\n\
             \t}}\n\
             \tresult := make({go}, len(partial))\n\
             \tfor k, v := range partial {{\n\
             {unmarshal_key}\
             \t\tvalue, err := r._unmarshalJSON{value}(v)\n\
             \t\tif err != nil {{\n\
             \t\t\treturn nil, fmt.Errorf(\"{u}: value at key %s; %w\", k, err)\n\
             \t\t}}\n\
             \t\tresult[key] = value\n\
             \t}}\n\
             \treturn result, nil\n"
        );
        (marshal, unmarshal)
    }

    fn ref_bodies(&mut self, reference: &RefName, go: &str, m: &str, u: &str) -> (String, String) {
        if let Some(kind) = self.primitive_alias(reference) {
            let prim = kind.go_name();
            let marshal = format!(
                "\tresult, err := json.Marshal({prim}(x))\n\
                 \tif err != nil {{\n\
                 \t\treturn nil, fmt.Errorf(\"{m}: %w\", err)\n\
                 \t}}\n\
                 \treturn result, nil\n"
            );
            let unmarshal = format!(
                "\tvar result {prim}\n\
                 \terr := json.Unmarshal(data, &result)\n\
                 \tif err != nil {{\n\
                 \t\treturn {go}(result), fmt.Errorf(\"{u}: native primitive unwrap; %w\", err)\n\
                 \t}}\n\
                 \treturn {go}(result), nil\n"
            );
            return (marshal, unmarshal);
        }

        // Imported under an alias the file never declares: nothing to
        // dispatch on, pass the raw JSON through encoding/json.
        if !reference.pkg_name.is_empty() && reference.pkg_import_name.is_empty() {
            self.warnings.push((
                DiagnosticKind::OpaqueCodec,
                format!("`{go}` is encoded with encoding/json as is"),
            ));
            return native_bodies(go, m, u);
        }

        let local = reference.refers_to(
            &reference.name,
            &self.ctx.pkg_name,
            &self.ctx.pkg_import,
        ) && !reference.pkg_name.is_empty();
        if local && self.ctx.resolve(reference).is_none() {
            self.warnings.push((
                DiagnosticKind::UnresolvedReference,
                go.to_string(),
            ));
        }
        if self.is_type_param(reference) {
            tracing::trace!(param = %reference.name, "type parameter codec via registry");
        }

        self.uses_runtime = true;
        let shared = self.ctx.runtime_pkg();
        let marshal = format!(
            "\tresult, err := {shared}.JSONMarshal[{go}](x)\n\
             \tif err != nil {{\n\
             \t\treturn nil, fmt.Errorf(\"{m}: %w\", err)\n\
             \t}}\n\
             \treturn result, nil\n"
        );
        let unmarshal = format!(
            "\tresult, err := {shared}.JSONUnmarshal[{go}](data)\n\
             \tif err != nil {{\n\
             \t\treturn result, fmt.Errorf(\"{u}: %w\", err)\n\
             \t}}\n\
             \treturn result, nil\n"
        );
        (marshal, unmarshal)
    }

    fn section(&mut self, text: String) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(&text);
    }

    fn helpers_section(&mut self, text: String) {
        if !self.helpers.is_empty() {
            self.helpers.push('\n');
        }
        self.helpers.push_str(&text);
    }
}

/// Helpers delegating to encoding/json.
fn native_bodies(go: &str, m: &str, u: &str) -> (String, String) {
    let marshal = format!(
        "\tresult, err := json.Marshal(x)\n\
         \tif err != nil {{\n\
         \t\treturn nil, fmt.Errorf(\"{m}: %w\", err)\n\
         \t}}\n\
         \treturn result, nil\n"
    );
    let unmarshal = format!(
        "\tvar result {go}\n\
         \terr := json.Unmarshal(data, &result)\n\
         \tif err != nil {{\n\
         \t\treturn result, fmt.Errorf(\"{u}: native primitive unwrap; %w\", err)\n\
         \t}}\n\
         \treturn result, nil\n"
    );
    (marshal, unmarshal)
}

/// Indent every non-empty line by one tab.
fn indent(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if !line.is_empty() {
            out.push('\t');
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
