//! Union dispatch: visitor, accept methods, OneOf carrier, match functions
//! and the default visitor.

use sumgen_core::{ImportSet, Shape, UnionLike};

use super::{
    GenContext, Generated, align_columns, decl_params, decl_params_with, fresh_name, result_params,
    results, use_params, use_params_with,
};

/// Highest result arity of the generated `Match<U>R<n>` functions.
pub const MAX_MATCH_RESULTS: usize = 3;

pub struct UnionGenerator<'c, 'a> {
    ctx: &'c GenContext<'a>,
    union: &'c UnionLike,
    output: String,
}

impl<'c, 'a> UnionGenerator<'c, 'a> {
    pub fn new(ctx: &'c GenContext<'a>, union: &'c UnionLike) -> Self {
        Self {
            ctx,
            union,
            output: String::new(),
        }
    }

    pub fn generate(mut self) -> Generated {
        self.emit_visitor();
        self.emit_interface();
        self.emit_accept_methods();
        self.emit_one_of();
        for arity in 0..=MAX_MATCH_RESULTS {
            self.emit_match(arity);
        }
        self.emit_default_visitor();

        let mut imports = ImportSet::new();
        for param in &self.union.type_params {
            imports.merge(&self.ctx.imports_of(&param.constraint));
        }

        Generated {
            body: self.output,
            imports,
        }
    }

    fn name(&self) -> &str {
        &self.union.name
    }

    fn is_generic(&self) -> bool {
        !self.union.type_params.is_empty()
    }

    /// `Name[A, B]` with the union's params.
    fn with_params(&self, name: &str) -> String {
        format!("{name}{}", use_params(&self.union.type_params))
    }

    fn variants(&self) -> Vec<&'c str> {
        let union = self.union;
        union.variants.iter().filter_map(Shape::name).collect()
    }

    fn emit_visitor(&mut self) {
        let u = self.name().to_string();
        let decl = decl_params(self.ctx, &self.union.type_params);

        let mut out = format!("type {u}Visitor{decl} interface {{\n");
        for v in self.variants() {
            out.push_str(&format!("\tVisit{v}(v *{}) any\n", self.with_params(v)));
        }
        out.push_str("}\n");
        self.section(out);
    }

    fn emit_interface(&mut self) {
        let u = self.name().to_string();
        let decl = decl_params(self.ctx, &self.union.type_params);
        let visitor = self.with_params(&format!("{u}Visitor"));

        self.section(format!(
            "type {u}{decl} interface {{\n\tAccept{u}(g {visitor}) any\n}}\n"
        ));
    }

    fn emit_accept_methods(&mut self) {
        let u = self.name().to_string();
        let visitor = self.with_params(&format!("{u}Visitor"));

        if !self.is_generic() {
            let mut out = String::from("var (\n");
            for v in self.variants() {
                out.push_str(&format!("\t_ {u} = (*{v})(nil)\n"));
            }
            out.push_str(")\n");
            self.section(out);
        }

        let mut out = String::new();
        for v in self.variants() {
            out.push_str(&format!(
                "func (r *{}) Accept{u}(v {visitor}) any {{ return v.Visit{v}(r) }}\n",
                self.with_params(v)
            ));
        }
        self.section(out);
    }

    fn emit_one_of(&mut self) {
        let u = self.name().to_string();
        let decl = decl_params(self.ctx, &self.union.type_params);
        let carrier = self.with_params(&format!("{u}OneOf"));
        let visitor = self.with_params(&format!("{u}Visitor"));
        let iface = self.with_params(&u);

        let rows: Vec<Vec<String>> = self
            .variants()
            .into_iter()
            .map(|v| {
                vec![
                    v.to_string(),
                    format!("*{}", self.with_params(v)),
                    "`json:\",omitempty\"`".to_string(),
                ]
            })
            .collect();
        let mut out = format!("type {u}OneOf{decl} struct {{\n");
        out.push_str(&align_columns(&rows, "\t"));
        out.push_str("}\n");
        self.section(out);

        self.section(format!(
            "func (r *{carrier}) Accept{u}(v {visitor}) any {{ return r.Unwrap().Accept{u}(v) }}\n"
        ));

        let mut out = format!("func (r *{carrier}) Unwrap() {iface} {{\n\tswitch {{\n");
        for v in self.variants() {
            out.push_str(&format!("\tcase r.{v} != nil:\n\t\treturn r.{v}\n"));
        }
        out.push_str("\t}\n\n");
        out.push_str(&format!("\tpanic(\"{u}OneOf: no variant populated\")\n}}\n"));
        self.section(out);

        if !self.is_generic() {
            self.section(format!("var _ {u} = (*{u}OneOf)(nil)\n"));
        }
    }

    /// `Match<U>R<arity>`: one handler per variant, results of `arity` types.
    fn emit_match(&mut self, arity: usize) {
        let u = self.name().to_string();
        let union = self.union;
        let params = &union.type_params;
        let outs = result_params("T", arity, params);
        let decl = decl_params_with(self.ctx, params, &outs);
        let ret = results(&outs);
        let func = format!("Match{u}R{arity}");

        let mut out = format!("func {func}{decl}(\n\tx {},\n", self.with_params(&u));
        let variants = self.variants();
        for (i, v) in variants.iter().enumerate() {
            let handler_ret = if ret.is_empty() {
                String::new()
            } else {
                format!(" {ret}")
            };
            out.push_str(&format!(
                "\tf{} func(x *{}){handler_ret},\n",
                i + 1,
                self.with_params(v)
            ));
        }
        if ret.is_empty() {
            out.push_str(") {\n");
        } else {
            out.push_str(&format!(") {ret} {{\n"));
        }

        let handlers: Vec<String> = (1..=variants.len()).map(|i| format!("f{i}")).collect();
        let keyword = if arity == 0 { "" } else { "return " };
        out.push_str("\tswitch v := x.(type) {\n");
        for (i, v) in variants.iter().enumerate() {
            out.push_str(&format!(
                "\tcase *{}:\n\t\t{keyword}f{}(v)\n",
                self.with_params(v),
                i + 1
            ));
        }
        out.push_str(&format!(
            "\tcase *{}:\n\t\t{keyword}{func}(v.Unwrap(), {})\n",
            self.with_params(&format!("{u}OneOf")),
            handlers.join(", ")
        ));
        out.push_str("\t}\n");

        if arity > 0 {
            out.push('\n');
            let mut names = Vec::new();
            for (i, ty) in outs.iter().enumerate() {
                out.push_str(&format!("\tvar result{} {ty}\n", i + 1));
                names.push(format!("result{}", i + 1));
            }
            out.push_str(&format!("\treturn {}\n", names.join(", ")));
        }
        out.push_str("}\n");
        self.section(out);
    }

    fn emit_default_visitor(&mut self) {
        let u = self.name().to_string();
        let union = self.union;
        let params = &union.type_params;
        let taken: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        let acc = fresh_name("A", &taken);
        let extra = vec![acc.clone()];
        let decl = decl_params_with(self.ctx, params, &extra);
        let this = format!("{u}DefaultVisitor{}", use_params_with(params, &extra));

        let mut rows = vec![vec!["Default".to_string(), acc.clone()]];
        for v in self.variants() {
            rows.push(vec![
                format!("On{v}"),
                format!("func(x *{}) {acc}", self.with_params(v)),
            ]);
        }
        let mut out = format!("type {u}DefaultVisitor{decl} struct {{\n");
        out.push_str(&align_columns(&rows, "\t"));
        out.push_str("}\n");
        self.section(out);

        if !self.is_generic() {
            self.section(format!(
                "var _ {u}Visitor = (*{u}DefaultVisitor[any])(nil)\n"
            ));
        }

        for v in self.variants() {
            self.section(format!(
                "func (t *{this}) Visit{v}(v *{}) any {{\n\
                 \tif t.On{v} != nil {{\n\
                 \t\treturn t.On{v}(v)\n\
                 \t}}\n\
                 \treturn t.Default\n\
                 }}\n",
                self.with_params(v)
            ));
        }
    }

    /// Append a top-level declaration, separated from the previous one by a
    /// blank line.
    fn section(&mut self, text: String) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(&text);
    }
}
