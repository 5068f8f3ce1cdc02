//! Depth-first and breadth-first reducers over recursive unions.
//!
//! Children are the fields returned by `child_refs`, visited in field
//! declaration order. The breadth-first walk keeps a visited set keyed by
//! the interface value, so a node shared by several parents is reduced once.

use sumgen_core::{ChildKind, ChildRef, ImportSet, Shape, UnionLike, child_refs};

use super::{
    GenContext, Generated, align_columns, decl_params_with, fresh_name, use_params,
    use_params_with,
};

pub struct ReducerGenerator<'c, 'a> {
    ctx: &'c GenContext<'a>,
    union: &'c UnionLike,
    /// Accumulator type parameter name.
    acc: String,
    output: String,
}

impl<'c, 'a> ReducerGenerator<'c, 'a> {
    pub fn new(ctx: &'c GenContext<'a>, union: &'c UnionLike) -> Self {
        let taken: Vec<&str> = union.type_params.iter().map(|p| p.name.as_str()).collect();
        Self {
            ctx,
            union,
            acc: fresh_name("A", &taken),
            output: String::new(),
        }
    }

    pub fn generate(mut self) -> Generated {
        self.emit_reducer_interface();
        self.emit_depth_first();
        self.emit_breadth_first();
        self.emit_default_reduction();

        Generated {
            body: self.output,
            imports: ImportSet::new(),
        }
    }

    fn u(&self) -> &'c str {
        let union = self.union;
        &union.name
    }

    fn is_generic(&self) -> bool {
        !self.union.type_params.is_empty()
    }

    /// `Name[A, B]` with the union's params.
    fn with_params(&self, name: &str) -> String {
        format!("{name}{}", use_params(&self.union.type_params))
    }

    /// `Name[A, B, Acc]`: the union's params plus the accumulator.
    fn with_acc(&self, name: &str) -> String {
        format!(
            "{name}{}",
            use_params_with(&self.union.type_params, std::slice::from_ref(&self.acc))
        )
    }

    fn decl_with_acc(&self) -> String {
        decl_params_with(
            self.ctx,
            &self.union.type_params,
            std::slice::from_ref(&self.acc),
        )
    }

    fn variants(&self) -> Vec<&'c Shape> {
        let union = self.union;
        union.variants.iter().collect()
    }

    fn emit_reducer_interface(&mut self) {
        let u = self.u();
        let acc = self.acc.clone();
        let mut out = format!("type {u}Reducer{} interface {{\n", self.decl_with_acc());
        for variant in self.variants() {
            let Some(v) = variant.name() else { continue };
            out.push_str(&format!(
                "\tReduce{v}(x *{}, agg {acc}) (result {acc}, stop bool)\n",
                self.with_params(v)
            ));
        }
        out.push_str("}\n");
        self.section(out);
    }

    fn emit_depth_first(&mut self) {
        let u = self.u();
        let acc = self.acc.clone();
        let this = self.with_acc(&format!("{u}DepthFirstVisitor"));
        let reducer = self.with_acc(&format!("{u}Reducer"));

        let rows = vec![
            vec!["stop".to_string(), "bool".to_string()],
            vec!["result".to_string(), acc.clone()],
            vec!["reduce".to_string(), reducer.clone()],
        ];
        let mut out = format!(
            "type {u}DepthFirstVisitor{} struct {{\n",
            self.decl_with_acc()
        );
        out.push_str(&align_columns(&rows, "\t"));
        out.push_str("}\n");
        self.section(out);

        if !self.is_generic() {
            self.section(format!(
                "var _ {u}Visitor = (*{u}DepthFirstVisitor[any])(nil)\n"
            ));
        }

        for variant in self.variants() {
            let Some(v) = variant.name() else { continue };
            let children = child_refs(self.union, variant);

            let mut out = format!(
                "func (d *{this}) Visit{v}(v *{}) any {{\n",
                self.with_params(v)
            );
            out.push_str(&format!(
                "\td.result, d.stop = d.reduce.Reduce{v}(v, d.result)\n"
            ));
            if !children.is_empty() {
                out.push_str("\tif d.stop {\n\t\treturn nil\n\t}\n");
                let body = format!("child.Accept{u}(d)\nif d.stop {{\n\treturn nil\n}}\n");
                for child in &children {
                    out.push_str(&walk_child(variant, child, &body));
                }
            }
            out.push_str("\n\treturn nil\n}\n");
            self.section(out);
        }

        let rows = vec![
            vec!["result:".to_string(), "init,".to_string()],
            vec!["reduce:".to_string(), "r,".to_string()],
        ];
        let mut out = format!(
            "func Reduce{u}DepthFirst{}(r {reducer}, v {}, init {acc}) {acc} {{\n",
            self.decl_with_acc(),
            self.with_params(u)
        );
        out.push_str("\tif v == nil {\n\t\treturn init\n\t}\n\n");
        out.push_str(&format!("\treducer := &{this}{{\n"));
        out.push_str(&align_columns(&rows, "\t\t"));
        out.push_str("\t}\n\n");
        out.push_str(&format!("\t_ = v.Accept{u}(reducer)\n\n"));
        out.push_str("\treturn reducer.result\n}\n");
        self.section(out);
    }

    fn emit_breadth_first(&mut self) {
        let u = self.u();
        let acc = self.acc.clone();
        let this = self.with_acc(&format!("{u}BreadthFirstVisitor"));
        let reducer = self.with_acc(&format!("{u}Reducer"));
        let iface = self.with_params(u);

        let rows = vec![
            vec!["stop".to_string(), "bool".to_string()],
            vec!["result".to_string(), acc.clone()],
            vec!["reduce".to_string(), reducer.clone()],
            vec!["queue".to_string(), format!("[]{iface}")],
            vec!["visited".to_string(), format!("map[{iface}]bool")],
        ];
        let mut out = format!(
            "type {u}BreadthFirstVisitor{} struct {{\n",
            self.decl_with_acc()
        );
        out.push_str(&align_columns(&rows, "\t"));
        out.push_str("}\n");
        self.section(out);

        if !self.is_generic() {
            self.section(format!(
                "var _ {u}Visitor = (*{u}BreadthFirstVisitor[any])(nil)\n"
            ));
        }

        for variant in self.variants() {
            let Some(v) = variant.name() else { continue };
            let children = child_refs(self.union, variant);

            let mut out = format!(
                "func (d *{this}) Visit{v}(v *{}) any {{\n",
                self.with_params(v)
            );
            for child in &children {
                out.push_str(&walk_child(variant, child, "d.queue = append(d.queue, child)\n"));
            }
            if !children.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!(
                "\td.result, d.stop = d.reduce.Reduce{v}(v, d.result)\n\treturn nil\n}}\n"
            ));
            self.section(out);
        }

        self.section(format!(
            "func (d *{this}) execute() {{\n\
             \tfor len(d.queue) > 0 && !d.stop {{\n\
             \t\tnode := d.pop()\n\
             \t\tif d.visited[node] {{\n\
             \t\t\tcontinue\n\
             \t\t}}\n\
             \t\td.visited[node] = true\n\
             \t\tnode.Accept{u}(d)\n\
             \t}}\n\
             }}\n"
        ));

        self.section(format!(
            "func (d *{this}) pop() {iface} {{\n\
             \tnode := d.queue[0]\n\
             \td.queue = d.queue[1:]\n\
             \treturn node\n\
             }}\n"
        ));

        let rows = vec![
            vec!["result:".to_string(), "init,".to_string()],
            vec!["reduce:".to_string(), "r,".to_string()],
            vec!["queue:".to_string(), format!("[]{iface}{{v}},")],
            vec!["visited:".to_string(), format!("make(map[{iface}]bool),")],
        ];
        let mut out = format!(
            "func Reduce{u}BreadthFirst{}(r {reducer}, v {iface}, init {acc}) {acc} {{\n",
            self.decl_with_acc()
        );
        out.push_str("\tif v == nil {\n\t\treturn init\n\t}\n\n");
        out.push_str(&format!("\treducer := &{this}{{\n"));
        out.push_str(&align_columns(&rows, "\t\t"));
        out.push_str("\t}\n\n");
        out.push_str("\treducer.execute()\n\n");
        out.push_str("\treturn reducer.result\n}\n");
        self.section(out);
    }

    fn emit_default_reduction(&mut self) {
        let u = self.u();
        let acc = self.acc.clone();
        let this = self.with_acc(&format!("{u}DefaultReduction"));

        let mut rows = vec![
            vec!["PanicOnFallback".to_string(), "bool".to_string()],
            vec!["DefaultStopReduction".to_string(), "bool".to_string()],
        ];
        for variant in self.variants() {
            let Some(v) = variant.name() else { continue };
            rows.push(vec![
                format!("On{v}"),
                format!("func(x *{}, agg {acc}) ({acc}, bool)", self.with_params(v)),
            ]);
        }
        let mut out = format!(
            "type {u}DefaultReduction{} struct {{\n",
            self.decl_with_acc()
        );
        out.push_str(&align_columns(&rows, "\t"));
        out.push_str("}\n");
        self.section(out);

        if !self.is_generic() {
            self.section(format!(
                "var _ {u}Reducer[any] = (*{u}DefaultReduction[any])(nil)\n"
            ));
        }

        for variant in self.variants() {
            let Some(v) = variant.name() else { continue };
            self.section(format!(
                "func (t *{this}) Reduce{v}(x *{}, agg {acc}) ({acc}, bool) {{\n\
                 \tif t.On{v} != nil {{\n\
                 \t\treturn t.On{v}(x, agg)\n\
                 \t}}\n\
                 \tif t.PanicOnFallback {{\n\
                 \t\tpanic(\"no fallback allowed on undefined Reduce{v}\")\n\
                 \t}}\n\
                 \treturn agg, t.DefaultStopReduction\n\
                 }}\n",
                self.with_params(v)
            ));
        }
    }

    fn section(&mut self, text: String) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(&text);
    }
}

/// Bind every non-nil union value held by `child` to `child` and run `body`
/// for it. `body` lines are written unindented.
fn walk_child(variant: &Shape, child: &ChildRef, body: &str) -> String {
    let field = format!("v.{}", child.field);
    let pointer = variant
        .as_struct()
        .and_then(|st| st.field(&child.field))
        .is_some_and(|f| holds_pointer(&f.shape, child.kind));

    let mut out = String::new();
    match (child.kind, pointer) {
        (ChildKind::Direct, false) => {
            out.push_str(&format!("\tif child := {field}; child != nil {{\n"));
        }
        (ChildKind::Direct, true) => {
            out.push_str(&format!(
                "\tif ptr := {field}; ptr != nil && *ptr != nil {{\n\t\tchild := *ptr\n"
            ));
        }
        (ChildKind::ListElements | ChildKind::MapValues, false) => {
            out.push_str(&format!(
                "\tfor _, child := range {field} {{\n\t\tif child == nil {{\n\t\t\tcontinue\n\t\t}}\n"
            ));
        }
        (ChildKind::ListElements | ChildKind::MapValues, true) => {
            out.push_str(&format!(
                "\tfor _, ptr := range {field} {{\n\
                 \t\tif ptr == nil || *ptr == nil {{\n\
                 \t\t\tcontinue\n\
                 \t\t}}\n\
                 \t\tchild := *ptr\n"
            ));
        }
    }
    for line in body.lines() {
        out.push_str("\t\t");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("\t}\n");
    out
}

/// Whether the union values held by a child field sit behind a pointer.
fn holds_pointer(shape: &Shape, kind: ChildKind) -> bool {
    match (kind, shape.unwrap_pointer()) {
        (ChildKind::Direct, _) => shape.is_pointer() && !matches!(shape, Shape::RefName(_)),
        (ChildKind::ListElements, Shape::ListLike(list)) => list.element.is_pointer(),
        (ChildKind::MapValues, Shape::MapLike(map)) => map.value.is_pointer(),
        _ => false,
    }
}
