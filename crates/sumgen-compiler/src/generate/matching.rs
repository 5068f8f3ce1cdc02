//! Match functions for `mkmatch` declarations.
//!
//! Cases are tested top to bottom by type assertion; the first case whose
//! every non-`any` position matches wins.

use sumgen_core::{ImportSet, MatchDecl, Shape};

use super::{GenContext, Generated, decl_params_with, result_params, results};
use super::union::MAX_MATCH_RESULTS;

pub struct MatchGenerator<'c, 'a> {
    ctx: &'c GenContext<'a>,
    decl: &'c MatchDecl,
    output: String,
}

impl<'c, 'a> MatchGenerator<'c, 'a> {
    pub fn new(ctx: &'c GenContext<'a>, decl: &'c MatchDecl) -> Self {
        Self {
            ctx,
            decl,
            output: String::new(),
        }
    }

    pub fn generate(mut self) -> Generated {
        for arity in 0..=MAX_MATCH_RESULTS {
            self.emit_match(arity);
        }

        let mut imports = ImportSet::new();
        for param in &self.decl.type_params {
            imports.merge(&self.ctx.imports_of(&param.constraint));
        }
        for case in &self.decl.cases {
            for input in &case.inputs {
                imports.merge(&self.ctx.imports_of(input));
            }
        }

        Generated {
            body: self.output,
            imports,
        }
    }

    fn emit_match(&mut self, arity: usize) {
        let decl = self.decl;
        let outs = result_params("TOut", arity, &decl.type_params);
        let ret = results(&outs);
        let func = format!("{}R{arity}", decl.name);

        let mut out = format!(
            "func {func}{}(\n",
            decl_params_with(self.ctx, &decl.type_params, &outs)
        );
        for (i, param) in decl.type_params.iter().enumerate() {
            out.push_str(&format!("\tt{i} {},\n", param.name));
        }
        for (c, case) in decl.cases.iter().enumerate() {
            let inputs: Vec<String> = case
                .inputs
                .iter()
                .enumerate()
                .map(|(i, input)| format!("x{i} {}", self.ctx.go_type(input)))
                .collect();
            let handler_ret = if ret.is_empty() {
                String::new()
            } else {
                format!(" {ret}")
            };
            out.push_str(&format!(
                "\tf{} func({}){handler_ret},\n",
                c + 1,
                inputs.join(", ")
            ));
        }
        if ret.is_empty() {
            out.push_str(") {\n");
        } else {
            out.push_str(&format!(") {ret} {{\n"));
        }

        let mut blocks = Vec::new();
        let mut exhaustive = false;
        for (c, case) in decl.cases.iter().enumerate() {
            let n = c + 1;
            let mut block = String::new();
            let mut checks = Vec::new();
            let mut args = Vec::new();
            for (i, input) in case.inputs.iter().enumerate() {
                if matches!(input, Shape::Any) {
                    args.push(format!("t{i}"));
                    continue;
                }
                block.push_str(&format!(
                    "\tc{n}t{i}, c{n}t{i}ok := any(t{i}).({})\n",
                    self.ctx.go_type(input)
                ));
                checks.push(format!("c{n}t{i}ok"));
                args.push(format!("c{n}t{i}"));
            }

            let call = format!("f{n}({})", args.join(", "));
            if checks.is_empty() {
                // A catch-all ends the function; later cases are unreachable.
                if arity == 0 {
                    block.push_str(&format!("\t{call}\n"));
                } else {
                    block.push_str(&format!("\treturn {call}\n"));
                }
                blocks.push(block);
                exhaustive = true;
                break;
            }

            block.push_str(&format!("\tif {} {{\n", checks.join(" && ")));
            if arity == 0 {
                block.push_str(&format!("\t\t{call}\n\t\treturn\n"));
            } else {
                block.push_str(&format!("\t\treturn {call}\n"));
            }
            block.push_str("\t}\n");
            blocks.push(block);
        }

        out.push_str(&blocks.join("\n"));
        if !exhaustive {
            if !blocks.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("\tpanic(\"{func} is not exhaustive\")\n"));
        }
        out.push_str("}\n");
        self.section(out);
    }

    fn section(&mut self, text: String) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(&text);
    }
}
