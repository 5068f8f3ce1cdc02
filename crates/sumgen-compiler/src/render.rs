//! Go file assembly: header, package clause, imports, bodies.

use sumgen_core::ImportSet;

pub const GENERATED_HEADER: &str = "// Code generated by sumgen. DO NOT EDIT.";

/// A generated Go file under construction.
#[derive(Debug, Clone, Default)]
pub struct GoFile {
    package: String,
    current_import: String,
    imports: ImportSet,
    bodies: Vec<String>,
}

impl GoFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    /// Import path of the package itself; it is never imported.
    pub fn current_import(mut self, path: impl Into<String>) -> Self {
        self.current_import = path.into();
        self
    }

    pub fn imports(mut self, imports: &ImportSet) -> Self {
        self.imports.merge(imports);
        self
    }

    /// Append a body. Blank bodies are dropped.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        if !body.trim().is_empty() {
            self.bodies.push(body);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn render(&self) -> String {
        let mut imports = self.imports.clone();
        imports.remove(&self.current_import);

        let mut output = String::new();
        output.push_str(GENERATED_HEADER);
        output.push_str("\n\n");
        output.push_str(&format!("package {}\n", self.package));

        let specs: Vec<String> = imports
            .iter()
            .map(|(_, path)| match imports.alias_for(path) {
                Some(alias) => format!("{alias} \"{path}\""),
                None => format!("\"{path}\""),
            })
            .collect();
        match specs.as_slice() {
            [] => {}
            [single] => output.push_str(&format!("\nimport {single}\n")),
            many => {
                output.push_str("\nimport (\n");
                for spec in many {
                    output.push_str(&format!("\t{spec}\n"));
                }
                output.push_str(")\n");
            }
        }

        for body in &self.bodies {
            output.push('\n');
            output.push_str(body.trim_end());
            output.push('\n');
        }

        // Ensure exactly one trailing newline
        output.truncate(output.trim_end().len());
        output.push('\n');
        output
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
