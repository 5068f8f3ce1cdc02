//! TypeScript emitter state: taken names and the output buffer.

use std::collections::BTreeSet;

use sumgen_core::Shape;

use super::Config;
use crate::infer::InferredInfo;

/// TypeScript emitter over one file's inferred shapes.
pub struct Emitter<'a> {
    pub(super) info: &'a InferredInfo,
    pub(super) config: Config,

    pub(super) used_names: BTreeSet<String>,
    pub(super) output: String,
}

impl<'a> Emitter<'a> {
    pub fn new(info: &'a InferredInfo, config: Config) -> Self {
        // Declared names are taken before any wrapper name is generated.
        let used_names = info
            .shapes
            .keys()
            .cloned()
            .chain(info.unions.iter().map(|u| u.name.clone()))
            .collect();
        Self {
            info,
            config,
            used_names,
            output: String::new(),
        }
    }

    /// Declarations in file order, then the unions built over them.
    pub fn emit(mut self) -> String {
        let info = self.info;
        for shape in info.shapes.values() {
            match shape {
                Shape::StructLike(st) => self.emit_interface(st),
                Shape::AliasLike(alias) => self.emit_alias(alias),
                _ => {}
            }
        }
        info.unions.iter().for_each(|union| self.emit_union(union));

        let body = self.output.trim_end();
        match body.is_empty() {
            true => String::new(),
            false => format!("{body}\n"),
        }
    }

    /// `base`, or `base2`, `base3`... when a declaration already owns it.
    pub(super) fn unique_name(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 1;
        while !self.used_names.insert(name.clone()) {
            suffix += 1;
            name = format!("{base}{suffix}");
        }
        name
    }
}
