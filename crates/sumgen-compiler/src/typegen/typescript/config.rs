/// Switches for TypeScript emission. Both default to on.
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) export: bool,
    /// Fields with an `enum` guard become a union of string literals.
    pub(crate) enum_guards: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            export: true,
            enum_guards: true,
        }
    }

    pub fn export(self, export: bool) -> Self {
        Config { export, ..self }
    }

    pub fn enum_guards(self, enum_guards: bool) -> Self {
        Config { enum_guards, ..self }
    }
}
