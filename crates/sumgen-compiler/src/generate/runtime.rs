//! The Go package generated JSON codecs call into.
//!
//! Its source lives at `x/shared` in the repository, so the default
//! runtime import resolves without extra setup. For any other import path
//! the same source is written out under the matching package name.

use sumgen_core::utils::last_path_segment;

/// Go source of the runtime package, clause `package shared`.
pub const RUNTIME_SOURCE: &str = include_str!("../../../../x/shared/json.go");

/// Runtime functions generated code may call, qualified by the package name.
pub const RUNTIME_FUNCS: [&str; 3] = ["JSONMarshal", "JSONUnmarshal", "JSONMarshallerRegister"];

/// Runtime source for a package imported as `import_path`.
pub fn runtime_source(import_path: &str) -> String {
    let package = last_path_segment(import_path);
    let mut out = String::with_capacity(RUNTIME_SOURCE.len());
    for line in RUNTIME_SOURCE.lines() {
        if line == "package shared" {
            out.push_str("package ");
            out.push_str(package);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
