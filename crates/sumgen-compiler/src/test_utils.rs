//! Test helpers shared by the compiler's unit tests.

use sumgen_core::{ShapeCache, UnionLike};

use crate::infer::{InferOptions, InferredInfo, infer_source};
use crate::pipeline::{Config, GeneratedFile, Generator};

/// Import path given to every in-memory test file.
pub const TEST_IMPORT: &str = "example.com/app/geo";

pub fn test_options() -> InferOptions {
    InferOptions::new().pkg_import_name(TEST_IMPORT)
}

/// Infer a source that must parse.
pub fn expect_infer(src: &str) -> InferredInfo {
    infer_source(src, &test_options()).expect("source should parse")
}

/// Infer a source and return its only union.
pub fn expect_union(src: &str) -> UnionLike {
    let info = expect_infer(src);
    assert_eq!(info.unions.len(), 1, "expected exactly one union");
    info.unions.into_iter().next().expect("one union")
}

/// Run the whole pipeline on a source with a fresh cache.
pub fn generate(src: &str, config: Config) -> GeneratedFile {
    let cache = ShapeCache::new();
    let config = config.infer_options(test_options());
    Generator::new(config)
        .with_cache(&cache)
        .generate_source(src)
        .expect("source should parse")
}

/// Generated Go text for a source that must produce no errors.
pub fn expect_generated(src: &str) -> String {
    let file = generate(src, Config::new());
    assert!(
        !file.diagnostics.has_errors(),
        "unexpected diagnostics:\n{}",
        file.diagnostics.render(src)
    );
    file.text
}

/// One line per diagnostic, for sources expected to report problems.
pub fn expect_diagnostics(src: &str) -> String {
    let file = generate(src, Config::new());
    assert!(!file.diagnostics.is_empty(), "expected diagnostics");
    file.diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generated Go uses tabs; snapshots read better with spaces.
pub fn untab(text: &str) -> String {
    text.replace('\t', "    ")
}

/// The top-level declaration whose first line starts with `prefix`.
///
/// Multi-line declarations run up to the first unindented `}` or `)`.
pub fn go_decl(text: &str, prefix: &str) -> String {
    let mut lines = text.lines().skip_while(|l| !l.starts_with(prefix));
    let Some(first) = lines.next() else {
        panic!("no declaration starting with `{prefix}` in:\n{text}");
    };
    let mut out = vec![first];
    if first.ends_with('{') || first.ends_with('(') {
        for line in lines {
            out.push(line);
            if line == "}" || line == ")" {
                break;
            }
        }
    }
    untab(&out.join("\n"))
}
