use std::fs;

use tempfile::TempDir;

use super::module::parse_module_path;
use super::{GoModule, find_module};

#[test]
fn module_line_is_parsed() {
    let go_mod = "module github.com/acme/geo // shapes\n\ngo 1.22\n";
    assert_eq!(parse_module_path(go_mod).as_deref(), Some("github.com/acme/geo"));
}

#[test]
fn module_prefix_needs_whitespace() {
    assert_eq!(parse_module_path("modules x\n"), None);
    assert_eq!(parse_module_path("go 1.22\n"), None);
}

#[test]
fn finds_manifest_in_parent() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("go.mod"), "module example.com/app\n").unwrap();
    let nested = temp.path().join("pkg").join("shape");
    fs::create_dir_all(&nested).unwrap();

    let module = find_module(&nested).unwrap();
    assert_eq!(module.root, temp.path());
    assert_eq!(module.path, "example.com/app");
    assert_eq!(
        module.import_path(&nested).as_deref(),
        Some("example.com/app/pkg/shape")
    );
    assert_eq!(module.import_path(temp.path()).as_deref(), Some("example.com/app"));
}

#[test]
fn no_manifest() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("a");
    fs::create_dir_all(&nested).unwrap();
    // The temp dir may live under a tree that has its own go.mod; only
    // assert that nothing inside the temp dir is reported.
    if let Some(found) = find_module(&nested) {
        assert!(!found.root.starts_with(temp.path()));
    }
}

#[test]
fn package_dir_for_import() {
    let module = GoModule {
        root: "/src/app".into(),
        path: "example.com/app".into(),
    };
    assert_eq!(
        module.package_dir("example.com/app/pkg/shape"),
        Some("/src/app/pkg/shape".into())
    );
    assert_eq!(module.package_dir("example.com/app"), Some("/src/app".into()));
    assert_eq!(module.package_dir("example.com/application"), None);
    assert_eq!(module.package_dir("fmt"), None);
}
