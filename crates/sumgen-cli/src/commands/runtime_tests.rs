use std::fs;

use super::runtime::{self, RUNTIME_FILE, RuntimeArgs};
use crate::error::CliError;

#[test]
fn prints_shared_package_by_default() {
    let args = RuntimeArgs {
        dir: None,
        runtime_import: "github.com/sumgen-lang/sumgen/x/shared".to_string(),
    };
    let mut out = Vec::new();

    assert!(runtime::execute(&args, &mut out).unwrap());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\npackage shared\n"));
    assert!(text.contains("func JSONMarshal[A any](in A) ([]byte, error) {\n"));
}

#[test]
fn writes_into_package_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("internal").join("sumrt");
    let args = RuntimeArgs {
        dir: Some(target.clone()),
        runtime_import: "example.com/app/internal/sumrt".to_string(),
    };
    let mut out = Vec::new();

    assert!(runtime::execute(&args, &mut out).unwrap());
    assert!(out.is_empty());
    let text = fs::read_to_string(target.join(RUNTIME_FILE)).unwrap();
    assert!(text.contains("\npackage sumrt\n"));
    assert!(text.contains("func JSONMarshallerRegister[A any]("));
}

#[test]
fn unwritable_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("taken");
    fs::write(&blocker, "").unwrap();
    let args = RuntimeArgs {
        dir: Some(blocker.join("rt")),
        runtime_import: "example.com/app/rt".to_string(),
    };

    let err = runtime::execute(&args, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CliError::Write { ref path, .. } if path.ends_with("rt/json.go")));
}
