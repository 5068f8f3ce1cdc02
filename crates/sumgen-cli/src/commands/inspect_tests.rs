use std::fs;
use std::path::{Path, PathBuf};

use indoc::indoc;

use super::shapes::{self, ShapesArgs};
use super::typescript::{self, TypescriptArgs};

const SHAPES: &str = indoc! {r#"
    package geo

    //go:tag mkunion:"Shape"
    type (
        Circle struct {
            Radius float64 `json:"radius"`
        }
        Square struct {
            Side float64
        }
    )
"#};

fn source(dir: &Path, text: &str) -> PathBuf {
    fs::write(dir.join("go.mod"), "module example.com/app\n").unwrap();
    let path = dir.join("shapes.go");
    fs::write(&path, text).unwrap();
    path
}

fn typescript(file: PathBuf, export: bool) -> (bool, String, String) {
    let args = TypescriptArgs {
        file,
        export,
        enum_guards: true,
        color: false,
    };
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let ok = typescript::execute(&args, &mut out, &mut err).unwrap();
    (ok, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[test]
fn typescript_definitions() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, out, err) = typescript(source(dir.path(), SHAPES), true);

    assert!(ok);
    assert_eq!(err, "");
    insta::assert_snapshot!(out, @r#"
    export interface Circle {
      radius: number;
    }

    export interface Square {
      Side: number;
    }

    export interface ShapeCircle {
      $type: "geo.Circle";
      "geo.Circle": Circle;
    }

    export interface ShapeSquare {
      $type: "geo.Square";
      "geo.Square": Square;
    }

    export type Shape = ShapeCircle | ShapeSquare;
    "#);
}

#[test]
fn typescript_without_export() {
    let dir = tempfile::tempdir().unwrap();
    let (_, out, _) = typescript(source(dir.path(), SHAPES), false);

    assert!(out.starts_with("interface Circle {\n"));
}

#[test]
fn parse_errors_are_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, out, err) = typescript(source(dir.path(), "package geo\n\ntype Broken struct {\n"), true);

    assert!(!ok);
    assert_eq!(out, "");
    assert!(err.contains("shapes.go"), "{err}");
}

#[test]
fn shapes_dump() {
    let dir = tempfile::tempdir().unwrap();
    let args = ShapesArgs {
        file: source(dir.path(), SHAPES),
        pretty: false,
        color: false,
    };
    let (mut out, mut err) = (Vec::new(), Vec::new());

    assert!(shapes::execute(&args, &mut out, &mut err).unwrap());

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["pkg_name"], "geo");
    assert_eq!(json["pkg_import_name"], "example.com/app");
    assert_eq!(json["unions"][0]["name"], "Shape");
    assert!(out.ends_with(b"\n"));
}
