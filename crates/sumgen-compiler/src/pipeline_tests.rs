use indoc::indoc;
use sumgen_core::ShapeCache;

use super::{Config, Generator, Skip};
use crate::Error;
use crate::generate::{RUNTIME_FUNCS, RUNTIME_SOURCE};
use crate::test_utils::{expect_diagnostics, expect_generated, generate, go_decl};

const SHAPES: &str = indoc! {r#"
    package geo

    //go:tag mkunion:"Shape"
    type (
        Circle struct {
            Radius float64
        }
        Square struct {
            Side float64
        }
    )
"#};

const PLACED: &str = indoc! {r#"
    package geo

    //go:tag mkunion:"Placement"
    type (
        Placed struct {
            At   Point
            Name string
        }
        Hidden struct{}
    )

    type Point struct {
        X, Y int
    }
"#};

const TREE: &str = indoc! {r#"
    package geo

    //go:tag mkunion:"Tree"
    type (
        Branch struct {
            L, R Tree
        }
        Leaf struct {
            Value int
        }
    )
"#};

#[test]
fn complete_file() {
    let text = expect_generated(SHAPES);

    assert!(text.starts_with("// Code generated by sumgen. DO NOT EDIT.\n\npackage geo\n"));
    insta::assert_snapshot!(go_decl(&text, "import ("), @r#"
    import (
        "bytes"
        "encoding/json"
        "fmt"
        "github.com/sumgen-lang/sumgen/x/shared"
    )
    "#);
    assert!(text.contains("type ShapeVisitor interface {\n"));
    assert!(text.contains("func MatchShapeR1["));
    assert!(text.contains("func ShapeFromJSON(x []byte) (Shape, error) {\n"));
    assert!(text.contains("func (r *Circle) MarshalJSON() ([]byte, error) {\n"));
    assert!(text.contains(
        "\tshared.JSONMarshallerRegister(\"example.com/app/geo.Circle\", CircleFromJSON, CircleToJSON)\n"
    ));
    assert!(!text.contains("Reducer"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn nested_plain_struct_goes_through_runtime() {
    let text = expect_generated(PLACED);

    insta::assert_snapshot!(go_decl(&text, "func init"), @r#"
    func init() {
        shared.JSONMarshallerRegister("example.com/app/geo.Placement", PlacementFromJSON, PlacementToJSON)
        shared.JSONMarshallerRegister("example.com/app/geo.Placed", PlacedFromJSON, PlacedToJSON)
        shared.JSONMarshallerRegister("example.com/app/geo.Hidden", HiddenFromJSON, HiddenToJSON)
    }
    "#);
    insta::assert_snapshot!(go_decl(&text, "func (r *Placed) _marshalJSONPoint"), @r#"
    func (r *Placed) _marshalJSONPoint(x Point) ([]byte, error) {
        result, err := shared.JSONMarshal[Point](x)
        if err != nil {
            return nil, fmt.Errorf("geo: Placed._marshalJSONPoint: %w", err)
        }
        return result, nil
    }
    "#);
    insta::assert_snapshot!(go_decl(&text, "func (r *Placed) _unmarshalJSONPoint"), @r#"
    func (r *Placed) _unmarshalJSONPoint(data []byte) (Point, error) {
        result, err := shared.JSONUnmarshal[Point](data)
        if err != nil {
            return result, fmt.Errorf("geo: Placed._unmarshalJSONPoint: %w", err)
        }
        return result, nil
    }
    "#);
    // Point has no codec of its own; the runtime encodes it natively.
    assert!(!text.contains("func PointFromJSON"));
    assert!(!text.contains("func (r *Point) MarshalJSON"));
    assert!(!text.contains("PointVisitor"));
}

#[test]
fn runtime_calls_match_shipped_package() {
    let text = expect_generated(PLACED);

    let called: Vec<&str> = text
        .match_indices("shared.")
        .map(|(at, prefix)| {
            let rest = &text[at + prefix.len()..];
            let end = rest
                .find(|c: char| !c.is_alphanumeric() && c != '_')
                .unwrap_or(rest.len());
            &rest[..end]
        })
        .collect();

    for func in RUNTIME_FUNCS {
        assert!(called.contains(&func), "{func} is never called");
    }
    for func in &called {
        assert!(RUNTIME_FUNCS.contains(func), "shared.{func} is not a runtime function");
        assert!(RUNTIME_SOURCE.contains(&format!("\nfunc {func}[A any](")));
    }
    assert!(RUNTIME_SOURCE.contains(
        "func JSONMarshallerRegister[A any](name string, from func([]byte) (A, error), to func(A) ([]byte, error))"
    ));
    assert!(RUNTIME_SOURCE.contains("func JSONMarshal[A any](in A) ([]byte, error)"));
    assert!(RUNTIME_SOURCE.contains("func JSONUnmarshal[A any](data []byte) (A, error)"));
}

#[test]
fn recursive_union_gets_reducers() {
    let text = expect_generated(TREE);

    assert!(text.contains("type TreeReducer[A any] interface {\n"));
    assert!(text.contains("func ReduceTreeDepthFirst["));
    assert!(text.contains("func ReduceTreeBreadthFirst["));
}

#[test]
fn skip_switches() {
    let skip = Skip {
        json: true,
        reducer: true,
        matching: false,
    };
    let file = generate(TREE, Config::new().skip(skip));

    assert!(file.diagnostics.is_empty());
    assert!(file.text.contains("type TreeVisitor interface {\n"));
    assert!(!file.text.contains("ReduceTree"));
    assert!(!file.text.contains("JSON"));
    assert!(!file.text.contains("\nimport"));
}

#[test]
fn union_options_disable_generators() {
    let text = expect_generated(&TREE.replace("mkunion:\"Tree\"", "mkunion:\"Tree,no-serde,no-reducer\""));

    assert!(text.contains("type Tree interface {\n"));
    assert!(!text.contains("ReduceTree"));
    assert!(!text.contains("TreeFromJSON"));
}

#[test]
fn runtime_import_and_package_override() {
    let config = Config::new()
        .runtime_import("example.com/platform/rt")
        .package("geo_test");
    let file = generate(SHAPES, config);

    assert!(file.text.contains("\npackage geo_test\n"));
    assert!(file.text.contains("\t\"example.com/platform/rt\"\n"));
    assert!(file.text.contains("\trt.JSONMarshallerRegister("));
    assert!(!file.text.contains("x/shared"));
}

#[test]
fn reducer_on_flat_union_is_rejected() {
    let src = SHAPES.replace("mkunion:\"Shape\"", "mkunion:\"Shape,reducer\"");
    let diagnostics = expect_diagnostics(&src);

    assert!(diagnostics.starts_with("error at "));
    assert!(diagnostics.ends_with(
        "union Shape requests a reducer but no variant refers back to it"
    ));
    assert!(generate(&src, Config::new()).text.is_empty());
}

#[test]
fn bad_match_does_not_stop_unions() {
    let src = format!(
        "{SHAPES}\n{}",
        indoc! {r#"
            //go:tag mkmatch
            type MatchOnlyCircles[T0 Shape] interface {
                OnlyCircle(x *Circle)
            }
        "#}
    );
    let file = generate(&src, Config::new());

    assert_eq!(file.diagnostics.error_count(), 1);
    let error = file.diagnostics.iter().find(|d| d.is_error()).unwrap();
    let message = error.message().to_string();
    insta::assert_snapshot!(message, @"match MatchOnlyCircles: last case OnlyCircle must accept `any` in every position");
    assert!(file.text.contains("type Shape interface {\n"));
    assert!(!file.text.contains("MatchOnlyCircles"));
}

#[test]
fn explicit_union_ignores_annotations() {
    let src = indoc! {r#"
        package geo

        type Circle struct {
            Radius float64
        }

        type Square struct {
            Side float64
        }
    "#};

    let file = generate(src, Config::new().explicit_union("Figure", ["Square", "Circle"]));
    assert!(file.diagnostics.is_empty());
    insta::assert_snapshot!(go_decl(&file.text, "type FigureVisitor"), @r"
    type FigureVisitor interface {
        VisitSquare(v *Square) any
        VisitCircle(v *Circle) any
    }
    ");

    let file = generate(src, Config::new().explicit_union("Figure", ["Circle", "Triangle"]));
    assert!(file.text.is_empty());
    let messages: Vec<_> = file.diagnostics.iter().map(|d| d.message().to_string()).collect();
    assert_eq!(messages, ["`Triangle` is not declared in this file"]);
}

#[test]
fn standalone_serde_struct() {
    let text = expect_generated(indoc! {r#"
        package geo

        //go:tag serde:"json"
        type Point struct {
            X int `json:"x"`
            Y int `json:"y"`
        }
    "#});

    assert!(text.contains("func (r *Point) MarshalJSON() ([]byte, error) {\n"));
    assert!(text.contains("func (r *Point) UnmarshalJSON(data []byte) error {\n"));
    assert!(!text.contains("PointVisitor"));
}

#[test]
fn nothing_to_generate() {
    let file = generate("package geo\n\ntype Plain struct{}\n", Config::new());

    assert!(file.is_empty());
    assert!(file.diagnostics.is_empty());
    assert_eq!(file.package, "geo");
}

#[test]
fn file_inside_module() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("go.mod"), "module example.com/app\n\ngo 1.22\n").unwrap();
    std::fs::create_dir(dir.path().join("geo")).unwrap();
    let input = dir.path().join("geo").join("shapes.go");
    std::fs::write(&input, SHAPES).unwrap();

    let cache = ShapeCache::new();
    let file = Generator::new(Config::new())
        .with_cache(&cache)
        .generate_file(&input)
        .unwrap();

    assert!(file.diagnostics.is_empty());
    assert_eq!(file.path.as_deref(), Some(input.as_path()));
    assert_eq!(
        file.default_output_path().unwrap(),
        dir.path().join("geo").join("shapes_union_gen.go")
    );
    assert!(file.text.contains("\"example.com/app/geo.Square\""));
    assert!(!file.text.contains("\t\"example.com/app/geo\"\n"));
    assert!(cache.is_package_loaded("example.com/app/geo"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ShapeCache::new();
    let err = Generator::new(Config::new())
        .with_cache(&cache)
        .generate_file(&dir.path().join("absent.go"))
        .unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
}
