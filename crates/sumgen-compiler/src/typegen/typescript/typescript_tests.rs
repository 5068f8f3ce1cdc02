use indoc::indoc;

use super::{Config, emit, emit_with_config};
use crate::test_utils::expect_infer;

const SHAPES: &str = indoc! {r#"
    package geo

    type Meters float64

    //go:tag mkunion:"Shape"
    type (
        Circle struct {
            // Distance from the center.
            Radius Meters  `json:"radius"`
            Tags   []string `json:"tags,omitempty"`
            Next   *Circle
            Kind   string `enum:"small,large"`
            Secret string `json:"-"`
            Extra  map[string]any `json:"extra-data"`
        }
        Square struct {
            Side float64
        }
    )
"#};

#[test]
fn structs_aliases_and_unions() {
    let info = expect_infer(SHAPES);

    insta::assert_snapshot!(emit(&info), @r#"
    export type Meters = number;

    export interface Circle {
      /** Distance from the center. */
      radius: Meters;
      tags?: string[];
      Next?: Circle | null;
      Kind: "small" | "large";
      "extra-data": Record<string, unknown>;
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
fn config_switches() {
    let info = expect_infer(SHAPES);
    let ts = emit_with_config(&info, Config::new().export(false).enum_guards(false));

    assert!(ts.starts_with("type Meters = number;\n"));
    assert!(ts.contains("  Kind: string;\n"));
    assert!(!ts.contains("export "));
}

#[test]
fn generic_unions_and_name_collisions() {
    let info = expect_infer(indoc! {r#"
        package geo

        type EitherLeft struct{}

        //go:tag mkunion:"Either[A, B]"
        type (
            Left[A any, B any] struct {
                Value A
            }
            Right[A any, B any] struct {
                Value B
            }
        )
    "#});
    let ts = emit(&info);

    assert!(ts.contains("export interface Left<A, B> {\n  Value: A;\n}\n"));
    assert!(ts.contains(
        "export interface EitherLeft2<A, B> {\n  $type: \"geo.Left\";\n  \"geo.Left\": Left<A, B>;\n}\n"
    ));
    assert!(ts.ends_with("export type Either<A, B> = EitherLeft2<A, B> | EitherRight<A, B>;\n"));
}

#[test]
fn nothing_to_emit() {
    let info = expect_infer("package geo\n");
    assert_eq!(emit(&info), "");
}
