use indoc::indoc;
use sumgen_core::{Guard, NumberKind, Shape};

use crate::diagnostics::DiagnosticKind;
use crate::test_utils::{TEST_IMPORT, expect_infer, expect_union};

#[test]
fn package_and_imports() {
    let info = expect_infer(indoc! {r#"
        package geo

        import (
            "fmt"
            tm "time"
            _ "embed"
            "github.com/acme/units/v2"
        )

        var _ = fmt.Sprintf
    "#});

    assert_eq!(info.pkg_name, "geo");
    assert_eq!(info.pkg_import_name, TEST_IMPORT);
    let imports: Vec<(&str, &str)> = info
        .imports
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        imports,
        [
            ("fmt", "fmt"),
            ("tm", "time"),
            ("v2", "github.com/acme/units/v2"),
        ]
    );
}

#[test]
fn file_tags_come_from_header_comments() {
    let info = expect_infer(indoc! {r#"
        //go:tag mkunion:",no-type-registry"
        package geo

        //go:tag mkunion:"Shape"
        type Circle struct{}
    "#});

    assert!(info.file_tags.contains_key("mkunion"));
    assert!(!info.has_type_registry());
    let union = info.retrieve_union("Shape").unwrap();
    assert!(union.tags.get("mkunion").unwrap().options.is_empty());
}

#[test]
fn struct_fields_resolve_to_shapes() {
    let info = expect_infer(indoc! {r#"
        package geo

        import "github.com/acme/units"

        type Circle struct {
            Radius  float64
            Tags    []string
            Corners [4]*Point
            Meta    map[string]any
            Unit    units.Length
            Center  *Point
            Raw     byte
            hidden  int
            A, B    rune
        }
    "#});

    let circle = info.retrieve_struct("Circle").unwrap();
    let rendered: Vec<String> = circle
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.name, f.shape))
        .collect();
    assert_eq!(
        rendered,
        [
            "Radius: float64",
            "Tags: []string",
            "Corners: [4]*geo.Point",
            "Meta: map[string]any",
            "Unit: units.Length",
            "Center: *geo.Point",
            "Raw: uint8",
            "A: int32",
            "B: int32",
        ]
    );

    let center = circle.field("Center").unwrap();
    assert!(center.is_pointer);
    let unit = circle.field("Unit").unwrap().shape.as_ref_name().unwrap();
    assert_eq!(unit.pkg_import_name, "github.com/acme/units");
    let Shape::ListLike(corners) = &circle.field("Corners").unwrap().shape else {
        panic!("expected a list");
    };
    assert_eq!(corners.array_len, Some(4));
    assert!(corners.element_is_pointer);
    assert!(info.diagnostics.is_empty());
}

#[test]
fn embedded_fields_are_named_after_their_type() {
    let info = expect_infer(indoc! {r#"
        package geo

        type Labeled struct {
            *Point
            Style
        }
    "#});

    let labeled = info.retrieve_struct("Labeled").unwrap();
    let names: Vec<&str> = labeled.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Point", "Style"]);
    assert!(labeled.fields[0].is_pointer);
    assert!(!labeled.fields[1].is_pointer);
}

#[test]
fn field_tags_descriptions_and_guards() {
    let info = expect_infer(indoc! {r#"
        package geo

        type Circle struct {
            // Fill color.
            Color string `json:"color,omitempty" enum:"red,green"`
            Name  string `pattern:"^[a-z]{1,3}$"` // short lowercase name
        }
    "#});

    let circle = info.retrieve_struct("Circle").unwrap();
    let color = circle.field("Color").unwrap();
    assert_eq!(color.desc.as_deref(), Some("Fill color."));
    let json = color.tags.get("json").unwrap();
    assert_eq!(json.value, "color");
    assert!(json.has_option("omitempty"));
    assert_eq!(
        color.guard,
        Some(Guard::Enum {
            options: vec!["red".into(), "green".into()]
        })
    );

    let name = circle.field("Name").unwrap();
    assert_eq!(name.desc.as_deref(), Some("short lowercase name"));
    assert_eq!(
        name.guard,
        Some(Guard::Regexp {
            pattern: "^[a-z]{1,3}$".into()
        })
    );
}

#[test]
fn grouped_declarations_form_a_union() {
    let union = expect_union(indoc! {r#"
        package geo

        //go:tag mkunion:"Shape"
        type (
            Circle struct {
                Radius float64
            }
            Rectangle struct {
                Width, Height float64
            }
            // Square is a special rectangle.
            Square struct {
                Side float64
            }
        )
    "#});

    assert_eq!(union.name, "Shape");
    assert_eq!(union.pkg_name, "geo");
    assert_eq!(union.pkg_import_name, TEST_IMPORT);
    assert_eq!(union.variant_names(), ["Circle", "Rectangle", "Square"]);
    assert!(union.type_params.is_empty());
}

#[test]
fn generic_union_takes_constraints_from_variants() {
    let info = expect_infer(indoc! {r#"
        package geo

        //go:tag mkunion:"Either[A, B],serde"
        type (
            Left[A any, B comparable] struct {
                Value A
            }
            Right[A any, B comparable] struct {
                Value B
            }
        )
    "#});

    let union = info.retrieve_union("Either").unwrap();
    let params: Vec<String> = union
        .type_params
        .iter()
        .map(|p| format!("{} {}", p.name, p.constraint))
        .collect();
    assert_eq!(params, ["A any", "B comparable"]);
    assert!(union.tags.get("mkunion").unwrap().has_option("serde"));

    let left = info.retrieve_struct("Left").unwrap();
    let value = left.field("Value").unwrap().shape.as_ref_name().unwrap();
    assert_eq!(value.name, "A");
    assert!(value.pkg_name.is_empty());
}

#[test]
fn generic_instantiations_carry_type_arguments() {
    let info = expect_infer(indoc! {r#"
        package geo

        import "github.com/acme/opt"

        type Box struct {
            Inner opt.Option[Pair[int, string]]
        }
    "#});

    let field = &info.retrieve_struct("Box").unwrap().fields[0];
    assert_eq!(field.shape.to_string(), "opt.Option[geo.Pair[int, string]]");
}

#[test]
fn self_reference_stays_a_reference() {
    let union = expect_union(indoc! {r#"
        package calc

        //go:tag mkunion:"Tree"
        type (
            Branch struct {
                L, R Tree
                Kids []Tree
            }
            Leaf struct {
                Value int64
            }
        )
    "#});

    let branch = union.variants[0].as_struct().unwrap();
    assert_eq!(branch.fields[0].shape.to_string(), "calc.Tree");
    assert_eq!(branch.fields[2].shape.to_string(), "[]calc.Tree");
    let leaf = union.variants[1].as_struct().unwrap();
    assert_eq!(leaf.fields[0].shape, Shape::number(NumberKind::Int64));
}

#[test]
fn aliases_and_defined_types() {
    let info = expect_infer(indoc! {r#"
        package geo

        type Meters float64
        type Names = []string
    "#});

    let Shape::AliasLike(meters) = &info.shapes["Meters"] else {
        panic!("expected an alias");
    };
    assert!(!meters.is_alias);
    assert_eq!(*meters.target, Shape::number(NumberKind::Float64));

    let Shape::AliasLike(names) = &info.shapes["Names"] else {
        panic!("expected an alias");
    };
    assert!(names.is_alias);
    assert_eq!(names.target.to_string(), "[]string");
}

#[test]
fn unsupported_types_degrade_to_any() {
    let info = expect_infer(indoc! {r#"
        package geo

        type Worker struct {
            Jobs     chan int
            Callback func(int) error
        }
    "#});

    let worker = info.retrieve_struct("Worker").unwrap();
    assert!(worker.fields.iter().all(|f| f.shape == Shape::Any));
    assert_eq!(info.diagnostics.warning_count(), 2);
    assert!(!info.diagnostics.has_errors());
    assert!(
        info.diagnostics
            .iter()
            .all(|d| d.kind() == DiagnosticKind::UnsupportedType)
    );
}

#[test]
fn unknown_package_alias_is_a_warning() {
    let info = expect_infer(indoc! {r#"
        package geo

        type Circle struct {
            Unit units.Length
        }
    "#});

    let unit = info.retrieve_struct("Circle").unwrap().fields[0]
        .shape
        .as_ref_name()
        .unwrap()
        .clone();
    assert_eq!(unit.pkg_name, "units");
    assert!(unit.pkg_import_name.is_empty());

    let diagnostic = info.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.kind(), DiagnosticKind::UnknownPackageAlias);
    assert_eq!(diagnostic.message(), "`units` is not imported");
}

#[test]
fn empty_group_yields_empty_union() {
    let union = expect_union(indoc! {r#"
        package geo

        //go:tag mkunion:"Nothing"
        type ()
    "#});
    assert!(union.variants.is_empty());
}

#[test]
fn duplicate_union_is_reported_on_the_later_one() {
    let info = expect_infer(indoc! {r#"
        package geo

        //go:tag mkunion:"Shape"
        type Circle struct{}

        //go:tag mkunion:"Shape"
        type Square struct{}
    "#});

    assert_eq!(info.unions.len(), 1);
    assert_eq!(info.unions[0].variant_names(), ["Circle"]);
    let diagnostic = info.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.kind(), DiagnosticKind::DuplicateUnion);
    assert_eq!(diagnostic.message(), "union `Shape` is declared more than once");
}

#[test]
fn match_declarations() {
    let info = expect_infer(indoc! {r#"
        package geo

        //go:tag mkmatch:"MatchPairs"
        type MatchPairs[T0 Shape, T1 Shape] interface {
            MatchCircles(x *Circle, y *Circle)
            MatchCircleAny(x *Circle, y any)
            Fallback(x, y any)
        }

        type Plain interface {
            Area() float64
        }
    "#});

    assert_eq!(info.matches.len(), 1);
    let decl = info.retrieve_match("MatchPairs").unwrap();
    assert_eq!(decl.arity(), 2);
    let cases: Vec<String> = decl
        .cases
        .iter()
        .map(|c| {
            let inputs: Vec<String> = c.inputs.iter().map(Shape::to_string).collect();
            format!("{}({})", c.name, inputs.join(", "))
        })
        .collect();
    assert_eq!(
        cases,
        [
            "MatchCircles(*geo.Circle, *geo.Circle)",
            "MatchCircleAny(*geo.Circle, any)",
            "Fallback(any, any)",
        ]
    );
    assert!(decl.validate().is_ok());
    assert!(!info.shapes.contains_key("Plain"));
}

#[test]
fn custom_tag_prefix() {
    let src = indoc! {r#"
        package geo

        // +sumgen mkunion:"Shape"
        type Circle struct{}
    "#};
    let options = crate::test_utils::test_options().tag_prefix("// +sumgen ");
    let info = crate::infer_source(src, &options).unwrap();
    assert_eq!(info.unions[0].name, "Shape");
}

#[test]
fn retrieve_shapes_lists_declarations_then_unions() {
    let info = expect_infer(indoc! {r#"
        package geo

        //go:tag mkunion:"Shape"
        type (
            Circle struct{}
            Square struct{}
        )
    "#});

    let names: Vec<String> = info
        .retrieve_shapes()
        .iter()
        .filter_map(Shape::name)
        .map(str::to_string)
        .collect();
    assert_eq!(names, ["Circle", "Square", "Shape"]);
}

#[test]
fn shapes_serialize_for_the_dump() {
    let info = expect_infer(indoc! {r#"
        package geo

        type Meters float64
    "#});
    let json = serde_json::to_value(&info.shapes).unwrap();
    assert_eq!(json["Meters"]["$type"], "AliasLike");
    assert_eq!(json["Meters"]["name"], "Meters");
}
