use indoc::indoc;
use sumgen_core::{NumberKind, Shape};

use super::JsonCodec;
use crate::error::CodecError;
use crate::registry::CustomCodec;
use crate::test_utils::{EXPR, infer, literal, local, product, registry, sum};
use crate::value::{Record, Value};

fn eval(value: &Value) -> i64 {
    let record = value.as_record().expect("expression record");
    let side = |name| eval(record.get(name).expect("operand"));
    match record.type_name.as_str() {
        "Literal" => match record.get("Value") {
            Some(Value::Int(n)) => *n,
            other => panic!("bad literal {other:?}"),
        },
        "Sum" => side("Left") + side("Right"),
        "Product" => side("Left") * side("Right"),
        other => panic!("unknown variant {other}"),
    }
}

#[test]
fn expression_round_trip() {
    let registry = registry(&infer(EXPR));
    let codec = JsonCodec::new(&registry);
    let expr = Value::Record(sum(literal(2), product(literal(2), literal(3))));

    let text = codec.encode_string(&local("Expr"), &expr).unwrap();
    insta::assert_snapshot!(text, @r#"{"$type":"expr.Sum","expr.Sum":{"left":{"$type":"expr.Literal","expr.Literal":{"value":2}},"right":{"$type":"expr.Product","expr.Product":{"left":{"$type":"expr.Literal","expr.Literal":{"value":2}},"right":{"$type":"expr.Literal","expr.Literal":{"value":3}}}}}}"#);

    let decoded = codec.decode_str(&local("Expr"), &text).unwrap();
    assert_eq!(decoded, expr);
    assert_eq!(eval(&decoded), 8);
}

#[test]
fn payload_key_stands_in_for_missing_type() {
    let registry = registry(&infer(EXPR));
    let codec = JsonCodec::new(&registry);

    let decoded = codec
        .decode_str(&local("Expr"), r#"{"expr.Literal": {"value": 5}}"#)
        .unwrap();
    assert_eq!(decoded, Value::Record(literal(5)));

    let err = codec.decode_str(&local("Expr"), "{}").unwrap_err();
    assert!(matches!(err.root_cause(), CodecError::MissingPayload { .. }));
}

#[test]
fn unknown_key_has_breadcrumb() {
    let registry = registry(&infer(EXPR));
    let codec = JsonCodec::new(&registry);
    let text = indoc! {r#"
        {
          "$type": "expr.Sum",
          "expr.Sum": {
            "left": {"$type": "expr.Literal", "expr.Literal": {"value": 1, "extra": true}},
            "right": {"$type": "expr.Literal", "expr.Literal": {"value": 2}}
          }
        }
    "#};

    let err = codec.decode_str(&local("Expr"), text).unwrap_err();
    assert_eq!(err.path(), Some("Expr.Sum.Left.Literal"));
    insta::assert_snapshot!(err.to_string(), @r#"Expr.Sum.Left.Literal: unknown key "extra" in Literal"#);
}

#[test]
fn unknown_variant() {
    let registry = registry(&infer(EXPR));
    let codec = JsonCodec::new(&registry);

    let err = codec
        .decode_str(&local("Expr"), r#"{"$type": "expr.Div", "expr.Div": {}}"#)
        .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        CodecError::UnknownVariant { variant, .. } if variant == "expr.Div"
    ));

    let err = codec
        .encode(&local("Expr"), &Value::Record(Record::new("Div")))
        .unwrap_err();
    assert!(matches!(err.root_cause(), CodecError::UnknownVariant { .. }));
}

#[test]
fn stray_key_next_to_union_payload() {
    let registry = registry(&infer(EXPR));
    let codec = JsonCodec::new(&registry);
    let text = r#"{"$type": "expr.Literal", "expr.Literal": {"value": 1}, "note": "hi"}"#;

    let err = codec.decode_str(&local("Expr"), text).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        CodecError::UnknownKey { key, type_name } if key == "note" && type_name == "Expr"
    ));

    // A second variant's payload key is part of the union's wire shape.
    let text = r#"{"$type": "expr.Literal", "expr.Literal": {"value": 1}, "expr.Sum": null}"#;
    let decoded = codec.decode_str(&local("Expr"), text).unwrap();
    assert_eq!(decoded, Value::Record(literal(1)));
}

const INVENTORY: &str = indoc! {r#"
    package expr

    type Inventory struct {
        Name   string         `json:"name"`
        Tags   []string       `json:"tags"`
        Counts map[string]int `json:"counts"`
        ByID   map[int]string `json:"by_id"`
        Ratio  float64        `json:"ratio"`
        Slots  [2]uint8       `json:"slots"`
        Parent *Inventory     `json:"parent"`
    }

    type Note struct {
        Text   string `json:"text,omitempty"`
        Secret string `json:"-"`
    }
"#};

fn inventory() -> Record {
    Record::new("Inventory")
        .with("Name", "box")
        .with("Tags", Value::List(vec![]))
        .with("Counts", Value::Map(vec![]))
        .with(
            "ByID",
            Value::Map(vec![
                (Value::Int(1), Value::from("one")),
                (Value::Int(2), Value::from("two")),
            ]),
        )
        .with("Ratio", 0.5)
        .with("Slots", Value::List(vec![Value::Uint(1), Value::Uint(2)]))
        .with("Parent", Value::Null)
}

#[test]
fn collections_round_trip_and_stay_empty() {
    let registry = registry(&infer(INVENTORY));
    let codec = JsonCodec::new(&registry);
    let value = Value::Record(inventory());

    let text = codec.encode_string(&local("Inventory"), &value).unwrap();
    insta::assert_snapshot!(text, @r#"{"name":"box","tags":[],"counts":{},"by_id":{"1":"one","2":"two"},"ratio":0.5,"slots":[1,2],"parent":null}"#);
    assert_eq!(codec.decode_str(&local("Inventory"), &text).unwrap(), value);

    let nested = Value::Record(inventory().with("Parent", inventory()));
    let text = codec.encode_string(&local("Inventory"), &nested).unwrap();
    assert_eq!(codec.decode_str(&local("Inventory"), &text).unwrap(), nested);
}

#[test]
fn fixed_length_arrays() {
    let registry = registry(&infer(INVENTORY));
    let codec = JsonCodec::new(&registry);
    let value = Value::Record(inventory().with("Slots", Value::List(vec![Value::Uint(1)])));

    let err = codec.encode(&local("Inventory"), &value).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Inventory.Slots: expected 2 elements, got 1");
}

#[test]
fn omitted_and_skipped_fields() {
    let registry = registry(&infer(INVENTORY));
    let codec = JsonCodec::new(&registry);

    let note = Value::Record(Record::new("Note").with("Text", "").with("Secret", "hunter2"));
    assert_eq!(codec.encode_string(&local("Note"), &note).unwrap(), "{}");

    let err = codec
        .decode_str(&local("Note"), r#"{"Secret": "x"}"#)
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"Note: unknown key "Secret" in Note"#);
}

#[test]
fn integer_ranges() {
    let registry = registry(&infer(INVENTORY));
    let codec = JsonCodec::new(&registry);
    let byte = Shape::number(NumberKind::UInt8);

    assert_eq!(codec.decode_str(&byte, "255").unwrap(), Value::Uint(255));
    let err = codec.decode_str(&byte, "300").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"expected uint8, got 300");
    assert!(codec.encode(&byte, &Value::Int(-1)).is_err());
    assert!(codec.decode_str(&Shape::number(NumberKind::Int), "1.5").is_err());
}

const GENERIC: &str = indoc! {r#"
    package expr

    type Box[T any] struct {
        Item T `json:"item"`
    }

    type Crate struct {
        Ints Box[int]    `json:"ints"`
        Strs Box[string] `json:"strs"`
    }
"#};

#[test]
fn type_arguments_bind_per_reference() {
    let registry = registry(&infer(GENERIC));
    let codec = JsonCodec::new(&registry);
    let value = Value::Record(
        Record::new("Crate")
            .with("Ints", Record::new("Box").with("Item", 7i64))
            .with("Strs", Record::new("Box").with("Item", "seven")),
    );

    let text = codec.encode_string(&local("Crate"), &value).unwrap();
    insta::assert_snapshot!(text, @r#"{"ints":{"item":7},"strs":{"item":"seven"}}"#);
    assert_eq!(codec.decode_str(&local("Crate"), &text).unwrap(), value);

    let err = codec
        .decode_str(&local("Crate"), r#"{"ints": {"item": 1}, "strs": {"item": 2}}"#)
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Crate.Strs.Item: expected string, got number");
}

const TEMPERATURE: &str = indoc! {r#"
    package expr

    import "github.com/acme/other"

    type Celsius float64

    type Reading struct {
        Temp Celsius `json:"temp"`
    }

    type Holder struct {
        Thing other.Thing
    }
"#};

struct SuffixCodec;

impl CustomCodec for SuffixCodec {
    fn encode(&self, _: &JsonCodec<'_>, value: &Value) -> Result<serde_json::Value, CodecError> {
        match value {
            Value::Float(f) => Ok(serde_json::Value::String(format!("{f}C"))),
            other => Err(CodecError::mismatch("float", other.kind())),
        }
    }

    fn decode(&self, _: &JsonCodec<'_>, json: &serde_json::Value) -> Result<Value, CodecError> {
        json.as_str()
            .and_then(|s| s.strip_suffix('C'))
            .and_then(|s| s.parse().ok())
            .map(Value::Float)
            .ok_or_else(|| CodecError::Custom(format!("bad temperature {json}")))
    }
}

#[test]
fn aliases_unwrap_unless_a_custom_codec_is_registered() {
    let info = infer(TEMPERATURE);
    let reading = Value::Record(Record::new("Reading").with("Temp", 21.5));

    let plain = registry(&info);
    let codec = JsonCodec::new(&plain);
    assert_eq!(
        codec.encode_string(&local("Reading"), &reading).unwrap(),
        r#"{"temp":21.5}"#
    );

    let mut custom = registry(&info);
    custom.register_codec(format!("{}.Celsius", crate::test_utils::TEST_IMPORT), SuffixCodec);
    let codec = JsonCodec::new(&custom);
    let text = codec.encode_string(&local("Reading"), &reading).unwrap();
    assert_eq!(text, r#"{"temp":"21.5C"}"#);
    assert_eq!(codec.decode_str(&local("Reading"), &text).unwrap(), reading);
}

#[test]
fn unregistered_reference_has_no_codec() {
    let registry = registry(&infer(TEMPERATURE));
    let codec = JsonCodec::new(&registry);
    let holder = Value::Record(Record::new("Holder").with("Thing", Value::Map(vec![])));

    let err = codec.encode(&local("Holder"), &holder).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Holder.Thing: no codec for type github.com/acme/other.Thing");
}

#[test]
fn arena_nodes_must_be_resolved_first() {
    let info = infer(EXPR);
    let registry = registry(&info);
    let codec = JsonCodec::new(&registry);
    let union = crate::test_utils::union(&info, "Expr");

    let mut arena = crate::Arena::new();
    let root = arena.intern(&union, sum(literal(1), literal(2))).unwrap();
    assert!(codec.encode(&local("Expr"), &Value::Node(root)).is_err());

    let inline = arena.resolve(root).unwrap();
    let text = codec.encode_string(&local("Expr"), &inline).unwrap();
    assert_eq!(eval(&codec.decode_str(&local("Expr"), &text).unwrap()), 3);
}
