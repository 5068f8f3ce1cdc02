//! Shapes for runtime tests, inferred from Go source.

use indoc::indoc;
use sumgen_compiler::{InferOptions, InferredInfo, infer_source};
use sumgen_core::{RefName, Shape, UnionLike};

use crate::registry::Registry;
use crate::value::Record;

pub const TEST_IMPORT: &str = "example.com/app/expr";

/// `Sum(Literal(2), Product(Literal(2), Literal(3)))` evaluates to 8.
pub const EXPR: &str = indoc! {r#"
    package expr

    //go:tag mkunion:"Expr"
    type (
        Literal struct {
            Value int `json:"value"`
        }
        Sum struct {
            Left  Expr `json:"left"`
            Right Expr `json:"right"`
        }
        Product struct {
            Left  Expr `json:"left"`
            Right Expr `json:"right"`
        }
    )
"#};

pub const TREE: &str = indoc! {r#"
    package expr

    //go:tag mkunion:"Tree"
    type (
        Branch struct {
            L, R Tree
        }
        Leaf struct {
            Value int
        }
        Block struct {
            Items []Tree
            Named map[string]*Tree
        }
    )
"#};

pub fn infer(src: &str) -> InferredInfo {
    let options = InferOptions::new().pkg_import_name(TEST_IMPORT);
    infer_source(src, &options).expect("source should parse")
}

pub fn registry(info: &InferredInfo) -> Registry {
    let mut registry = Registry::new();
    registry.register_all(info.retrieve_shapes());
    registry
}

pub fn union(info: &InferredInfo, name: &str) -> UnionLike {
    info.retrieve_union(name).expect("union").clone()
}

/// Reference to a type declared in the test package.
pub fn local(name: &str) -> Shape {
    Shape::RefName(RefName::new(name).in_package("expr", TEST_IMPORT))
}

pub fn literal(value: i64) -> Record {
    Record::new("Literal").with("Value", value)
}

pub fn sum(left: Record, right: Record) -> Record {
    Record::new("Sum").with("Left", left).with("Right", right)
}

pub fn product(left: Record, right: Record) -> Record {
    Record::new("Product").with("Left", left).with("Right", right)
}

pub fn leaf(value: i64) -> Record {
    Record::new("Leaf").with("Value", value)
}

pub fn branch(l: impl Into<crate::Value>, r: impl Into<crate::Value>) -> Record {
    Record::new("Branch").with("L", l).with("R", r)
}
