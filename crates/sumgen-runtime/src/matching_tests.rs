use indoc::indoc;

use super::CaseMatcher;
use crate::error::MatchError;
use crate::test_utils::{EXPR, infer, literal, product, sum};
use crate::value::Value;

fn pair_decl() -> sumgen_core::MatchDecl {
    let src = format!(
        "{EXPR}\n{}",
        indoc! {r#"
            //go:tag mkmatch
            type MatchPair[A, B Expr] interface {
                BothLiterals(a *Literal, b *Literal)
                LeftSum(a *Sum, b any)
                Otherwise(a any, b any)
            }
        "#}
    );
    infer(&src).retrieve_match("MatchPair").expect("match").clone()
}

fn describe<'f>(decl: &sumgen_core::MatchDecl) -> CaseMatcher<'f, String> {
    CaseMatcher::new(decl)
        .on("BothLiterals", |_: &[&Value]| "literals".to_string())
        .on("LeftSum", |inputs: &[&Value]| format!("sum and {}", inputs[1].kind()))
        .on("Otherwise", |_: &[&Value]| "other".to_string())
}

#[test]
fn first_matching_case_wins() {
    let decl = pair_decl();
    let mut matcher = describe(&decl);
    matcher.check().unwrap();

    let one = Value::Record(literal(1));
    let two = Value::Record(sum(literal(1), literal(2)));
    let three = Value::Record(product(literal(1), literal(2)));

    assert_eq!(matcher.run(&[&one, &one]).unwrap(), "literals");
    assert_eq!(matcher.run(&[&two, &one]).unwrap(), "sum and struct Literal");
    assert_eq!(matcher.run(&[&two, &two]).unwrap(), "sum and struct Sum");
    assert_eq!(matcher.run(&[&one, &three]).unwrap(), "other");
    assert_eq!(matcher.select(&[&three, &one]).unwrap(), "Otherwise");
}

#[test]
fn arity_is_checked() {
    let decl = pair_decl();
    let mut matcher = describe(&decl);
    let one = Value::Record(literal(1));

    let err = matcher.run(&[&one]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"MatchPair: expected 2 inputs, got 1");
}

#[test]
fn handlers_must_cover_cases() {
    let decl = pair_decl();
    let partial = CaseMatcher::new(&decl).on("BothLiterals", |_: &[&Value]| 1);
    assert_eq!(
        partial.check().unwrap_err(),
        MatchError::MissingHandler {
            union: "MatchPair".to_string(),
            variant: "LeftSum".to_string(),
        }
    );

    let typo = describe(&decl).on("Neither", |_: &[&Value]| String::new());
    insta::assert_snapshot!(typo.check().unwrap_err().to_string(), @"MatchPair: Neither is not a case");
}

#[test]
fn no_catch_all_is_not_exhaustive() {
    let src = format!(
        "{EXPR}\n{}",
        indoc! {r#"
            //go:tag mkmatch
            type MatchLiteral[A Expr] interface {
                Only(a *Literal)
            }
        "#}
    );
    let decl = infer(&src).retrieve_match("MatchLiteral").expect("match").clone();
    let matcher = CaseMatcher::new(&decl).on("Only", |_: &[&Value]| ());

    let value = Value::Record(sum(literal(1), literal(2)));
    assert_eq!(
        matcher.select(&[&value]).unwrap_err(),
        MatchError::NotExhaustive("MatchLiteral".to_string())
    );
}
