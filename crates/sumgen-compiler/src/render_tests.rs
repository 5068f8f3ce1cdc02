use sumgen_core::ImportSet;

use super::GoFile;
use crate::test_utils::untab;

#[test]
fn header_package_and_bodies() {
    let text = GoFile::new("geo")
        .body("type A struct{}\n")
        .body("   \n")
        .body("type B struct{}\n\n\n")
        .render();

    insta::assert_snapshot!(text, @r"
    // Code generated by sumgen. DO NOT EDIT.

    package geo

    type A struct{}

    type B struct{}
    ");
    assert!(text.ends_with("}\n"));
    assert!(!text.ends_with("\n\n"));
}

#[test]
fn single_import_is_inline() {
    let mut imports = ImportSet::new();
    imports.add("json", "encoding/json");
    let text = GoFile::new("geo").imports(&imports).body("var _ json.Marshaler\n").render();

    insta::assert_snapshot!(text, @r#"
    // Code generated by sumgen. DO NOT EDIT.

    package geo

    import "encoding/json"

    var _ json.Marshaler
    "#);
}

#[test]
fn imports_are_sorted_aliased_and_skip_current_package() {
    let mut first = ImportSet::new();
    first.add("fmt", "fmt");
    first.add("shared", "github.com/sumgen-lang/sumgen/x/shared");
    first.add("geo", "example.com/app/geo");
    let mut second = ImportSet::new();
    second.add("tm", "time");
    second.add("json", "encoding/json");
    second.add("units", "github.com/acme/units/v2");

    let text = GoFile::new("geo")
        .current_import("example.com/app/geo")
        .imports(&first)
        .imports(&second)
        .render();

    insta::assert_snapshot!(untab(&text), @r#"
    // Code generated by sumgen. DO NOT EDIT.

    package geo

    import (
        "encoding/json"
        "fmt"
        units "github.com/acme/units/v2"
        "github.com/sumgen-lang/sumgen/x/shared"
        tm "time"
    )
    "#);
}

#[test]
fn empty_file_has_only_package_clause() {
    let file = GoFile::new("geo");
    assert!(file.is_empty());
    assert_eq!(
        file.render(),
        "// Code generated by sumgen. DO NOT EDIT.\n\npackage geo\n"
    );
}
