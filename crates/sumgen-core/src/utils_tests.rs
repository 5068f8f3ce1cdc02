use crate::utils::{is_exported, last_path_segment, lower_first, sanitize_ident, upper_first};

#[test]
fn upper_first_ascii() {
    assert_eq!(upper_first("leaf"), "Leaf");
    assert_eq!(upper_first("Leaf"), "Leaf");
    assert_eq!(upper_first("x"), "X");
    assert_eq!(upper_first(""), "");
}

#[test]
fn lower_first_keeps_tail() {
    assert_eq!(lower_first("HTTPServer"), "hTTPServer");
    assert_eq!(lower_first("Tree"), "tree");
}

#[test]
fn exported_names() {
    assert!(is_exported("Name"));
    assert!(!is_exported("name"));
    assert!(!is_exported("_Name"));
    assert!(!is_exported(""));
}

#[test]
fn path_segments() {
    assert_eq!(last_path_segment("github.com/acme/shape"), "shape");
    assert_eq!(last_path_segment("fmt"), "fmt");
}

#[test]
fn sanitize() {
    assert_eq!(sanitize_ident("map[string]int"), "map_string_int");
    assert_eq!(sanitize_ident("pkg.Name"), "pkg_Name");
}
