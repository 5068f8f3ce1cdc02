/// Uppercase the first character, leaving the rest unchanged.
///
/// # Examples
/// ```
/// use sumgen_core::utils::upper_first;
/// assert_eq!(upper_first("leaf"), "Leaf");
/// assert_eq!(upper_first("Leaf"), "Leaf");
/// ```
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest unchanged.
///
/// # Examples
/// ```
/// use sumgen_core::utils::lower_first;
/// assert_eq!(lower_first("Leaf"), "leaf");
/// ```
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Go visibility rule: exported names start with an uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Last segment of an import path: `github.com/a/shape` → `shape`.
pub fn last_path_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Replace everything that can't appear in a Go identifier with `_`.
pub fn sanitize_ident(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
