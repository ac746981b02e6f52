//! JavaScript identifier checks.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "await",
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "implements",
        "import",
        "in",
        "instanceof",
        "interface",
        "let",
        "new",
        "null",
        "package",
        "private",
        "protected",
        "public",
        "return",
        "static",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
    ]
    .into_iter()
    .collect()
});

fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_alphanumeric() || ch == '\u{200c}' || ch == '\u{200d}'
}

/// Whether `name` is an IdentifierName (reserved words included).
///
/// ```
/// use mdxc_core::identifier::is_identifier_name;
///
/// assert!(is_identifier_name("Card"));
/// assert!(is_identifier_name("$el"));
/// assert!(!is_identifier_name("my-element"));
/// assert!(!is_identifier_name("1st"));
/// ```
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

/// Whether `name` is a reserved word that cannot be used as a binding.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(name)
}

/// Whether `name` can be declared as a binding.
pub fn is_binding_name(name: &str) -> bool {
    is_identifier_name(name) && !is_reserved_word(name)
}
