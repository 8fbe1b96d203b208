//! translator module tests

use super::*;
use crate::error::ErrorKind;
use pretty_assertions::assert_eq;

fn text(raw: &str) -> String {
    translate(raw, 1).unwrap().text
}

// --- pass-through ---
#[test]
fn test_arithmetic_passes_through() {
    assert_eq!(text("math.pi * radius ** 2"), "math.pi * radius ** 2");
    assert_eq!(text("(a + b) % 3 >= 1"), "(a + b) % 3 >= 1");
}

#[test]
fn test_numbers_are_not_identifiers() {
    let expr = translate("1e5 + 0x1F + 3.25", 1).unwrap();
    assert_eq!(expr.text, "1e5 + 0x1F + 3.25");
    assert!(expr.references.is_empty());
}

#[test]
fn test_literal_spelling() {
    assert_eq!(text("true"), "True");
    assert_eq!(text("[false, null, True]"), "[False, None, True]");
    // attribute names are left alone
    assert_eq!(text("flags.true"), "flags.true");
}

// --- references ---
#[test]
fn test_references_and_member_roots() {
    let expr = translate("math.sqrt(x) + len(items) if ok else None", 1).unwrap();
    let refs: Vec<&str> = expr.references.iter().map(String::as_str).collect();
    assert_eq!(refs, vec!["items", "len", "math", "ok", "x"]);
    let roots: Vec<&str> = expr.member_roots.iter().map(String::as_str).collect();
    assert_eq!(roots, vec!["math"]);
}

// --- strings ---
#[test]
fn test_plain_string_unchanged() {
    assert_eq!(text("\"Hola\""), "\"Hola\"");
    assert_eq!(text("'it''s'"), "'it''s'");
}

#[test]
fn test_interpolated_string_becomes_fstring() {
    assert_eq!(text("\"Hola {name}\""), "f\"Hola {name}\"");
    assert_eq!(text("'Área: {area:.2f}'"), "f'Área: {area:.2f}'");
    let expr = translate("\"{user.name} has {count}\"", 1).unwrap();
    assert!(expr.references.contains("user"));
    assert!(expr.references.contains("count"));
    assert!(expr.member_roots.contains("user"));
}

#[test]
fn test_placeholder_contents_are_translated() {
    assert_eq!(text("\"{true}\""), "f\"{True}\"");
    assert_eq!(text("\"{list(range.1.4)}\""), "f\"{list(range(1, 4))}\"");
}

#[test]
fn test_prefixed_strings() {
    assert_eq!(text("f\"{x}\""), "f\"{x}\"");
    assert_eq!(text("r\"\\d{3}\""), "r\"\\d{3}\"");
    assert_eq!(text("b'{raw}'"), "b'{raw}'");
}

#[test]
fn test_escaped_braces_stay_plain() {
    assert_eq!(text("\"{{literal}}\""), "\"{{literal}}\"");
    assert_eq!(text("\"{{x}} {y}\""), "f\"{{x}} {y}\"");
}

#[test]
fn test_triple_quoted_string() {
    assert_eq!(text("\"\"\"say \"hi\" {who}\"\"\""), "f\"\"\"say \"hi\" {who}\"\"\"");
}

#[test]
fn test_escaped_quote_inside_string() {
    assert_eq!(text("\"a \\\" b\""), "\"a \\\" b\"");
}

#[test]
fn test_quote_template() {
    assert_eq!(quote_template("Hola {name}"), "\"Hola {name}\"");
    assert_eq!(text(&quote_template("say \"x\" {y}")), "f\"say \\\"x\\\" {y}\"");
}

// --- range sugar ---
#[test]
fn test_range_sugar() {
    assert_eq!(text("range.1.5"), "range(1, 5)");
    assert_eq!(text("range.1.10.2"), "range(1, 10, 2)");
    assert_eq!(text("list(range.0.n)"), "list(range(0, n))");
    assert_eq!(text("range.10.0.-1"), "range(10, 0, -1)");
    assert_eq!(text("range(3)"), "range(3)");
}

#[test]
fn test_range_sugar_arity_error() {
    let err = translate("range.5", 9).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
    assert_eq!(err.line(), Some(9));
    assert!(translate("range.1.2.3.4", 9).is_err());
}

// --- errors ---
#[test]
fn test_unterminated_string() {
    let err = translate("\"Hola", 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
    assert!(err.to_string().contains("unterminated string"));
}

#[test]
fn test_unbalanced_brackets() {
    assert!(translate("(a + b", 1).is_err());
    assert!(translate("a + b)", 1).is_err());
    assert!(translate("[1, 2)", 1).is_err());
    assert!(translate("f(\")\")", 1).is_ok());
}

#[test]
fn test_bad_placeholders() {
    assert!(translate("\"{x} {}\"", 1).is_err());
    assert!(translate("\"{name\"", 1).is_err());
    assert!(translate("\"{d[\"k\"]}\"", 1).is_err());
}

#[test]
fn test_strings_without_placeholders_keep_stray_braces() {
    assert_eq!(text("\"a } b\""), "\"a } b\"");
    assert_eq!(text("\"{}\".format(x)"), "\"{}\".format(x)");
    assert_eq!(text("\"{x} }\""), "f\"{x} }}\"");
}
