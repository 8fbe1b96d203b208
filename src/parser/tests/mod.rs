//! parser module tests

use super::*;
use crate::config::Config;
use crate::error::ErrorKind;
use crate::lexer::scan;
use pretty_assertions::assert_eq;

fn parse(source: &str) -> Result<Forest> {
    let lines = scan(source, &Config::default())?;
    build(&lines)
}

#[test]
fn test_build_flat_document() {
    let forest = parse("radius: 5\narea: math.pi * radius ** 2\n").unwrap();
    assert_eq!(forest.roots.len(), 2);
    assert_eq!(forest.roots[0].key.as_deref(), Some("radius"));
    assert_eq!(forest.roots[1].line, 2);
    assert!(forest.roots.iter().all(|n| n.role == Role::Unclassified));
}

#[test]
fn test_build_nested_blocks() {
    let code = r#"
function check define n:
  if n > 0:
    print: "positive"
  else:
    print: "non-positive"
check: 3
"#;
    let forest = parse(code).unwrap();
    assert_eq!(forest.roots.len(), 2);
    let func = &forest.roots[0];
    assert_eq!(func.children.len(), 2);
    assert_eq!(func.children[0].children.len(), 1);
    assert_eq!(func.children[1].key.as_deref(), Some("else"));
    assert_eq!(forest.roots[1].key.as_deref(), Some("check"));
}

#[test]
fn test_build_dedent_multiple_levels() {
    let code = "a:\n  b:\n    c: 1\nd: 2\n";
    let forest = parse(code).unwrap();
    assert_eq!(forest.roots.len(), 2);
    assert_eq!(forest.roots[0].children[0].children[0].value.as_deref(), Some("1"));
}

#[test]
fn test_build_rejects_double_indent() {
    let code = "if x > 1:\n    print: x\n";
    // Four spaces is detected as the unit here, so use an explicit unit.
    let config = Config::default().with_source_indentation_unit("  ");
    let lines = scan(code, &config).unwrap();
    let err = build(&lines).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_build_rejects_jump_after_child() {
    let code = "if x > 1:\n  print: x\n      print: y\n";
    let err = parse(code).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_build_comments_follow_next_code_line() {
    let config = Config::default()
        .with_keep_comments(true)
        .with_source_indentation_unit("  ");
    let source = "function f define _:\n# body starts\n  print: 1\n      # ragged\nx: 2\n# end\n";
    let lines = scan(source, &config).unwrap();
    let forest = build(&lines).unwrap();
    assert_eq!(forest.roots.len(), 4);
    assert_eq!(forest.roots[0].children[0].shape, Shape::Comment);
    assert_eq!(forest.roots[0].children[1].key.as_deref(), Some("print"));
    assert_eq!(forest.roots[1].shape, Shape::Comment);
    assert_eq!(forest.roots[1].value.as_deref(), Some("ragged"));
    assert_eq!(forest.roots[3].value.as_deref(), Some("end"));
}

#[test]
fn test_dump_lists_nodes_in_order() {
    let forest = parse("packages:\n  - math\n").unwrap();
    let dump = forest.dump();
    assert_eq!(dump, "[001] Unclassified packages:\n[002]   Unclassified math\n");
}
