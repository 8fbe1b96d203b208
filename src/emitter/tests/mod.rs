//! emitter module tests

use super::*;
use crate::config::BlockStyle;
use crate::error::ErrorKind;
use crate::lexer::scan;
use crate::parser::build;
use crate::semantic::classify;
use pretty_assertions::assert_eq;

fn emit_with(source: &str, config: &Config) -> Result<Emission> {
    let lines = scan(source, config)?;
    let mut forest = build(&lines)?;
    classify(&mut forest)?;
    emit(&forest, config)
}

fn python(source: &str) -> String {
    emit_with(source, &Config::default()).unwrap().code
}

#[test]
fn test_emit_area_example() {
    let source = "packages:\n  - math\nradius: 5\narea: math.pi * radius ** 2\nprint: \"Área: {area}\"\n";
    assert_eq!(
        python(source),
        "import math\nradius = 5\narea = math.pi * radius ** 2\nprint(f\"Área: {area}\")\n"
    );
}

#[test]
fn test_emit_if_elif_else() {
    let source = "x: 3\nif x > 5:\n  print: \"big\"\nelif x > 2:\n  print: \"mid\"\nelse:\n  print: \"small\"\n";
    assert_eq!(
        python(source),
        "x = 3\nif x > 5:\n  print(\"big\")\nelif x > 2:\n  print(\"mid\")\nelse:\n  print(\"small\")\n"
    );
}

#[test]
fn test_emit_brace_dialect_merges_else() {
    let config = Config::default().with_block_style(BlockStyle::Brace);
    let source = "x: 3\nif x > 5:\n  print: x\nelse:\n  print: 0\n";
    assert_eq!(
        emit_with(source, &config).unwrap().code,
        "x = 3\nif x > 5 {\n  print(x)\n} else {\n  print(0)\n}\n"
    );
}

#[test]
fn test_emit_functions_and_calls() {
    let source = "function greet define name:\n  print: \"Hola {name}\"\nfunction main define _:\n  greet: \"Ana\"\n  return\nmain;\n";
    assert_eq!(
        python(source),
        "def greet(name):\n  print(f\"Hola {name}\")\ndef main():\n  greet(\"Ana\")\n  return\nmain()\n"
    );
}

#[test]
fn test_emit_loops() {
    let source = "for i in range.1.10.2:\n  print: i\nfor k, v in data:\n  print: k\nwhile i < 3:\n  break\n";
    assert_eq!(
        python(source),
        "for i in range(1, 10, 2):\n  print(i)\nfor k, v in data.items():\n  print(k)\nwhile i < 3:\n  break\n"
    );
}

#[test]
fn test_emit_imports_in_place() {
    let source = "x: 1\npackages:\n  - time.sleep\n  - numpy as np\n  - os.path.join as join_path\nsleep: 1\n";
    assert_eq!(
        python(source),
        "x = 1\nfrom time import sleep\nimport numpy as np\nfrom os.path import join as join_path\nsleep(1)\n"
    );
}

#[test]
fn test_emit_aggregates() {
    let source = "person:\n  name: \"Ana\"\n  active: true\n  tags:\n    - a\n    - \"b\"\nusers:\n  - name: \"Ana\"\n    age: 30\n  - \"Luis\"\n";
    assert_eq!(
        python(source),
        "person = {'name': \"Ana\", 'active': True, 'tags': [a, \"b\"]}\nusers = [{'name': \"Ana\", 'age': 30}, \"Luis\"]\n"
    );
}

#[test]
fn test_emit_item_with_properties() {
    let source = "tasks:\n  - \"wash\"\n    done: false\n";
    assert_eq!(python(source), "tasks = [{'item': \"wash\", 'done': False}]\n");
}

#[test]
fn test_emit_keyed_item_with_nested_block() {
    let source = "groups:\n  - tags:\n    - a\n    - b\n  - meta:\n    size: 2\n";
    assert_eq!(
        python(source),
        "groups = [{'tags': [a, b]}, {'meta': {'size': 2}}]\n"
    );
}

#[test]
fn test_emit_subscript_target_with_quoted_bracket() {
    let source = "d: {}\nd[\"]\"]: 1\n";
    assert_eq!(python(source), "d = {}\nd[\"]\"] = 1\n");
}

#[test]
fn test_emit_call_arguments() {
    let source = "function show define _:\n  pass\nshow:\nshow:\n  - 1\n  - total\nshow:\n  sep: \", \"\n  end: null\n";
    assert_eq!(
        python(source),
        "def show():\n  pass\nshow()\nshow(1, total)\nshow(sep=\", \", end=None)\n"
    );
}

#[test]
fn test_emit_print_forms() {
    let source = "name: \"Ana\"\nprint:\nprint: Hola {name}\nprint: len([1, {2}])\n";
    assert_eq!(
        python(source),
        "name = \"Ana\"\nprint()\nprint(f\"Hola {name}\")\nprint(len([1, {2}]))\n"
    );
}

#[test]
fn test_emit_print_with_empty_braces_is_an_expression() {
    let source = "x: 1\ny: true\nprint: x if y else {}\n";
    assert_eq!(python(source), "x = 1\ny = True\nprint(x if y else {})\n");
}

#[test]
fn test_emit_comments_when_kept() {
    let config = Config::default().with_keep_comments(true);
    let source = "# setup\nx: 1 # trailing\n";
    assert_eq!(emit_with(source, &config).unwrap().code, "# setup\nx = 1\n");
}

#[test]
fn test_emit_custom_indentation_unit() {
    let config = Config::default().with_indentation_unit("    ");
    let source = "if true:\n  if false:\n    pass\n";
    assert_eq!(
        emit_with(source, &config).unwrap().code,
        "if True:\n    if False:\n        pass\n"
    );
}

#[test]
fn test_emit_collects_member_roots() {
    let emission = emit_with("area: math.pi * r\n", &Config::default()).unwrap();
    assert_eq!(emission.member_roots, vec![(1, "math".to_string())]);
}

#[test]
fn test_emit_translation_errors_abort() {
    let err = emit_with("x: 1\ny: (x + 1\n", &Config::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
    assert_eq!(err.line(), Some(2));

    let err = emit_with("y: range.1\n", &Config::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
}

#[test]
fn test_emit_empty_document() {
    assert_eq!(python(""), "");
    assert_eq!(python("\n\n# only a comment\n"), "");
}
