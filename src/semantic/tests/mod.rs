//! semantic module tests

use super::*;
use crate::config::Config;
use crate::error::ErrorKind;
use crate::lexer::scan;
use crate::parser::build;
use pretty_assertions::assert_eq;

fn classified(source: &str) -> Result<(Forest, SymbolTable)> {
    let lines = scan(source, &Config::default())?;
    let mut forest = build(&lines)?;
    let symbols = classify(&mut forest)?;
    Ok((forest, symbols))
}

fn roles(source: &str) -> Vec<Role> {
    let (forest, _) = classified(source).unwrap();
    forest.roots.into_iter().map(|n| n.role).collect()
}

#[test]
fn test_classify_assignments_and_print() {
    let roles = roles("radius: 5\narea: math.pi * radius ** 2\nprint: \"Área: {area}\"\n");
    assert_eq!(
        roles,
        vec![
            Role::Assignment(Aggregate::Scalar),
            Role::Assignment(Aggregate::Scalar),
            Role::Print,
        ]
    );
}

#[test]
fn test_classify_if_else_chain() {
    let code = "x: 3\nif x > 5:\n  print: 1\nelif x > 2:\n  print: 2\nelse:\n  print: 3\n";
    let roles = roles(code);
    assert_eq!(roles[1], Role::IfHeader { condition: "x > 5".to_string() });
    assert_eq!(roles[2], Role::ElifHeader { condition: "x > 2".to_string() });
    assert_eq!(roles[3], Role::ElseHeader);
}

#[test]
fn test_else_without_if_is_rejected() {
    let err = classified("x: 1\nelse:\n  print: x\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Classification);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_classify_for_headers() {
    let code = "for i in range.1.10.2:\n  print: i\nfor k, v in data:\n  print: k\n";
    let roles = roles(code);
    assert_eq!(
        roles[0],
        Role::RangeForHeader {
            targets: vec!["i".to_string()],
            range: "range.1.10.2".to_string(),
        }
    );
    assert_eq!(
        roles[1],
        Role::ForHeader {
            targets: vec!["k".to_string(), "v".to_string()],
            iterable: "data".to_string(),
        }
    );
}

#[test]
fn test_range_header_arity_is_a_translation_error() {
    let err = classified("for i in range.5:\n  print: i\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_function_then_calls() {
    let code = "function greet define name:\n  print: \"Hola {name}\"\ngreet: \"Ana\"\nfunction main define _:\n  greet: \"Luis\"\nmain;\n";
    let (forest, symbols) = classified(code).unwrap();
    assert_eq!(
        forest.roots[0].role,
        Role::FunctionDef {
            name: "greet".to_string(),
            param: Some("name".to_string()),
        }
    );
    assert_eq!(forest.roots[1].role, Role::ArgCall(Aggregate::Scalar));
    assert_eq!(
        forest.roots[2].role,
        Role::FunctionDef {
            name: "main".to_string(),
            param: None,
        }
    );
    assert_eq!(forest.roots[2].children[0].role, Role::ArgCall(Aggregate::Scalar));
    assert_eq!(
        forest.roots[3].role,
        Role::BareCall {
            callee: "main".to_string()
        }
    );
    assert_eq!(symbols.functions().collect::<Vec<_>>(), vec!["greet", "main"]);
}

#[test]
fn test_call_before_definition_is_undefined() {
    let err = classified("greet;\nfunction greet define _:\n  print: 1\n").unwrap_err();
    assert!(matches!(err, PymlError::UndefinedCallable { ref name, line: 1 } if name == "greet"));
    assert_eq!(err.kind(), ErrorKind::Translation);
}

#[test]
fn test_keyed_call_before_definition_is_undefined() {
    let err = classified("greet: \"Ana\"\nfunction greet define n:\n  print: n\n").unwrap_err();
    assert!(matches!(err, PymlError::UndefinedCallable { ref name, line: 1 } if name == "greet"));
}

#[test]
fn test_assignment_to_other_names_does_not_block_functions() {
    let (_, symbols) = classified("total: 1\nfunction greet define n:\n  total: n\ngreet: total\n").unwrap();
    assert_eq!(symbols.function_line("greet"), Some(2));
}

#[test]
fn test_bare_call_of_builtin_and_imported_member() {
    let code = "packages:\n  - time.sleep\n  - os\nsleep;\nos.getcwd;\ninput;\n";
    let roles = roles(code);
    assert_eq!(roles[0], Role::ImportList);
    assert_eq!(roles[1], Role::BareCall { callee: "sleep".to_string() });
    assert_eq!(roles[2], Role::BareCall { callee: "os.getcwd".to_string() });
    assert_eq!(roles[3], Role::BareCall { callee: "input".to_string() });
}

#[test]
fn test_import_entries() {
    let (forest, symbols) = classified("packages:\n  - math\n  - numpy as np\n  - time.sleep\n").unwrap();
    let entries: Vec<&Role> = forest.roots[0].children.iter().map(|c| &c.role).collect();
    assert_eq!(
        entries[1],
        &Role::ImportEntry(ImportPath {
            module: "numpy".to_string(),
            member: None,
            alias: Some("np".to_string()),
        })
    );
    assert_eq!(
        entries[2],
        &Role::ImportEntry(ImportPath {
            module: "time".to_string(),
            member: Some("sleep".to_string()),
            alias: None,
        })
    );
    assert!(symbols.is_module("np"));
    assert!(symbols.is_callable("sleep"));
}

#[test]
fn test_import_entries_must_be_paths() {
    let err = classified("packages:\n  - math:\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Classification);
    let err = classified("packages:\n  - 3d\n").unwrap_err();
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_module_member_key_is_a_call() {
    let roles = roles("packages:\n  - random\nrandom.seed: 42\n");
    assert_eq!(roles[1], Role::ArgCall(Aggregate::Scalar));
}

#[test]
fn test_attribute_key_of_variable_is_assignment() {
    let roles = roles("person: Person()\nperson.name: \"Ana\"\n");
    assert_eq!(roles[1], Role::Assignment(Aggregate::Scalar));
}

#[test]
fn test_nested_aggregates() {
    let code = "person:\n  name: \"Ana\"\n  tags:\n    - a\n    - b\nusers:\n  - name: \"Ana\"\n    age: 30\n  - Luis\n";
    let (forest, _) = classified(code).unwrap();
    let person = &forest.roots[0];
    assert_eq!(person.role, Role::Assignment(Aggregate::Dict));
    assert_eq!(person.children[0].role, Role::DictEntry(Aggregate::Scalar));
    assert_eq!(person.children[1].role, Role::DictEntry(Aggregate::List));
    assert_eq!(person.children[1].children[0].role, Role::ListEntry(Aggregate::Scalar));

    let users = &forest.roots[1];
    assert_eq!(users.role, Role::Assignment(Aggregate::List));
    assert_eq!(users.children[0].role, Role::ListEntry(Aggregate::Dict));
    assert_eq!(users.children[0].children[0].role, Role::DictEntry(Aggregate::Scalar));
    assert_eq!(users.children[1].role, Role::ListEntry(Aggregate::Scalar));
}

#[test]
fn test_mixed_children_are_rejected() {
    let err = classified("data:\n  a: 1\n  - 2\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Classification);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_call_argument_forms() {
    let code = "function show define _:\n  pass\nshow:\nshow:\n  - 1\n  - 2\nshow:\n  sep: \", \"\n";
    let roles = roles(code);
    assert_eq!(roles[1], Role::ArgCall(Aggregate::Scalar));
    assert_eq!(roles[2], Role::ArgCall(Aggregate::List));
    assert_eq!(roles[3], Role::ArgCall(Aggregate::Dict));
}

#[test]
fn test_flow_and_bare_return() {
    let code = "while true:\n  break\nfunction f define _:\n  return\n";
    let (forest, _) = classified(code).unwrap();
    assert_eq!(forest.roots[0].children[0].role, Role::Flow);
    assert_eq!(forest.roots[1].children[0].role, Role::Return);
}

#[test]
fn test_block_without_body() {
    let err = classified("if x > 1:\nprint: 1\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_leaf_with_children_is_rejected() {
    let err = classified("print: 1\n  x: 2\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Classification);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_header_missing_colon() {
    let err = classified("if x > 1\n").unwrap_err();
    assert!(err.to_string().contains("missing ':'"));
}

#[test]
fn test_unrecognized_statements() {
    for bad in ["x + 1\n", "1 + 1: 2\n", "- 1\n", ": 2\n"] {
        let err = classified(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Classification, "{bad}");
        assert_eq!(err.line(), Some(1));
    }
}

#[test]
fn test_comments_keep_else_adjacent() {
    let config = Config::default().with_keep_comments(true);
    let lines = scan("if x:\n  pass\n# otherwise\nelse:\n  pass\n", &config).unwrap();
    let mut forest = build(&lines).unwrap();
    classify(&mut forest).unwrap();
    assert_eq!(forest.roots[1].role, Role::Comment);
    assert_eq!(forest.roots[2].role, Role::ElseHeader);
}
