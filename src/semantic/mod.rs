//! Semantic analysis module - node classification
//!
//! Assigns every node its role. Classification is a single forward pass in
//! document order: the role of a node depends on its own shape, the context
//! its parent opens, its previous sibling (for `else`/`elif`), and the names
//! declared so far. A function can only be called after its definition.

mod builtins;
mod scope;

pub use builtins::*;
pub use scope::*;

use crate::error::{PymlError, Result};
use crate::parser::header::{header_keyword, parse_header, parse_range, Header};
use crate::parser::utils::{find_keyword_balanced, is_assignable_target, is_dotted_path, is_identifier, is_ident_char};
use crate::parser::{Aggregate, Forest, ImportPath, Node, Role, Shape};
use tracing::{debug, info_span, trace};

/// What the parent of a group of siblings expects them to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Statements (top level or a block body)
    Block,
    /// Entries of a `packages:` list
    Imports,
    /// `key: value` entries of a mapping
    Dict,
    /// `- value` entries of a list
    List,
}

/// Classify every node of the forest in document order
pub fn classify(forest: &mut Forest) -> Result<SymbolTable> {
    let span = info_span!("pipeline.classify");
    let _enter = span.enter();

    let mut classifier = Classifier::default();
    classifier.classify_siblings(&mut forest.roots, Context::Block)?;

    debug!(
        functions = classifier.symbols.functions().count(),
        "classified block forest"
    );
    Ok(classifier.symbols)
}

#[derive(Default)]
struct Classifier {
    symbols: SymbolTable,
}

impl Classifier {
    fn classify_siblings(&mut self, nodes: &mut [Node], context: Context) -> Result<()> {
        let mut previous: Option<Role> = None;
        for node in nodes.iter_mut() {
            let role = self.decide(node, context, previous.as_ref())?;
            check_children(node, &role)?;
            trace!(line = node.line, role = role.name(), "classified node");

            let child_context = match &role {
                Role::ImportList => Context::Imports,
                r => match r.aggregate() {
                    Some(Aggregate::Dict) => Context::Dict,
                    Some(Aggregate::List) => Context::List,
                    _ => Context::Block,
                },
            };
            node.role = role;
            self.classify_siblings(&mut node.children, child_context)?;

            if node.shape != Shape::Comment {
                previous = Some(node.role.clone());
            }
        }
        Ok(())
    }

    fn decide(&mut self, node: &Node, context: Context, previous: Option<&Role>) -> Result<Role> {
        if node.shape == Shape::Comment {
            return Ok(Role::Comment);
        }
        match context {
            Context::Imports => self.import_entry(node),
            Context::Dict => dict_entry(node),
            Context::List => list_entry(node),
            Context::Block => match node.shape {
                Shape::Keyed => self.keyed_statement(node, previous),
                Shape::Bare => self.bare_statement(node),
                Shape::Item | Shape::Comment => Err(PymlError::classification(
                    node.line,
                    "list item outside of a list (give it a `name:` line above)",
                )),
            },
        }
    }

    fn keyed_statement(&mut self, node: &Node, previous: Option<&Role>) -> Result<Role> {
        let key = node.key_str();
        if header_keyword(key).is_some() {
            return self.header(node, previous);
        }
        match key {
            "print" => return Ok(Role::Print),
            "return" => return Ok(Role::Return),
            "packages" => {
                if node.value.is_some() || !node.has_code_children() {
                    return Err(PymlError::classification(
                        node.line,
                        "'packages:' takes no inline value and needs an indented `- module` list",
                    ));
                }
                return Ok(Role::ImportList);
            }
            "" => {
                return Err(PymlError::classification(node.line, "missing name before ':'"));
            }
            _ => {}
        }

        if self.is_callable_key(key) {
            return call_aggregate(node).map(Role::ArgCall);
        }
        if !is_assignable_target(key) {
            return Err(PymlError::classification(
                node.line,
                format!("unrecognized statement `{key}:`"),
            ));
        }
        let aggregate = entry_aggregate(node, key)?;
        if is_identifier(key) {
            self.symbols.define_assignment(key, node.line);
        } else {
            for target in key.split(',') {
                self.symbols.define_variable(&root_name(target));
            }
        }
        Ok(Role::Assignment(aggregate))
    }

    /// `name: ...` calls a defined function, an imported member, or a member
    /// of an imported module.
    fn is_callable_key(&self, key: &str) -> bool {
        if self.symbols.is_callable(key) {
            return true;
        }
        match key.split_once('.') {
            Some((root, rest)) => self.symbols.is_module(root) && is_dotted_path(rest),
            None => false,
        }
    }

    fn header(&mut self, node: &Node, previous: Option<&Role>) -> Result<Role> {
        let key = node.key_str();
        let keyword = header_keyword(key).unwrap_or("if");
        if node.value.is_some() {
            return Err(PymlError::classification(
                node.line,
                format!("'{keyword}' header must end with ':' and put its body on the following lines"),
            ));
        }

        let role = match parse_header(key, node.line)? {
            Header::If(condition) => Role::IfHeader { condition },
            Header::Elif(condition) => {
                require_if_before(node, previous, "elif")?;
                Role::ElifHeader { condition }
            }
            Header::Else => {
                require_if_before(node, previous, "else")?;
                Role::ElseHeader
            }
            Header::While(condition) => Role::WhileHeader { condition },
            Header::For { targets, iterable } => {
                for target in &targets {
                    self.symbols.define_variable(target);
                }
                if iterable.starts_with("range.") {
                    parse_range(&iterable, node.line)?;
                    Role::RangeForHeader {
                        targets,
                        range: iterable,
                    }
                } else {
                    Role::ForHeader { targets, iterable }
                }
            }
            Header::Function { name, param } => {
                // `name: args` above this line meant a call, not a binding
                if let Some(line) = self.symbols.assignment_line(&name) {
                    return Err(PymlError::UndefinedCallable { name, line });
                }
                let param = (param != "_").then_some(param);
                if let Some(param) = &param {
                    self.symbols.define_variable(param);
                }
                // Declared before the body so the body may recurse.
                self.symbols.define_function(&name, node.line);
                Role::FunctionDef { name, param }
            }
        };

        if !node.has_code_children() {
            return Err(PymlError::structural(
                node.line,
                format!("'{keyword}' block has no body"),
            ));
        }
        Ok(role)
    }

    fn bare_statement(&mut self, node: &Node) -> Result<Role> {
        let text = node.value_str();
        if let Some(callee) = text.strip_suffix(';') {
            let callee = callee.trim();
            if !is_dotted_path(callee) {
                return Err(PymlError::classification(
                    node.line,
                    format!("`{text}` is not a call; expected `name;`"),
                ));
            }
            self.resolve_call(callee, node.line)?;
            return Ok(Role::BareCall {
                callee: callee.to_string(),
            });
        }
        match text {
            "break" | "continue" | "pass" => Ok(Role::Flow),
            "return" => Ok(Role::Return),
            _ => match header_keyword(text) {
                Some(keyword) => Err(PymlError::classification(
                    node.line,
                    format!("missing ':' after '{keyword}' header"),
                )),
                None => Err(PymlError::classification(
                    node.line,
                    format!("unrecognized statement `{text}`"),
                )),
            },
        }
    }

    /// A called name must already be declared when the call is reached
    fn resolve_call(&self, callee: &str, line: usize) -> Result<()> {
        let resolved = match callee.split_once('.') {
            Some((root, _)) => self.symbols.is_known(root),
            None => self.symbols.is_callable(callee) || is_builtin(callee),
        };
        if resolved {
            Ok(())
        } else {
            Err(PymlError::UndefinedCallable {
                name: callee.to_string(),
                line,
            })
        }
    }

    fn import_entry(&mut self, node: &Node) -> Result<Role> {
        let text = match (node.shape, &node.key, &node.value) {
            (Shape::Item, None, Some(text)) => text.as_str(),
            _ => {
                return Err(PymlError::classification(
                    node.line,
                    "'packages:' entries must be `- module` or `- module.member`",
                ));
            }
        };

        let (path, alias) = match find_keyword_balanced(text, "as") {
            Some(pos) => (text[..pos].trim(), Some(text[pos + 2..].trim())),
            None => (text, None),
        };
        if !is_dotted_path(path) || alias.is_some_and(|a| !is_identifier(a)) {
            return Err(PymlError::classification(
                node.line,
                format!("invalid package entry `{text}`"),
            ));
        }

        let import = match path.rsplit_once('.') {
            Some((module, member)) => ImportPath {
                module: module.to_string(),
                member: Some(member.to_string()),
                alias: alias.map(str::to_string),
            },
            None => ImportPath {
                module: path.to_string(),
                member: None,
                alias: alias.map(str::to_string),
            },
        };
        self.symbols.define_import(&import);
        Ok(Role::ImportEntry(import))
    }
}

fn require_if_before(node: &Node, previous: Option<&Role>, keyword: &str) -> Result<()> {
    match previous {
        Some(Role::IfHeader { .. }) | Some(Role::ElifHeader { .. }) => Ok(()),
        _ => Err(PymlError::classification(
            node.line,
            format!("'{keyword}' must directly follow an 'if' or 'elif' block"),
        )),
    }
}

/// Leaf roles may not own an indented block
fn check_children(node: &Node, role: &Role) -> Result<()> {
    let may_have_children = role.opens_block()
        || *role == Role::ImportList
        || matches!(role.aggregate(), Some(Aggregate::Dict) | Some(Aggregate::List));
    if !may_have_children && node.has_code_children() {
        return Err(PymlError::classification(
            node.line,
            format!("{} cannot own an indented block", role.name()),
        ));
    }
    Ok(())
}

/// Leading identifier of an assignment target (`person` in `person.name`)
fn root_name(target: &str) -> String {
    target.trim().chars().take_while(|c| is_ident_char(*c)).collect()
}

/// Dict or List, decided by the children's shapes
fn children_aggregate(node: &Node) -> Result<Aggregate> {
    let mut shapes = node.code_children().map(|c| c.shape);
    let first = shapes.next();
    let aggregate = match first {
        Some(Shape::Keyed) => Aggregate::Dict,
        Some(Shape::Item) => Aggregate::List,
        _ => {
            return Err(PymlError::classification(
                node.line,
                "nested block must hold `key: value` entries or `- item` entries",
            ));
        }
    };
    if shapes.any(|s| Some(s) != first) {
        return Err(PymlError::classification(
            node.line,
            "nested block mixes `key: value` entries with other lines",
        ));
    }
    Ok(aggregate)
}

/// Assignment and mapping entries: a scalar, or a nested dict/list
fn entry_aggregate(node: &Node, key: &str) -> Result<Aggregate> {
    match (node.value.is_some(), node.has_code_children()) {
        (true, false) => Ok(Aggregate::Scalar),
        (false, true) => children_aggregate(node),
        (true, true) => Err(PymlError::classification(
            node.line,
            format!("`{key}:` has both an inline value and an indented block"),
        )),
        (false, false) => Err(PymlError::classification(
            node.line,
            format!("`{key}:` has no value"),
        )),
    }
}

/// Call arguments: inline, positional list, keyword mapping, or none
fn call_aggregate(node: &Node) -> Result<Aggregate> {
    match (node.value.is_some(), node.has_code_children()) {
        (_, false) => Ok(Aggregate::Scalar),
        (false, true) => children_aggregate(node),
        (true, true) => Err(PymlError::classification(
            node.line,
            format!(
                "call to `{}` has both inline arguments and an indented block",
                node.key_str()
            ),
        )),
    }
}

fn dict_entry(node: &Node) -> Result<Role> {
    if node.shape != Shape::Keyed {
        return Err(PymlError::classification(
            node.line,
            "expected a `key: value` entry inside a mapping",
        ));
    }
    let key = node.key_str();
    if key.is_empty() {
        return Err(PymlError::classification(node.line, "missing key before ':'"));
    }
    entry_aggregate(node, key).map(Role::DictEntry)
}

fn list_entry(node: &Node) -> Result<Role> {
    if node.shape != Shape::Item {
        return Err(PymlError::classification(
            node.line,
            "expected a `- item` entry inside a list",
        ));
    }
    let has_children = node.has_code_children();
    let aggregate = if node.key.is_some() {
        match (node.value.is_some(), has_children) {
            // `- name: value` opens a mapping; further entries may follow indented
            (true, false) => Aggregate::Dict,
            (true, true) => {
                if children_aggregate(node)? != Aggregate::Dict {
                    return Err(PymlError::classification(
                        node.line,
                        "a `- key: value` item can only continue with more `key: value` entries",
                    ));
                }
                Aggregate::Dict
            }
            // `- tags:` holds its nested block as the value of `tags`
            (false, true) => children_aggregate(node)?,
            (false, false) => {
                return Err(PymlError::classification(
                    node.line,
                    format!("`{}:` has no value", node.key_str()),
                ));
            }
        }
    } else if has_children {
        let aggregate = children_aggregate(node)?;
        if aggregate == Aggregate::List && node.value.is_some() {
            return Err(PymlError::classification(
                node.line,
                "a list item with a value cannot also hold a nested list",
            ));
        }
        aggregate
    } else if node.value.is_some() {
        Aggregate::Scalar
    } else {
        return Err(PymlError::classification(node.line, "empty list item"));
    };
    Ok(Role::ListEntry(aggregate))
}

#[cfg(test)]
mod tests;
