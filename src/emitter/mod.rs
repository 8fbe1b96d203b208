//! Emitter module - Python code generation
//!
//! Walks the classified forest in document order and produces Python source.
//! Every value goes through the expression translator; block punctuation is
//! delegated to the configured [`BlockDialect`].

pub mod buffer;
pub mod dialect;

use crate::config::Config;
use crate::error::{PymlError, Result};
use crate::parser::utils::is_identifier;
use crate::parser::{Aggregate, Forest, ImportPath, Node, Role, Shape};
use crate::translator::interpolation::{has_placeholders, split_template};
use crate::translator::{quote_template, translate, Expression};
use buffer::EmissionBuffer;
use dialect::{dialect_for, BlockDialect};
use tracing::{debug, info_span};

/// Generated source plus facts gathered while translating values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Emission {
    pub code: String,
    /// `(line, name)` for every identifier used as a member-access root
    pub member_roots: Vec<(usize, String)>,
}

/// Emit Python code from a classified forest
pub fn emit(forest: &Forest, config: &Config) -> Result<Emission> {
    let span = info_span!("pipeline.emit");
    let _enter = span.enter();

    let mut emitter = PythonEmitter::new(config);
    emitter.emit_nodes(&forest.roots)?;
    let emission = emitter.finish();

    debug!(bytes = emission.code.len(), "emitted python source");
    Ok(emission)
}

/// Python code emitter
pub struct PythonEmitter {
    indent: usize,
    dialect: Box<dyn BlockDialect>,
    buffer: EmissionBuffer,
    member_roots: Vec<(usize, String)>,
}

impl PythonEmitter {
    pub fn new(config: &Config) -> Self {
        Self {
            indent: 0,
            dialect: dialect_for(config.target_dialect_block_style),
            buffer: EmissionBuffer::new(config.indentation_unit.clone()),
            member_roots: Vec::new(),
        }
    }

    pub fn finish(self) -> Emission {
        Emission {
            code: self.buffer.finish(),
            member_roots: self.member_roots,
        }
    }

    pub fn emit_nodes(&mut self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            self.emit_node(node)?;
        }
        Ok(())
    }

    fn emit_node(&mut self, node: &Node) -> Result<()> {
        match &node.role {
            Role::Comment => self.line(format!("# {}", node.value_str())),
            Role::Flow => self.line(node.value_str()),
            Role::Assignment(aggregate) => {
                let value = self.entry_value(node, *aggregate)?;
                self.line(format!("{} = {}", node.key_str(), value));
            }
            Role::ArgCall(aggregate) => {
                let args = self.call_arguments(node, *aggregate)?;
                self.line(format!("{}({})", node.key_str(), args));
            }
            Role::BareCall { callee } => self.line(format!("{callee}()")),
            Role::Print => {
                let args = match &node.value {
                    Some(value) if is_bare_template(value) => {
                        self.expression(&quote_template(value), node.line)?
                    }
                    Some(value) => self.expression(value, node.line)?,
                    None => String::new(),
                };
                self.line(format!("print({args})"));
            }
            // Bare `return` keeps its keyword as the node value
            Role::Return => match node.value.as_ref().filter(|_| node.shape == Shape::Keyed) {
                Some(value) => {
                    let value = self.expression(value, node.line)?;
                    self.line(format!("return {value}"));
                }
                None => self.line("return"),
            },
            Role::IfHeader { condition } => {
                let condition = self.expression(condition, node.line)?;
                self.block(&format!("if {condition}"), node, false)?;
            }
            Role::ElifHeader { condition } => {
                let condition = self.expression(condition, node.line)?;
                self.block(&format!("elif {condition}"), node, true)?;
            }
            Role::ElseHeader => self.block("else", node, true)?,
            Role::WhileHeader { condition } => {
                let condition = self.expression(condition, node.line)?;
                self.block(&format!("while {condition}"), node, false)?;
            }
            Role::ForHeader { targets, iterable } => {
                let iterable = if targets.len() == 2 && is_identifier(iterable) {
                    format!("{}.items()", self.expression(iterable, node.line)?)
                } else {
                    self.expression(iterable, node.line)?
                };
                let header = format!("for {} in {}", targets.join(", "), iterable);
                self.block(&header, node, false)?;
            }
            Role::RangeForHeader { targets, range } => {
                let range = self.expression(range, node.line)?;
                let header = format!("for {} in {}", targets.join(", "), range);
                self.block(&header, node, false)?;
            }
            Role::FunctionDef { name, param } => {
                let header = format!("def {}({})", name, param.as_deref().unwrap_or(""));
                self.block(&header, node, false)?;
            }
            Role::ImportList => {
                for child in &node.children {
                    match &child.role {
                        Role::ImportEntry(path) => self.line(import_statement(path)),
                        _ => self.emit_node(child)?,
                    }
                }
            }
            Role::ImportEntry(path) => self.line(import_statement(path)),
            Role::ListEntry(_) | Role::DictEntry(_) | Role::Unclassified => {
                return Err(PymlError::translation(
                    node.line,
                    format!("{} cannot be emitted as a statement", node.role.name()),
                ));
            }
        }
        Ok(())
    }

    fn line(&mut self, text: impl Into<String>) {
        self.buffer.push(self.indent, text);
    }

    /// Header, nested body, and the dialect's closing line
    fn block(&mut self, header: &str, node: &Node, continues_chain: bool) -> Result<()> {
        let mut header = self.dialect.open(header);
        if continues_chain {
            if let Some(close) = self.dialect.close() {
                if self.buffer.pop_if_last(self.indent, close) {
                    header = format!("{close} {header}");
                }
            }
        }
        self.line(header);

        self.indent += 1;
        self.emit_nodes(&node.children)?;
        self.indent -= 1;

        if let Some(close) = self.dialect.close() {
            self.line(close);
        }
        Ok(())
    }

    fn expression(&mut self, raw: &str, line: usize) -> Result<String> {
        let Expression {
            text, member_roots, ..
        } = translate(raw, line)?;
        self.member_roots
            .extend(member_roots.into_iter().map(|root| (line, root)));
        Ok(text)
    }

    /// Right-hand side of an assignment or mapping entry
    fn entry_value(&mut self, node: &Node, aggregate: Aggregate) -> Result<String> {
        match aggregate {
            Aggregate::Scalar => self.expression(node.value_str(), node.line),
            Aggregate::Dict => {
                let pairs = self.dict_pairs(node.code_children())?;
                Ok(format!("{{{}}}", pairs.join(", ")))
            }
            Aggregate::List => {
                let items = self.list_items(node)?;
                Ok(format!("[{}]", items.join(", ")))
            }
        }
    }

    fn dict_pairs<'n>(&mut self, entries: impl Iterator<Item = &'n Node>) -> Result<Vec<String>> {
        let mut pairs = Vec::new();
        for entry in entries {
            let Role::DictEntry(aggregate) = entry.role else {
                continue;
            };
            let key = self.dict_key(entry.key_str(), entry.line)?;
            let value = self.entry_value(entry, aggregate)?;
            pairs.push(format!("{key}: {value}"));
        }
        Ok(pairs)
    }

    /// Bare identifiers become string keys; quoted and numeric keys stay as written
    fn dict_key(&mut self, key: &str, line: usize) -> Result<String> {
        if is_identifier(key) {
            Ok(format!("'{key}'"))
        } else {
            self.expression(key, line)
        }
    }

    fn list_items(&mut self, node: &Node) -> Result<Vec<String>> {
        let mut items = Vec::new();
        for item in node.code_children() {
            let Role::ListEntry(aggregate) = item.role else {
                continue;
            };
            let text = match (&item.key, &item.value, aggregate) {
                // `- tags:` with a nested block
                (Some(key), None, _) => {
                    let key = self.dict_key(key, item.line)?;
                    let value = self.entry_value(item, aggregate)?;
                    format!("{{{key}: {value}}}")
                }
                (_, _, Aggregate::Scalar) => self.expression(item.value_str(), item.line)?,
                (_, _, Aggregate::List) => {
                    let nested = self.list_items(item)?;
                    format!("[{}]", nested.join(", "))
                }
                (_, _, Aggregate::Dict) => self.item_mapping(item)?,
            };
            items.push(text);
        }
        Ok(items)
    }

    /// A list item that holds a mapping: `- name: Ana` or `- Ana` plus entries
    fn item_mapping(&mut self, item: &Node) -> Result<String> {
        let mut pairs = Vec::new();
        match (&item.key, &item.value) {
            (Some(key), Some(value)) => {
                let key = self.dict_key(key, item.line)?;
                let value = self.expression(value, item.line)?;
                pairs.push(format!("{key}: {value}"));
            }
            (None, Some(value)) => {
                let value = self.expression(value, item.line)?;
                pairs.push(format!("'item': {value}"));
            }
            _ => {}
        }
        pairs.extend(self.dict_pairs(item.code_children())?);
        Ok(format!("{{{}}}", pairs.join(", ")))
    }

    fn call_arguments(&mut self, node: &Node, aggregate: Aggregate) -> Result<String> {
        match aggregate {
            Aggregate::Scalar => match &node.value {
                Some(value) => self.expression(value, node.line),
                None => Ok(String::new()),
            },
            Aggregate::List => Ok(self.list_items(node)?.join(", ")),
            Aggregate::Dict => {
                let mut kwargs = Vec::new();
                for entry in node.code_children() {
                    let Role::DictEntry(aggregate) = entry.role else {
                        continue;
                    };
                    let name = entry.key_str();
                    if !is_identifier(name) {
                        return Err(PymlError::translation(
                            entry.line,
                            format!("keyword argument name `{name}` is not an identifier"),
                        ));
                    }
                    let value = self.entry_value(entry, aggregate)?;
                    kwargs.push(format!("{name}={value}"));
                }
                Ok(kwargs.join(", "))
            }
        }
    }
}

fn import_statement(path: &ImportPath) -> String {
    let alias = path
        .alias
        .as_deref()
        .map(|a| format!(" as {a}"))
        .unwrap_or_default();
    match &path.member {
        Some(member) => format!("from {} import {}{}", path.module, member, alias),
        None => format!("import {}{}", path.module, alias),
    }
}

/// Unquoted print text with placeholders: `Hola {name}`
fn is_bare_template(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if matches!(first, '"' | '\'' | '(' | '[' | '{') {
        return false;
    }
    // `f"..."`, `rb'...'`
    let prefix_len = value
        .chars()
        .take_while(|c| matches!(c.to_ascii_lowercase(), 'r' | 'b' | 'f' | 'u'))
        .count();
    if prefix_len <= 2 && matches!(value.chars().nth(prefix_len), Some('"' | '\'')) {
        return false;
    }
    // `{` inside a call or subscript is a literal, not a placeholder
    match value.find('{') {
        Some(pos) if !value[..pos].contains(['(', '[']) => split_template(value, 0)
            .map(|segments| has_placeholders(&segments))
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests;
