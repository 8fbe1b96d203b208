//! Block tree definitions

use super::utils::{find_char_balanced, is_identifier};
use crate::lexer::{LineKind, LogicalLine};
use serde::Serialize;

/// Syntactic form of the line a node was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    /// `key: value` or `key:` (split on the first top-level colon)
    Keyed,
    /// No top-level colon: `greet;`, `break`
    Bare,
    /// Dash-prefixed list item: `- value`
    Item,
    /// Kept whole-line comment
    Comment,
}

/// What an aggregate-capable node holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Aggregate {
    /// Inline value on the node's own line
    Scalar,
    /// Children are `key: value` entries
    Dict,
    /// Children are `- value` entries
    List,
}

/// One entry of a `packages:` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportPath {
    pub module: String,
    /// Last path component when the entry names a member (`time.sleep`)
    pub member: Option<String>,
    pub alias: Option<String>,
}

impl ImportPath {
    /// Name the import makes available in the generated module
    pub fn bound_name(&self) -> &str {
        self.alias
            .as_deref()
            .or(self.member.as_deref())
            .unwrap_or(&self.module)
    }
}

/// Semantic role of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Role {
    Unclassified,
    /// `key: value`, or `key:` with a nested dict/list
    Assignment(Aggregate),
    /// `name;`
    BareCall { callee: String },
    /// `callable: args`
    ArgCall(Aggregate),
    IfHeader { condition: String },
    ElifHeader { condition: String },
    ElseHeader,
    WhileHeader { condition: String },
    ForHeader { targets: Vec<String>, iterable: String },
    RangeForHeader { targets: Vec<String>, range: String },
    FunctionDef { name: String, param: Option<String> },
    Return,
    Print,
    ImportList,
    ImportEntry(ImportPath),
    ListEntry(Aggregate),
    DictEntry(Aggregate),
    /// `break`, `continue`, `pass`
    Flow,
    Comment,
}

impl Role {
    /// Roles whose children form an indented body
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            Role::IfHeader { .. }
                | Role::ElifHeader { .. }
                | Role::ElseHeader
                | Role::WhileHeader { .. }
                | Role::ForHeader { .. }
                | Role::RangeForHeader { .. }
                | Role::FunctionDef { .. }
        )
    }

    /// What the children of this role hold, for roles that carry literals
    pub fn aggregate(&self) -> Option<Aggregate> {
        match self {
            Role::Assignment(a) | Role::ArgCall(a) | Role::ListEntry(a) | Role::DictEntry(a) => {
                Some(*a)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Unclassified => "Unclassified",
            Role::Assignment(_) => "Assignment",
            Role::BareCall { .. } => "BareCall",
            Role::ArgCall(_) => "ArgCall",
            Role::IfHeader { .. } => "IfHeader",
            Role::ElifHeader { .. } => "ElifHeader",
            Role::ElseHeader => "ElseHeader",
            Role::WhileHeader { .. } => "WhileHeader",
            Role::ForHeader { .. } => "ForHeader",
            Role::RangeForHeader { .. } => "RangeForHeader",
            Role::FunctionDef { .. } => "FunctionDef",
            Role::Return => "Return",
            Role::Print => "Print",
            Role::ImportList => "ImportList",
            Role::ImportEntry(_) => "ImportEntry",
            Role::ListEntry(_) => "ListEntry",
            Role::DictEntry(_) => "DictEntry",
            Role::Flow => "Flow",
            Role::Comment => "Comment",
        }
    }
}

/// One element of the block tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub role: Role,
    pub shape: Shape,
    pub key: Option<String>,
    pub value: Option<String>,
    pub children: Vec<Node>,
    pub line: usize,
}

impl Node {
    /// Build an unclassified node from a logical line
    pub fn from_line(line: &LogicalLine) -> Self {
        let (shape, key, value) = if line.kind == LineKind::Comment {
            (Shape::Comment, None, Some(line.content.clone()))
        } else {
            split_content(&line.content)
        };
        Self {
            role: Role::Unclassified,
            shape,
            key,
            value,
            children: Vec::new(),
            line: line.line,
        }
    }

    /// Children that are not kept comments
    pub fn code_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|c| c.shape != Shape::Comment)
    }

    pub fn has_code_children(&self) -> bool {
        self.code_children().next().is_some()
    }

    pub fn key_str(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn split_content(content: &str) -> (Shape, Option<String>, Option<String>) {
    if content == "-" {
        return (Shape::Item, None, None);
    }
    if let Some(item) = content.strip_prefix("- ") {
        let item = item.trim();
        // `- name: Ana` carries an inline pair
        if let Some(pos) = find_char_balanced(item, ':') {
            let key = item[..pos].trim();
            if is_identifier(key) || is_quoted(key) {
                return (
                    Shape::Item,
                    Some(key.to_string()),
                    non_empty(&item[pos + 1..]),
                );
            }
        }
        return (Shape::Item, None, non_empty(item));
    }
    match find_char_balanced(content, ':') {
        Some(pos) => (
            Shape::Keyed,
            Some(content[..pos].trim().to_string()),
            non_empty(&content[pos + 1..]),
        ),
        None => (Shape::Bare, None, non_empty(content)),
    }
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

/// Ordered block trees of one document
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Forest {
    pub roots: Vec<Node>,
}

impl Forest {
    pub fn new(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Render one line per node: line number, indented role and source text
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            dump_node(root, 0, &mut out);
        }
        out
    }
}

fn dump_node(node: &Node, depth: usize, out: &mut String) {
    let text = match (&node.key, &node.value) {
        (Some(k), Some(v)) => format!("{k}: {v}"),
        (Some(k), None) => format!("{k}:"),
        (None, Some(v)) => v.clone(),
        (None, None) => String::new(),
    };
    out.push_str(&format!(
        "[{:03}] {}{} {}\n",
        node.line,
        "  ".repeat(depth),
        node.role.name(),
        text
    ));
    for child in &node.children {
        dump_node(child, depth + 1, out);
    }
}
