//! Symbol table
//!
//! One flat table per transpilation run, filled in document order. A name is
//! only visible to nodes classified after the node that introduced it.

use super::builtins::is_builtin;
use crate::parser::ImportPath;
use std::collections::{BTreeMap, BTreeSet};

/// How an import binds its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import math` / `import numpy as np`
    Module,
    /// `from time import sleep`
    Member,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Function name -> line of its definition
    functions: BTreeMap<String, usize>,
    imports: BTreeMap<String, ImportKind>,
    variables: BTreeSet<String>,
    /// Plain `name: value` assignments -> line of the first one
    assignments: BTreeMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_function(&mut self, name: &str, line: usize) {
        self.functions.insert(name.to_string(), line);
    }

    pub fn define_import(&mut self, path: &ImportPath) {
        let kind = if path.member.is_some() {
            ImportKind::Member
        } else {
            ImportKind::Module
        };
        self.imports.insert(path.bound_name().to_string(), kind);
    }

    pub fn define_variable(&mut self, name: &str) {
        self.variables.insert(name.to_string());
    }

    /// Record a `name: value` line; a later function of that name makes it a call
    pub fn define_assignment(&mut self, name: &str, line: usize) {
        self.variables.insert(name.to_string());
        self.assignments.entry(name.to_string()).or_insert(line);
    }

    pub fn assignment_line(&self, name: &str) -> Option<usize> {
        self.assignments.get(name).copied()
    }

    pub fn function_line(&self, name: &str) -> Option<usize> {
        self.functions.get(name).copied()
    }

    pub fn is_module(&self, name: &str) -> bool {
        self.imports.get(name) == Some(&ImportKind::Module)
    }

    /// Defined functions and imported members
    pub fn is_callable(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.imports.get(name) == Some(&ImportKind::Member)
    }

    /// Any name the generated module binds, plus builtins
    pub fn is_known(&self, name: &str) -> bool {
        self.functions.contains_key(name)
            || self.imports.contains_key(name)
            || self.variables.contains(name)
            || is_builtin(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}
