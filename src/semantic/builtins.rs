//! Target builtins
//!
//! Names the generated Python module can use without defining or importing
//! them. They count as callables for `name;` calls and as known roots for
//! member access, but never turn `name: value` into a call.

use once_cell::sync::Lazy;
use std::collections::HashSet;

pub static PYTHON_BUILTINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abs", "all", "any", "bool", "breakpoint", "chr", "dict", "divmod", "enumerate", "exit",
        "filter", "float", "format", "help", "input", "int", "isinstance", "iter", "len", "list",
        "map", "max", "min", "next", "open", "ord", "pow", "print", "quit", "range", "repr",
        "reversed", "round", "set", "sorted", "str", "sum", "tuple", "type", "zip",
    ]
    .into_iter()
    .collect()
});

pub fn is_builtin(name: &str) -> bool {
    PYTHON_BUILTINS.contains(name)
}
