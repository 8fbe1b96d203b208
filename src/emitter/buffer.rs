//! Emission buffer
//!
//! Collects `(depth, text)` lines and renders them with the configured
//! indentation unit. No semantic decisions are made here.

#[derive(Debug, Clone)]
pub struct EmissionBuffer {
    unit: String,
    lines: Vec<(usize, String)>,
}

impl EmissionBuffer {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, depth: usize, text: impl Into<String>) {
        self.lines.push((depth, text.into()));
    }

    /// Remove the last line if it is exactly `text` at `depth`
    pub fn pop_if_last(&mut self, depth: usize, text: &str) -> bool {
        match self.lines.last() {
            Some((d, t)) if *d == depth && t == text => {
                self.lines.pop();
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Final text, newline-terminated (empty for an empty buffer)
    pub fn finish(self) -> String {
        let mut out = String::new();
        for (depth, text) in &self.lines {
            out.push_str(&self.unit.repeat(*depth));
            out.push_str(text);
            out.push('\n');
        }
        out
    }
}
