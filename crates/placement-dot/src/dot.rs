//! DOT format utilities for graph rendering.

use std::fmt::Write;

/// Escape special characters for quoted DOT strings.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Quote `id` as a DOT string identifier.
pub fn quote_id(id: &str) -> String {
    format!("\"{}\"", escape_label(id))
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// Value of a node or edge attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue<'a> {
    /// Written bare when it is a plain identifier, quoted otherwise.
    Text(&'a str),
    /// HTML-like label, written between `<` and `>` untouched.
    Html(&'a str),
}

impl AttrValue<'_> {
    fn write_to(self, output: &mut String) {
        match self {
            AttrValue::Text(text) if is_plain_id(text) => output.push_str(text),
            AttrValue::Text(text) => output.push_str(&quote_id(text)),
            AttrValue::Html(html) => {
                output.push('<');
                output.push_str(html);
                output.push('>');
            }
        }
    }
}

/// A DOT ID that needs no quoting: an alphanumeric name not starting with a
/// digit, or an unsigned integer.
fn is_plain_id(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if first.is_ascii_digit() {
        text.chars().all(|c| c.is_ascii_digit())
    } else {
        text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

/// A DOT graph builder for constructing valid DOT output.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Open an anonymous directed graph.
    pub fn new() -> Self {
        let mut output = String::with_capacity(4096);
        output.push_str("digraph {\n");
        Self { output, indent: 1 }
    }

    /// Add a node style default, e.g. `shape=plaintext`.
    pub fn node_style(&mut self, attrs: &[(&str, AttrValue<'_>)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str("node");
        self.write_attrs(attrs);
        self
    }

    /// Add a node with attributes.
    pub fn node(&mut self, id: &str, attrs: &[(&str, AttrValue<'_>)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str(&quote_id(id));
        self.write_attrs(attrs);
        self
    }

    /// Add an edge with attributes.
    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, AttrValue<'_>)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{} -> {}", quote_id(from), quote_id(to));
        self.write_attrs(attrs);
        self
    }

    fn write_attrs(&mut self, attrs: &[(&str, AttrValue<'_>)]) {
        if !attrs.is_empty() {
            self.output.push_str(" [");
            for (i, (key, value)) in attrs.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.output.push_str(key);
                self.output.push('=');
                value.write_to(&mut self.output);
            }
            self.output.push(']');
        }
        self.output.push('\n');
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

impl Default for DotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
