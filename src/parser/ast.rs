//! Abstract Syntax Tree types for Mustache templates

use super::lexer::Delimiters;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Value with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A node of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, written verbatim
    Text(String),
    /// Interpolation: `{{name}}`, `{{{name}}}` or `{{&name}}`
    Variable { name: String, escaped: bool },
    /// Section or inverted section: `{{#name}}...{{/name}}`, `{{^name}}...{{/name}}`
    Section(Section),
    /// Partial inclusion: `{{>name}}`
    ///
    /// `indent` is only set when the tag stood alone on its line.
    Partial { name: String, indent: Option<String> },
}

/// A section block with its children and unprocessed inner source
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub inverted: bool,
    pub children: Vec<Node>,
    /// Source between the end of the opening tag and the start of the closing tag
    pub raw: String,
    /// Delimiters in effect at the opening tag
    pub delimiters: Delimiters,
}

impl Node {
    /// Create a text node
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    /// Create an escaped variable node
    pub fn variable(name: impl Into<String>) -> Self {
        Node::Variable {
            name: name.into(),
            escaped: true,
        }
    }

    /// Create an unescaped variable node
    pub fn raw_variable(name: impl Into<String>) -> Self {
        Node::Variable {
            name: name.into(),
            escaped: false,
        }
    }

    /// The tag name, if this node refers to one
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Text(_) => None,
            Node::Variable { name, .. } | Node::Partial { name, .. } => Some(name),
            Node::Section(section) => Some(&section.name),
        }
    }
}
