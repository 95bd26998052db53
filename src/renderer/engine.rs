//! Tree-walking renderer

use std::borrow::Cow;
use std::fmt::Write;

use log::{debug, trace};

use crate::context::{Lambda, ScopeChain, Value};
use crate::parser::{parse_with, Delimiters, Node, Section};
use crate::partials::PartialResolver;
use crate::RenderError;

use super::config::RenderConfig;
use super::escape::escape_html;

/// Walks parsed nodes against a scope chain, writing text to a sink
pub(crate) struct Renderer<'r, P: ?Sized> {
    partials: &'r P,
    config: &'r RenderConfig,
    /// Number of partial or lambda re-renders enclosing this one
    depth: usize,
}

impl<'r, P: PartialResolver + ?Sized> Renderer<'r, P> {
    pub(crate) fn new(partials: &'r P, config: &'r RenderConfig) -> Self {
        Self {
            partials,
            config,
            depth: 0,
        }
    }

    pub(crate) fn render_nodes<W: Write + ?Sized>(
        &self,
        nodes: &[Node],
        chain: &ScopeChain<'_>,
        out: &mut W,
    ) -> Result<(), RenderError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.write_str(text)?,
                Node::Variable { name, escaped } => {
                    self.render_variable(name, *escaped, chain, out)?
                }
                Node::Section(section) if section.inverted => {
                    self.render_inverted(section, chain, out)?
                }
                Node::Section(section) => self.render_section(section, chain, out)?,
                Node::Partial { name, indent } => {
                    self.render_partial(name, indent.as_deref(), chain, out)?
                }
            }
        }
        Ok(())
    }

    /// Parse `source` and render it one level deeper against `chain`
    pub(super) fn render_source<W: Write + ?Sized>(
        &self,
        source: &str,
        delimiters: &Delimiters,
        chain: &ScopeChain<'_>,
        out: &mut W,
    ) -> Result<(), RenderError> {
        let nested = self.nested()?;
        let nodes = parse_with(source, delimiters)?;
        nested.render_nodes(&nodes, chain, out)
    }

    fn nested(&self) -> Result<Renderer<'r, P>, RenderError> {
        let depth = self.depth + 1;
        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(RenderError::DepthExceeded { limit });
            }
        }
        Ok(Renderer {
            partials: self.partials,
            config: self.config,
            depth,
        })
    }

    fn render_variable<W: Write + ?Sized>(
        &self,
        name: &str,
        escaped: bool,
        chain: &ScopeChain<'_>,
        out: &mut W,
    ) -> Result<(), RenderError> {
        let text: Cow<'_, str> = match chain.lookup(name) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::String(s)) => Cow::Borrowed(s),
            Some(Value::Lambda(Lambda::Variable(f))) => {
                Cow::Owned(self.call_variable_lambda(name, f.as_ref(), chain)?)
            }
            Some(value) => Cow::Owned(value.to_string()),
        };

        if escaped && self.config.escape_html {
            escape_html(&text, out)?;
        } else {
            out.write_str(&text)?;
        }
        Ok(())
    }

    fn render_section<'a, W: Write + ?Sized>(
        &self,
        section: &Section,
        chain: &ScopeChain<'a>,
        out: &mut W,
    ) -> Result<(), RenderError> {
        let Some(value) = chain.lookup(&section.name) else {
            return Ok(());
        };
        if self.call_section_lambda(section, value, chain, out)? {
            return Ok(());
        }

        trace!("section '{}' over {}", section.name, value.kind());
        match value {
            Value::Null | Value::Bool(false) => Ok(()),
            Value::String(s) if s.is_empty() => Ok(()),
            Value::Bool(true) => self.render_nodes(&section.children, chain, out),
            Value::List(items) => {
                for item in items {
                    self.render_nodes(&section.children, &chain.push(item), out)?;
                }
                Ok(())
            }
            _ => self.render_nodes(&section.children, &chain.push(value), out),
        }
    }

    fn render_inverted<W: Write + ?Sized>(
        &self,
        section: &Section,
        chain: &ScopeChain<'_>,
        out: &mut W,
    ) -> Result<(), RenderError> {
        let falsey = chain.lookup(&section.name).map_or(true, Value::is_falsey);
        if falsey {
            self.render_nodes(&section.children, chain, out)
        } else {
            Ok(())
        }
    }

    fn render_partial<W: Write + ?Sized>(
        &self,
        name: &str,
        indent: Option<&str>,
        chain: &ScopeChain<'_>,
        out: &mut W,
    ) -> Result<(), RenderError> {
        let Some(source) = self.partials.load(name) else {
            debug!("partial '{}' not found", name);
            return Ok(());
        };
        if source.is_empty() {
            return Ok(());
        }

        let source = match indent {
            Some(indent) if !indent.is_empty() => Cow::Owned(reindent(&source, indent)),
            _ => source,
        };
        self.render_source(&source, &self.config.delimiters, chain, out)
            .map_err(|err| err.within_partial(name))
    }
}

/// Prefix every line of `source` with `indent`
///
/// A trailing newline does not start a new line.
fn reindent(source: &str, indent: &str) -> String {
    let mut out = String::with_capacity(source.len() + indent.len());
    for line in source.split_inclusive('\n') {
        out.push_str(indent);
        out.push_str(line);
    }
    out
}
