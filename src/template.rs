//! Compiled templates
//!
//! A [`Template`] parses its source once and can then be rendered any
//! number of times, from any number of threads, against different data.

use std::fmt::Write;

use crate::context::{ScopeChain, Value};
use crate::error::ParseError;
use crate::parser::{parse_with, Delimiters, Node};
use crate::partials::PartialResolver;
use crate::renderer::{RenderConfig, Renderer};
use crate::RenderError;

/// A parsed template together with its source
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse `source` with the default delimiters
    pub fn compile(source: impl Into<String>) -> Result<Self, ParseError> {
        Self::compile_with(source, &Delimiters::default())
    }

    /// Parse `source` starting from the given delimiters
    pub fn compile_with(
        source: impl Into<String>,
        delimiters: &Delimiters,
    ) -> Result<Self, ParseError> {
        let source = source.into();
        let nodes = parse_with(&source, delimiters)?;
        Ok(Self { source, nodes })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Render against `data` with the default configuration
    pub fn render<P>(&self, data: &Value, partials: &P) -> Result<String, RenderError>
    where
        P: PartialResolver + ?Sized,
    {
        self.render_with_config(data, partials, &RenderConfig::default())
    }

    /// Render against `data` with a custom configuration
    ///
    /// The template was already parsed, so `config.delimiters` only affects
    /// partials loaded during this render.
    pub fn render_with_config<P>(
        &self,
        data: &Value,
        partials: &P,
        config: &RenderConfig,
    ) -> Result<String, RenderError>
    where
        P: PartialResolver + ?Sized,
    {
        let mut out = String::with_capacity(self.source.len());
        self.render_to(data, partials, config, &mut out)?;
        Ok(out)
    }

    /// Render into an existing sink
    pub fn render_to<P, W>(
        &self,
        data: &Value,
        partials: &P,
        config: &RenderConfig,
        out: &mut W,
    ) -> Result<(), RenderError>
    where
        P: PartialResolver + ?Sized,
        W: Write + ?Sized,
    {
        Renderer::new(partials, config).render_nodes(&self.nodes, &ScopeChain::new(data), out)
    }
}
