//! Stache - a Mustache template engine
//!
//! This library provides a lexer, parser and renderer for logic-less
//! Mustache templates, including partials, set-delimiter tags and lambdas.
//!
//! # Example
//!
//! ```rust
//! use stache::{render, NoPartials, Value};
//!
//! let data: Value = [("name", "Chris")].into_iter().collect();
//! let out = render("Hello, {{name}}!", &data, &NoPartials).unwrap();
//! assert_eq!(out, "Hello, Chris!");
//! ```

pub mod context;
pub mod error;
pub mod parser;
pub mod partials;
pub mod renderer;
pub mod template;

pub use context::{Lambda, Number, ScopeChain, Value};
pub use error::{LexError, ParseError};
pub use parser::{parse, Delimiters, Node};
pub use partials::{NoPartials, PartialError, PartialRegistry, PartialResolver};
pub use renderer::{ConfigError, RenderConfig};
pub use template::Template;

use std::fmt;

use thiserror::Error;

use renderer::Renderer;

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    /// The top-level template failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A partial failed to parse or render
    #[error("in partial '{name}': {source}")]
    Partial {
        name: String,
        source: Box<RenderError>,
    },

    /// Text returned by a lambda failed to parse or render
    #[error("in lambda '{name}': {source}")]
    Lambda {
        name: String,
        source: Box<RenderError>,
    },

    /// Partials or lambdas nested deeper than the configured limit
    #[error("nesting depth exceeded the limit of {limit}")]
    DepthExceeded { limit: usize },

    /// The output sink refused a write
    #[error("failed to write output")]
    Write(#[from] fmt::Error),
}

impl RenderError {
    pub(crate) fn within_partial(self, name: &str) -> Self {
        match self {
            RenderError::DepthExceeded { .. } | RenderError::Write(_) => self,
            source => RenderError::Partial {
                name: name.to_string(),
                source: Box::new(source),
            },
        }
    }

    pub(crate) fn within_lambda(self, name: &str) -> Self {
        match self {
            RenderError::DepthExceeded { .. } | RenderError::Write(_) => self,
            source => RenderError::Lambda {
                name: name.to_string(),
                source: Box::new(source),
            },
        }
    }

    /// Format the error for display
    ///
    /// Parse errors in the top-level template are shown against `source`.
    /// Errors from partials and lambdas refer to text the caller does not
    /// hold, so they fall back to the plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RenderError::Parse(err) => err.format(source, filename),
            other => other.to_string(),
        }
    }
}

/// Render a template against `data` with default configuration
///
/// This is the main entry point for the library. It parses the source and
/// renders it with `data` as the only frame of the scope chain.
///
/// # Example
///
/// ```rust
/// use stache::{render, PartialRegistry, Value};
///
/// let partials: PartialRegistry = [("item", "<li>{{.}}</li>")].into_iter().collect();
/// let data: Value = [("items", vec!["a", "b"])].into_iter().collect();
///
/// let out = render("{{#items}}{{>item}}{{/items}}", &data, &partials).unwrap();
/// assert_eq!(out, "<li>a</li><li>b</li>");
/// ```
pub fn render<P>(source: &str, data: &Value, partials: &P) -> Result<String, RenderError>
where
    P: PartialResolver + ?Sized,
{
    render_with_config(source, data, partials, &RenderConfig::default())
}

/// Render a template against `data` with custom configuration
///
/// # Example
///
/// ```rust
/// use stache::{render_with_config, NoPartials, RenderConfig, Value};
///
/// let data: Value = [("html", "<b>")].into_iter().collect();
/// let config = RenderConfig::new().with_escape_html(false);
///
/// let out = render_with_config("{{html}}", &data, &NoPartials, &config).unwrap();
/// assert_eq!(out, "<b>");
/// ```
pub fn render_with_config<P>(
    source: &str,
    data: &Value,
    partials: &P,
    config: &RenderConfig,
) -> Result<String, RenderError>
where
    P: PartialResolver + ?Sized,
{
    let nodes = parser::parse_with(source, &config.delimiters)?;
    let mut out = String::with_capacity(source.len());
    Renderer::new(partials, config).render_nodes(&nodes, &ScopeChain::new(data), &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(entries: Vec<(&str, Value)>) -> Value {
        entries.into_iter().collect()
    }

    #[test]
    fn test_render_simple_variable() {
        let ctx = data(vec![("subject", Value::from("world"))]);
        assert_eq!(render("Hello, {{subject}}!", &ctx, &NoPartials).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_render_missing_is_empty() {
        assert_eq!(render("[{{missing}}]", &Value::Null, &NoPartials).unwrap(), "[]");
    }

    #[test]
    fn test_render_parse_error() {
        let result = render("{{#a}}{{/b}}", &Value::Null, &NoPartials);
        assert!(matches!(
            result,
            Err(RenderError::Parse(ParseError::SectionMismatch { .. }))
        ));
    }

    #[test]
    fn test_render_with_config_delimiters() {
        let ctx = data(vec![("x", Value::from(1))]);
        let config = RenderConfig::new().with_delimiters(Delimiters::new("[[", "]]").unwrap());
        assert_eq!(
            render_with_config("[[x]] {{x}}", &ctx, &NoPartials, &config).unwrap(),
            "1 {{x}}"
        );
    }

    #[test]
    fn test_format_parse_error_shows_source() {
        let source = "{{#list}}\n  item\n";
        let err = render(source, &Value::Null, &NoPartials).unwrap_err();
        let report = err.format(source, "page.mustache");
        assert!(report.contains("page.mustache"));
        assert!(report.contains("list"));
    }

    #[test]
    fn test_format_nested_error_uses_message() {
        let partials: PartialRegistry = [("p", "{{/x}}")].into_iter().collect();
        let err = render("{{>p}}", &Value::Null, &partials).unwrap_err();
        assert_eq!(err.format("{{>p}}", "t"), err.to_string());
        assert!(err.to_string().starts_with("in partial 'p': "));
    }

    #[test]
    fn test_depth_error_is_not_wrapped() {
        let err = RenderError::DepthExceeded { limit: 2 };
        assert!(matches!(
            err.within_partial("p").within_lambda("l"),
            RenderError::DepthExceeded { limit: 2 }
        ));
    }
}
