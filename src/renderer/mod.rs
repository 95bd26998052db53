//! Renderer for parsed templates
//!
//! This module walks a parsed node list against a scope chain and writes
//! the output text, loading partials and invoking lambdas as it goes.

pub mod config;
mod engine;
pub mod escape;
mod lambda;

pub use config::{ConfigError, RenderConfig};
pub use escape::escape_html;

pub(crate) use engine::Renderer;
