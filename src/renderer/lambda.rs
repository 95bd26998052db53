//! Invoking lambdas found in the data
//!
//! A variable lambda's result is rendered with the default delimiters and
//! then interpolated like any other text. A section lambda's result is
//! rendered with the delimiters that were active at the section's opening
//! tag. A section lambda that takes a render callback writes its result
//! verbatim; the callback swallows render errors and yields empty text.

use std::fmt::Write;

use log::debug;

use crate::context::{Lambda, ScopeChain, Value};
use crate::parser::{Delimiters, Section};
use crate::partials::PartialResolver;
use crate::RenderError;

use super::engine::Renderer;

impl<P: PartialResolver + ?Sized> Renderer<'_, P> {
    pub(super) fn call_variable_lambda(
        &self,
        name: &str,
        f: &(dyn Fn() -> String + Send + Sync),
        chain: &ScopeChain<'_>,
    ) -> Result<String, RenderError> {
        debug!("invoking variable lambda '{}'", name);
        let source = f();
        let mut rendered = String::with_capacity(source.len());
        self.render_source(&source, &Delimiters::default(), chain, &mut rendered)
            .map_err(|err| err.within_lambda(name))?;
        Ok(rendered)
    }

    /// Render `section` through a section lambda if `value` is one
    ///
    /// Returns `false` when `value` is not a section lambda and the section
    /// should be rendered normally.
    pub(super) fn call_section_lambda<W: Write + ?Sized>(
        &self,
        section: &Section,
        value: &Value,
        chain: &ScopeChain<'_>,
        out: &mut W,
    ) -> Result<bool, RenderError> {
        let Value::Lambda(lambda) = value else {
            return Ok(false);
        };

        match lambda {
            Lambda::Section(f) => {
                debug!("invoking section lambda '{}'", section.name);
                let source = f(section.raw.as_str());
                self.render_source(&source, &section.delimiters, chain, out)
                    .map_err(|err| err.within_lambda(&section.name))?;
            }
            Lambda::SectionWithRender(f) => {
                debug!("invoking section lambda '{}' with render", section.name);
                let render = |text: &str| self.render_callback(text, &section.delimiters, chain);
                out.write_str(&f(section.raw.as_str(), &render))?;
            }
            Lambda::Variable(_) => return Ok(false),
        }
        Ok(true)
    }

    fn render_callback(
        &self,
        text: &str,
        delimiters: &Delimiters,
        chain: &ScopeChain<'_>,
    ) -> String {
        let mut rendered = String::new();
        match self.render_source(text, delimiters, chain, &mut rendered) {
            Ok(()) => rendered,
            Err(err) => {
                debug!("render callback failed, yielding empty text: {}", err);
                String::new()
            }
        }
    }
}
