//! Data model and name resolution
//!
//! Templates render against a [`Value`]. Sections push values onto a
//! [`ScopeChain`], and tag names are resolved against that chain.

mod scope;
mod value;

pub use scope::ScopeChain;
pub use value::{Lambda, Number, Value};
