//! Partial template lookup
//!
//! The renderer never decides where partials come from; it asks a
//! [`PartialResolver`]. In-memory maps and the [`PartialRegistry`] are
//! provided here.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

/// Supplies partial template source by name
pub trait PartialResolver {
    /// Return the partial's source, or `None` if there is no such partial
    fn load(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<R: PartialResolver + ?Sized> PartialResolver for &R {
    fn load(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).load(name)
    }
}

impl PartialResolver for HashMap<String, String> {
    fn load(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

impl PartialResolver for BTreeMap<String, String> {
    fn load(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

/// Resolver with no partials at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPartials;

impl PartialResolver for NoPartials {
    fn load(&self, _name: &str) -> Option<Cow<'_, str>> {
        None
    }
}

/// Resolver backed by a closure
pub struct FnPartials<F>(F);

/// Wrap a closure as a [`PartialResolver`]
pub fn from_fn<F>(f: F) -> FnPartials<F>
where
    F: Fn(&str) -> Option<String>,
{
    FnPartials(f)
}

impl<F> PartialResolver for FnPartials<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn load(&self, name: &str) -> Option<Cow<'_, str>> {
        (self.0)(name).map(Cow::Owned)
    }
}

/// Errors that can occur while registering partials
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartialError {
    /// A partial with this name is already registered
    #[error("duplicate partial definition: {name}")]
    Duplicate { name: String },
}

/// Named partial templates held in memory
#[derive(Debug, Clone, Default)]
pub struct PartialRegistry {
    partials: HashMap<String, String>,
}

impl PartialRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a partial, failing if the name is taken
    pub fn register(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), PartialError> {
        let name = name.into();
        if self.partials.contains_key(&name) {
            return Err(PartialError::Duplicate { name });
        }
        self.partials.insert(name, source.into());
        Ok(())
    }

    /// Insert or replace a partial, returning the previous source
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) -> Option<String> {
        self.partials.insert(name.into(), source.into())
    }

    /// Get a partial's source by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.partials.get(name).map(|s| s.as_str())
    }

    /// Check if a partial exists
    pub fn contains(&self, name: &str) -> bool {
        self.partials.contains_key(name)
    }

    /// Get all partial names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.partials.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }
}

impl PartialResolver for PartialRegistry {
    fn load(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PartialRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            partials: iter
                .into_iter()
                .map(|(name, source)| (name.into(), source.into()))
                .collect(),
        }
    }
}
