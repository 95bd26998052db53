//! Scope chain used to resolve tag names during rendering

use std::iter;
use std::rc::Rc;

use super::value::Value;

struct Frame<'a> {
    value: &'a Value,
    parent: Option<Rc<Frame<'a>>>,
}

/// Stack of nested data contexts, searched innermost first
///
/// Pushing returns a new chain sharing the existing frames, so the chain a
/// section was entered with is never modified by what happens inside it.
#[derive(Clone, Default)]
pub struct ScopeChain<'a> {
    head: Option<Rc<Frame<'a>>>,
}

impl<'a> ScopeChain<'a> {
    /// A chain with no frames; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// A chain whose only frame is `root`
    pub fn new(root: &'a Value) -> Self {
        Self::empty().push(root)
    }

    /// Create a chain with `value` as the new innermost frame
    pub fn push(&self, value: &'a Value) -> Self {
        Self {
            head: Some(Rc::new(Frame {
                value,
                parent: self.head.clone(),
            })),
        }
    }

    /// Frame values, innermost first
    pub fn frames(&self) -> impl Iterator<Item = &'a Value> + '_ {
        iter::successors(self.head.as_deref(), |frame| frame.parent.as_deref())
            .map(|frame| frame.value)
    }

    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    /// Resolve a tag name
    ///
    /// `.` is the innermost frame. For a dotted name the first segment picks
    /// the innermost frame that has it; the remaining segments resolve against
    /// that value only, so a miss there is a miss overall.
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        if name == "." {
            return self.head.as_ref().map(|frame| frame.value);
        }

        let mut segments = name.split('.');
        let first = segments.next()?;
        let base = self.frames().find_map(|frame| frame.get(first))?;
        segments.try_fold(base, |value, segment| value.get(segment))
    }
}

impl std::fmt::Debug for ScopeChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.frames()).finish()
    }
}
