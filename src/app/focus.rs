//! Focus ring over the main page's focusable regions

use crate::messages::FocusTarget;

/// Position in [`FocusTarget::ORDER`]. Transitions are pure: they return a new
/// ring instead of mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusRing {
    index: usize,
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> FocusTarget {
        FocusTarget::ORDER[self.index]
    }

    #[must_use]
    pub fn next(self) -> Self {
        FocusRing {
            index: (self.index + 1) % FocusTarget::ORDER.len(),
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        let len = FocusTarget::ORDER.len();
        FocusRing {
            index: (self.index + len - 1) % len,
        }
    }

    /// Jump straight to `target`; later next/prev continue from there
    #[must_use]
    pub fn focus(self, target: FocusTarget) -> Self {
        let index = FocusTarget::ORDER
            .iter()
            .position(|t| *t == target)
            .unwrap_or(self.index);
        FocusRing { index }
    }
}
