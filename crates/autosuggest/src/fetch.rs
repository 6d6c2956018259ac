//! Fetch requests and the latest-wins update handle.
//!
//! Every qualifying keystroke or focus starts a new request generation
//! ([`Epoch`]). The caller's fetch function receives a [`FetchRequest`] and an
//! [`Update`] bound to that generation. The update may be applied any number
//! of times, from any later point on the UI thread; only an application whose
//! epoch is still the current one changes what the widget shows.
//!
//! ```ignore
//! builder.fetch(|request, update| {
//!     let matches = lookup(&request.text);
//!     // Synchronous is fine; so is stashing `update` and calling it later.
//!     update.items(matches);
//! });
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use crate::dropdown::Shared;
use crate::item::SuggestionItem;

/// Request generation counter.
///
/// Strictly increases over the life of a dropdown. Clearing the list also
/// advances it, so responses to requests issued before a clear are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch before any request.
    pub const ZERO: Self = Self(0);

    /// The following epoch.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What caused a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchTrigger {
    /// A key was released in the input.
    Keyboard,
    /// The input gained focus with `show_on_focus` enabled.
    Focus,
    /// The embedding application called [`Dropdown::fetch`](crate::Dropdown::fetch).
    Manual,
}

impl FetchTrigger {
    /// Whether this fetch was caused by focus. Focus fetches bypass the
    /// minimum length.
    pub fn is_focus(self) -> bool {
        matches!(self, Self::Focus)
    }
}

/// The input snapshot a fetch is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Input text at the time of the request.
    pub text: String,
    /// What caused the request.
    pub trigger: FetchTrigger,
    /// Caret position in characters.
    pub cursor_pos: usize,
}

impl FetchRequest {
    /// Whether this request was caused by focus.
    pub fn is_focus_triggered(&self) -> bool {
        self.trigger.is_focus()
    }
}

/// Delivers a fetch response back to the dropdown that issued it.
///
/// Cloning is cheap. The handle holds the dropdown weakly, so a stashed
/// update never keeps a destroyed widget alive.
pub struct Update<T: SuggestionItem> {
    epoch: Epoch,
    text: Rc<str>,
    target: Weak<Shared<T>>,
}

impl<T: SuggestionItem> Update<T> {
    pub(crate) fn new(epoch: Epoch, text: Rc<str>, target: Weak<Shared<T>>) -> Self {
        Self {
            epoch,
            text,
            target,
        }
    }

    /// The request generation this handle belongs to.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Whether a newer request, a clear or destroy has superseded this one.
    ///
    /// Fetch functions may check this to skip work whose result would be
    /// dropped anyway.
    pub fn is_stale(&self) -> bool {
        self.target
            .upgrade()
            .is_none_or(|shared| !shared.accepts(self.epoch))
    }

    /// Deliver a response. `None` means "ignore this response" and leaves
    /// the widget untouched; `Some(items)` replaces the list if this request
    /// is still current.
    pub fn apply(&self, response: Option<Vec<T>>) {
        if let Some(shared) = self.target.upgrade() {
            shared.apply_response(self.epoch, &self.text, response);
        }
    }

    /// Deliver a list of items. Shorthand for `apply(Some(items))`.
    pub fn items(&self, items: Vec<T>) {
        self.apply(Some(items));
    }
}

impl<T: SuggestionItem> Clone for Update<T> {
    fn clone(&self) -> Self {
        Self {
            epoch: self.epoch,
            text: Rc::clone(&self.text),
            target: Weak::clone(&self.target),
        }
    }
}

impl<T: SuggestionItem> fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update")
            .field("epoch", &self.epoch)
            .field("text", &self.text)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_is_monotonic() {
        let first = Epoch::ZERO.next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.get(), 2);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn test_only_focus_bypasses_min_length() {
        assert!(FetchTrigger::Focus.is_focus());
        assert!(!FetchTrigger::Keyboard.is_focus());
        assert!(!FetchTrigger::Manual.is_focus());
    }

    #[test]
    fn test_detached_update_is_stale() {
        let update: Update<String> = Update::new(Epoch::ZERO.next(), Rc::from("ab"), Weak::new());
        assert!(update.is_stale());
        // Applying to a dropped dropdown is a no-op.
        update.items(vec!["abc".to_string()]);
    }
}
