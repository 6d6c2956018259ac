//! Suggestion list and selection state.
//!
//! [`SelectionState`] is the widget's whole mutable model: the displayed
//! items, the text they were fetched for, the highlighted item and the
//! request epoch. Every transition here is pure; the dropdown renders after
//! calling them.

use std::rc::Rc;

use autosuggest_core::logging::targets;

use crate::fetch::Epoch;

/// Items, selection and request generation for one dropdown.
///
/// The selection, when present, is always one of `items` (by identity).
#[derive(Debug)]
pub struct SelectionState<T> {
    items: Vec<Rc<T>>,
    input_value: String,
    selected: Option<Rc<T>>,
    epoch: Epoch,
}

impl<T> Default for SelectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            input_value: String::new(),
            selected: None,
            epoch: Epoch::ZERO,
        }
    }
}

impl<T> SelectionState<T> {
    /// Create an empty state at epoch zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The displayed items, in order.
    pub fn items(&self) -> &[Rc<T>] {
        &self.items
    }

    /// The input text the current items were fetched for.
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// The highlighted item.
    pub fn selected(&self) -> Option<&Rc<T>> {
        self.selected.as_ref()
    }

    /// The current request generation.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Whether `item` is the highlighted item (by identity).
    pub fn is_selected(&self, item: &Rc<T>) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|selected| Rc::ptr_eq(selected, item))
    }

    /// Index of the highlighted item in `items`.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.items.iter().position(|item| Rc::ptr_eq(item, selected))
    }

    /// Start a new request generation and return it.
    pub fn begin_request(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.epoch
    }

    /// Whether a response for `epoch` would still be applied.
    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.epoch == epoch
    }

    /// Drop all items and the selection, invalidating in-flight requests.
    pub fn clear(&mut self) {
        self.epoch = self.epoch.next();
        self.items.clear();
        self.input_value.clear();
        self.selected = None;
    }

    /// Adopt a fetch response if `epoch` is still current.
    ///
    /// Selects the first item when `auto_select` is set and the list is
    /// non-empty. Returns `false`, leaving the state untouched, for a stale
    /// epoch.
    pub fn adopt(
        &mut self,
        epoch: Epoch,
        items: Vec<Rc<T>>,
        input_value: &str,
        auto_select: bool,
    ) -> bool {
        if !self.is_current(epoch) {
            tracing::debug!(
                target: targets::FETCH,
                %epoch,
                current = %self.epoch,
                "dropping stale response"
            );
            return false;
        }

        self.selected = if auto_select {
            items.first().cloned()
        } else {
            None
        };
        self.items = items;
        self.input_value = input_value.to_string();
        true
    }

    /// Highlight the item after the current one, wrapping to the first.
    /// With nothing selected, highlights the first item.
    pub fn select_next(&mut self) {
        let next = match self.selected_index() {
            Some(index) if index + 1 < self.items.len() => index + 1,
            _ => 0,
        };
        self.selected = self.items.get(next).cloned();
        tracing::trace!(target: targets::SELECTION, index = ?self.selected_index(), "select next");
    }

    /// Highlight the item before the current one, wrapping to the last.
    /// With nothing selected, highlights the last item.
    pub fn select_prev(&mut self) {
        self.selected = match self.selected_index() {
            Some(index) if index > 0 => self.items.get(index - 1).cloned(),
            _ => self.items.last().cloned(),
        };
        tracing::trace!(target: targets::SELECTION, index = ?self.selected_index(), "select prev");
    }
}
