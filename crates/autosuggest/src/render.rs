//! Overlay content construction.
//!
//! Each render pass throws away the overlay's children and rebuilds them
//! from the current [`SelectionState`](crate::SelectionState): group headers,
//! one row per item, or the empty-state message. The overlay is then
//! attached, placed and scrolled so the highlighted row is visible.
//!
//! Rows and headers come from caller-supplied callbacks (or the defaults
//! here, which emit a `div` holding the label or group name). Returning
//! `None` from a callback omits that row or header.

use std::rc::Rc;

use autosuggest_core::logging::targets;
use autosuggest_core::{Document, DomEvent, EventKind, EventTarget, ListenerOptions, NodeId};

use crate::dropdown::Shared;
use crate::item::SuggestionItem;

/// Class added to the highlighted row.
pub const SELECTED_CLASS: &str = "selected";

/// Class added to group headers.
pub const GROUP_CLASS: &str = "group";

/// Class of the empty-state message element.
pub const EMPTY_CLASS: &str = "empty";

/// What a render callback knows about the row it is producing.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The input text the items were fetched for.
    pub input_value: &'a str,
    /// Position of the item in the list. For a group header, the position of
    /// the first item under it.
    pub index: usize,
}

/// Builds the element for one item, or `None` to omit it.
pub type RenderFn<T> = Rc<dyn Fn(&dyn Document, &T, &RenderContext<'_>) -> Option<NodeId>>;

/// Builds the header element for a group, or `None` to omit it.
pub type RenderGroupFn = Rc<dyn Fn(&dyn Document, &str, &RenderContext<'_>) -> Option<NodeId>>;

/// Default item renderer: a `div` containing the label, or empty.
pub fn default_render<T: SuggestionItem>(
    document: &dyn Document,
    item: &T,
    _context: &RenderContext<'_>,
) -> Option<NodeId> {
    let row = document.create_element("div");
    document.set_text_content(row, item.label().unwrap_or_default());
    Some(row)
}

/// Default group renderer: a `div` containing the group name.
pub fn default_render_group(
    document: &dyn Document,
    group: &str,
    _context: &RenderContext<'_>,
) -> Option<NodeId> {
    let header = document.create_element("div");
    document.set_text_content(header, group);
    Some(header)
}

/// New scroll offset that brings an element fully into a scrolled viewport,
/// or `None` if it is already visible.
///
/// Scrolls up to the element's top when it starts above the viewport;
/// otherwise scrolls down by the minimal amount to reveal its bottom.
pub fn scroll_into_view(
    scroll_top: f32,
    visible_height: f32,
    element_top: f32,
    element_height: f32,
) -> Option<f32> {
    if element_top < scroll_top {
        return Some(element_top);
    }
    let element_bottom = element_top + element_height;
    let visible_bottom = scroll_top + visible_height;
    (element_bottom > visible_bottom).then(|| scroll_top + (element_bottom - visible_bottom))
}

impl<T: SuggestionItem> Shared<T> {
    /// Rebuild the overlay from the current state and show it.
    pub(crate) fn render(&self) {
        let document = &*self.document;
        let (items, selected, input_value) = {
            let state = self.state.borrow();
            (
                state.items().to_vec(),
                state.selected().cloned(),
                state.input_value().to_string(),
            )
        };

        self.clear_rows();

        // `None` is "no group yet", distinct from every real name including "".
        let mut previous_group: Option<&str> = None;
        let mut scroll_target = None;
        let mut rows = 0usize;
        let mut headers = 0usize;

        for (index, item) in items.iter().enumerate() {
            let context = RenderContext {
                input_value: &input_value,
                index,
            };

            let mut header = None;
            if let Some(group) = item.group() {
                if previous_group != Some(group) {
                    previous_group = Some(group);
                    header = (self.callbacks.render_group)(document, group, &context);
                    if let Some(header) = header {
                        document.add_class(header, GROUP_CLASS);
                        document.append_child(self.container, header);
                        headers += 1;
                    }
                }
            }

            let Some(row) = (self.callbacks.render)(document, item, &context) else {
                continue;
            };
            self.bind_row(row, Rc::clone(item));
            if selected.as_ref().is_some_and(|s| Rc::ptr_eq(s, item)) {
                document.add_class(row, SELECTED_CLASS);
                // The first row of a group brings its header into view too.
                scroll_target = Some((header.unwrap_or(row), row));
            }
            document.append_child(self.container, row);
            rows += 1;
        }

        if items.is_empty() {
            let Some(message) = self.settings.empty_msg.as_deref() else {
                tracing::trace!(target: targets::RENDER, "no items and no empty message, closing");
                self.clear();
                return;
            };
            let empty = document.create_element("div");
            document.set_class_name(empty, EMPTY_CLASS);
            document.set_text_content(empty, message);
            document.append_child(self.container, empty);
        }

        tracing::trace!(target: targets::RENDER, rows, headers, "rendered overlay");

        self.attach();
        self.reposition();
        if let Some((first, row)) = scroll_target {
            self.reveal(first, row);
        }
    }

    /// Attach the click handler that confirms `item`.
    fn bind_row(&self, row: NodeId, item: Rc<T>) {
        let weak = self.weak_self.clone();
        let id = self.document.add_event_listener(
            EventTarget::Node(row),
            EventKind::Click,
            ListenerOptions::default(),
            Rc::new(move |event: &mut DomEvent| {
                if let Some(shared) = weak.upgrade() {
                    shared.confirm(&item);
                }
                event.prevent_default();
                event.stop_propagation();
            }),
        );
        self.binding.borrow_mut().row_listeners.push(id);
    }

    /// Remove and free every overlay child along with the row click handlers.
    pub(crate) fn clear_rows(&self) {
        let listeners = std::mem::take(&mut self.binding.borrow_mut().row_listeners);
        for id in listeners {
            self.document.remove_event_listener(id);
        }
        while let Some(child) = self.document.first_child(self.container) {
            self.document.remove_child(self.container, child);
            self.document.release(child);
        }
    }

    /// Scroll the overlay so everything from `first` down to the bottom of
    /// `row` is visible. If that span is taller than the overlay, only `row`
    /// is revealed.
    fn reveal(&self, first: NodeId, row: NodeId) {
        let document = &*self.document;
        let scroll_top = document.scroll_top(self.container);
        let visible = document.client_height(self.container);
        let row_top = document.offset_top(row);
        let row_bottom = row_top + document.offset_height(row);
        let span_top = document.offset_top(first).min(row_top);
        let top = if row_bottom - span_top > visible {
            row_top
        } else {
            span_top
        };
        let offset = scroll_into_view(scroll_top, visible, top, row_bottom - top);
        if let Some(offset) = offset {
            tracing::trace!(target: targets::RENDER, from = scroll_top, to = offset, "scrolling overlay");
            document.set_scroll_top(self.container, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_not_needed_when_visible() {
        assert_eq!(scroll_into_view(0.0, 100.0, 20.0, 20.0), None);
        assert_eq!(scroll_into_view(40.0, 100.0, 120.0, 20.0), None);
    }

    #[test]
    fn test_scroll_up_to_element_top() {
        assert_eq!(scroll_into_view(60.0, 100.0, 20.0, 20.0), Some(20.0));
    }

    #[test]
    fn test_scroll_down_minimally() {
        // Bottom at 140, visible bottom at 100: scroll by 40.
        assert_eq!(scroll_into_view(0.0, 100.0, 120.0, 20.0), Some(40.0));
        assert_eq!(scroll_into_view(10.0, 50.0, 60.0, 20.0), Some(30.0));
    }
}
