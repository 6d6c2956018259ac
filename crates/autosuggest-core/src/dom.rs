//! The document seam.
//!
//! [`Document`] is everything the widget needs from its host environment:
//! element creation and tree edits, class and style writes, geometry reads,
//! listener registration and one-shot timers. A browser backend maps
//! [`NodeId`]s onto real elements; [`HeadlessDocument`](crate::HeadlessDocument)
//! keeps an in-memory tree for tests and server-side use.
//!
//! All methods take `&self`. Backends use interior mutability and must not
//! hold internal borrows while invoking listeners or timer callbacks, since
//! those re-enter the document.

use std::rc::Rc;
use std::time::Duration;

use slotmap::new_key_type;

use crate::event::{DomEvent, EventKind, EventTarget, ListenerOptions};
use crate::geometry::{Rect, Viewport};

new_key_type! {
    /// Handle to an element owned by a [`Document`].
    pub struct NodeId;

    /// Handle to a registered event listener.
    ///
    /// Pass it to [`Document::remove_event_listener`] to unregister.
    pub struct ListenerId;

    /// Handle to a pending one-shot timer.
    pub struct TimerId;
}

/// A registered event callback.
pub type Listener = Rc<dyn Fn(&mut DomEvent)>;

/// A deferred callback run once by [`Document::set_timeout`].
pub type TimerCallback = Box<dyn FnOnce()>;

/// Host document operations used by the widget.
pub trait Document {
    // =========================================================================
    // Tree
    // =========================================================================

    /// Create a detached element with the given tag name.
    fn create_element(&self, tag: &str) -> NodeId;

    /// The `<body>` element.
    fn body(&self) -> NodeId;

    /// Whether `node` belongs to this document (attached or not).
    fn contains(&self, node: NodeId) -> bool;

    /// The parent of `node`, if it is attached to one.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// The first child of `node`.
    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Remove `child` from `parent`. No-op if `child` is not a child of
    /// `parent`.
    fn remove_child(&self, parent: NodeId, child: NodeId);

    /// Free a detached `node` and its descendants. Their ids, and any
    /// listeners registered on them, become invalid. No-op for the body and
    /// for attached nodes.
    fn release(&self, node: NodeId);

    /// Replace all children of `node` with a single text run.
    fn set_text_content(&self, node: NodeId, text: &str);

    /// The space-separated class list of `node`.
    fn class_name(&self, node: NodeId) -> String;

    /// Overwrite the class list of `node`.
    fn set_class_name(&self, node: NodeId, class_name: &str);

    /// Append `class` to the class list of `node`.
    fn add_class(&self, node: NodeId, class: &str) {
        let mut classes = self.class_name(node);
        if !classes.split_whitespace().any(|c| c == class) {
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(class);
            self.set_class_name(node, &classes);
        }
    }

    /// Set an inline style property. An empty value removes it.
    fn set_style(&self, node: NodeId, property: &str, value: &str);

    // =========================================================================
    // Geometry
    // =========================================================================

    /// `getBoundingClientRect()` in viewport coordinates.
    fn bounding_client_rect(&self, node: NodeId) -> Rect;

    /// `offsetWidth`.
    fn offset_width(&self, node: NodeId) -> f32;

    /// `offsetHeight`.
    fn offset_height(&self, node: NodeId) -> f32;

    /// `offsetTop`, relative to the offset parent.
    fn offset_top(&self, node: NodeId) -> f32;

    /// `clientHeight`: the visible height of a scrollable element.
    fn client_height(&self, node: NodeId) -> f32;

    /// `scrollTop`.
    fn scroll_top(&self, node: NodeId) -> f32;

    /// Set `scrollTop`.
    fn set_scroll_top(&self, node: NodeId, value: f32);

    /// Window and root-element metrics.
    fn viewport(&self) -> Viewport;

    // =========================================================================
    // Input state
    // =========================================================================

    /// Current text value of an editable element.
    fn value(&self, input: NodeId) -> String;

    /// Caret position (in characters) of an editable element.
    fn selection_start(&self, input: NodeId) -> Option<usize>;

    /// The element that currently has focus.
    fn active_element(&self) -> Option<NodeId>;

    /// Move focus to `node`. Backends dispatch blur/focus events.
    fn focus(&self, node: NodeId);

    // =========================================================================
    // Events and timers
    // =========================================================================

    /// Register `listener` for `kind` events on `target`.
    fn add_event_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenerOptions,
        listener: Listener,
    ) -> ListenerId;

    /// Unregister a listener. Unknown ids are ignored.
    fn remove_event_listener(&self, id: ListenerId);

    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Unknown or fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}
