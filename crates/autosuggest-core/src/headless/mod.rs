//! An in-memory [`Document`] backend.
//!
//! [`HeadlessDocument`] keeps a node tree, class lists, inline styles,
//! listener registrations and a virtual clock. It performs no real layout:
//! element geometry is whatever the caller sets with
//! [`set_geometry`](HeadlessDocument::set_geometry), and unsized elements
//! stack vertically at a fixed row height inside their parent.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use autosuggest_core::{Document, HeadlessDocument, Key};
//!
//! let doc = HeadlessDocument::new();
//! let input = doc.create_input();
//! doc.focus(input);
//! doc.type_text(input, "ab");
//! assert_eq!(doc.value(input), "ab");
//!
//! doc.advance(Duration::from_millis(250));
//! doc.key_up(input, Key::Escape);
//! ```

mod timer;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::Duration;

use slotmap::SlotMap;

use crate::dom::{Document, Listener, ListenerId, NodeId, TimerCallback, TimerId};
use crate::event::{DomEvent, EventKind, EventTarget, Key, ListenerOptions};
use crate::geometry::{Rect, Viewport};
use crate::logging::targets;

use self::timer::TimerQueue;

/// Height given to elements without explicit geometry.
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    text: String,
    class_name: String,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    value: String,
    selection_start: Option<usize>,
    geometry: Option<Rect>,
    client_height: Option<f32>,
    scroll_top: f32,
}

struct ListenerEntry {
    target: EventTarget,
    kind: EventKind,
    capture: bool,
    sequence: u64,
    listener: Listener,
}

struct Inner {
    nodes: SlotMap<NodeId, NodeData>,
    body: NodeId,
    listeners: SlotMap<ListenerId, ListenerEntry>,
    listener_sequence: u64,
    active: Option<NodeId>,
    viewport: Viewport,
    row_height: f32,
}

impl Inner {
    /// Remove `root` and its descendants along with their listeners.
    /// Returns the number of nodes freed.
    fn free_subtree(&mut self, root: NodeId) -> usize {
        let mut stack = vec![root];
        let mut freed = Vec::new();
        while let Some(node) = stack.pop() {
            if let Some(data) = self.nodes.remove(node) {
                stack.extend(data.children);
                freed.push(node);
            }
        }
        self.listeners
            .retain(|_, l| l.target.node().is_none_or(|n| !freed.contains(&n)));
        if self.active.is_some_and(|a| freed.contains(&a)) {
            self.active = None;
        }
        freed.len()
    }
}

/// Which listeners a dispatch stage invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Capture,
    AtTarget,
    Bubble,
}

/// In-memory document used for tests and non-browser hosts.
pub struct HeadlessDocument {
    inner: RefCell<Inner>,
    timers: RefCell<TimerQueue>,
    mutations: Cell<u64>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// Create an empty document with a `<body>` and a default viewport.
    pub fn new() -> Self {
        Self::with_viewport(Viewport::default())
    }

    /// Create an empty document with the given viewport metrics.
    pub fn with_viewport(viewport: Viewport) -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        });
        Self {
            inner: RefCell::new(Inner {
                nodes,
                body,
                listeners: SlotMap::with_key(),
                listener_sequence: 0,
                active: None,
                viewport,
                row_height: DEFAULT_ROW_HEIGHT,
            }),
            timers: RefCell::new(TimerQueue::new()),
            mutations: Cell::new(0),
        }
    }

    fn touch(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }

    // =========================================================================
    // Setup helpers
    // =========================================================================

    /// Create an `<input>` and append it to the body.
    pub fn create_input(&self) -> NodeId {
        let input = self.create_element("input");
        let body = self.body();
        self.append_child(body, input);
        input
    }

    /// Set an input's value and place the caret at its end.
    pub fn set_value(&self, input: NodeId, value: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(node) = inner.nodes.get_mut(input) {
            node.value = value.to_string();
            node.selection_start = Some(value.chars().count());
        }
    }

    /// Set the caret position of an input.
    pub fn set_selection_start(&self, input: NodeId, position: Option<usize>) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(input) {
            node.selection_start = position;
        }
    }

    /// Fix an element's bounding rectangle (viewport coordinates). Its offset
    /// size and offset top follow from the rectangle.
    pub fn set_geometry(&self, node: NodeId, rect: Rect) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(node) {
            data.geometry = Some(rect);
        }
    }

    /// Fix the visible height of a scrollable element.
    pub fn set_client_height(&self, node: NodeId, height: f32) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(node) {
            data.client_height = Some(height);
        }
    }

    /// Replace the viewport metrics.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.borrow_mut().viewport = viewport;
    }

    /// Change the height of unsized elements.
    pub fn set_row_height(&self, height: f32) {
        self.inner.borrow_mut().row_height = height;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Children of `node`, in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Text of `node` and all its descendants, concatenated.
    pub fn text_content(&self, node: NodeId) -> String {
        let inner = self.inner.borrow();
        let mut out = String::new();
        collect_text(&inner.nodes, node, &mut out);
        out
    }

    /// Tag name of `node`.
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.inner.borrow().nodes.get(node).map(|n| n.tag.clone())
    }

    /// Whether `node` carries `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.class_name(node).split_whitespace().any(|c| c == class)
    }

    /// Inline style value, if set.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .and_then(|n| n.styles.get(property).cloned())
    }

    /// Number of live nodes, attached or not, including the body.
    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Number of registered listeners across all targets.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of listeners registered on `target`.
    pub fn listener_count_on(&self, target: EventTarget) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|l| l.target == target)
            .count()
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().pending_count()
    }

    /// Monotonic count of tree, class, style, text and scroll writes.
    pub fn mutation_count(&self) -> u64 {
        self.mutations.get()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.timers.borrow().now()
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Advance the virtual clock, running every timer that comes due in
    /// deadline order. Timers scheduled by callbacks run too if they fall
    /// inside the window.
    pub fn advance(&self, by: Duration) {
        let deadline = self.now() + by;
        loop {
            let next = self.timers.borrow_mut().pop_due(deadline);
            let Some((_, callback)) = next else { break };
            callback();
        }
        self.timers.borrow_mut().settle(deadline);
    }

    /// Dispatch `event` through capture, target and bubble phases and return
    /// it with its final flags.
    pub fn dispatch(&self, mut event: DomEvent) -> DomEvent {
        tracing::trace!(target: targets::HEADLESS, kind = ?event.kind(), event_target = ?event.target(), "dispatch");

        for (target, phase) in self.propagation_path(&event) {
            for (id, listener) in self.collect_listeners(target, event.kind(), phase) {
                // A listener removed by an earlier one in this dispatch is skipped.
                if !self.inner.borrow().listeners.contains_key(id) {
                    continue;
                }
                listener(&mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event
    }

    fn propagation_path(&self, event: &DomEvent) -> Vec<(EventTarget, Phase)> {
        let bubbles = event.kind().bubbles();
        let mut path = Vec::new();

        match event.target() {
            EventTarget::Window => {
                path.push((EventTarget::Window, Phase::AtTarget));
            }
            EventTarget::Document => {
                path.push((EventTarget::Window, Phase::Capture));
                path.push((EventTarget::Document, Phase::AtTarget));
                if bubbles {
                    path.push((EventTarget::Window, Phase::Bubble));
                }
            }
            EventTarget::Node(node) => {
                let ancestors = self.ancestors(node);
                path.push((EventTarget::Window, Phase::Capture));
                path.push((EventTarget::Document, Phase::Capture));
                for ancestor in ancestors.iter().rev() {
                    path.push((EventTarget::Node(*ancestor), Phase::Capture));
                }
                path.push((EventTarget::Node(node), Phase::AtTarget));
                if bubbles {
                    for ancestor in &ancestors {
                        path.push((EventTarget::Node(*ancestor), Phase::Bubble));
                    }
                    path.push((EventTarget::Document, Phase::Bubble));
                    path.push((EventTarget::Window, Phase::Bubble));
                }
            }
        }
        path
    }

    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let mut out = Vec::new();
        let mut current = inner.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            out.push(id);
            current = inner.nodes.get(id).and_then(|n| n.parent);
        }
        out
    }

    fn collect_listeners(
        &self,
        target: EventTarget,
        kind: EventKind,
        phase: Phase,
    ) -> Vec<(ListenerId, Listener)> {
        let inner = self.inner.borrow();
        let mut matching: Vec<_> = inner
            .listeners
            .iter()
            .filter(|(_, l)| l.target == target && l.kind == kind)
            .filter(|(_, l)| match phase {
                Phase::Capture => l.capture,
                Phase::AtTarget => true,
                Phase::Bubble => !l.capture,
            })
            .map(|(id, l)| (l.sequence, id, l.listener.clone()))
            .collect();
        matching.sort_by_key(|(sequence, _, _)| *sequence);
        matching
            .into_iter()
            .map(|(_, id, listener)| (id, listener))
            .collect()
    }

    /// Dispatch a `keydown` for `key` on `target`.
    pub fn key_down(&self, target: NodeId, key: Key) -> DomEvent {
        self.dispatch(DomEvent::key(EventKind::KeyDown, target, key))
    }

    /// Dispatch a `keyup` for `key` on `target`.
    pub fn key_up(&self, target: NodeId, key: Key) -> DomEvent {
        self.dispatch(DomEvent::key(EventKind::KeyUp, target, key))
    }

    /// Dispatch `keydown` then `keyup` for `key`, returning the `keydown`.
    pub fn press_key(&self, target: NodeId, key: Key) -> DomEvent {
        let down = self.key_down(target, key);
        self.key_up(target, key);
        down
    }

    /// Type `text` into an input one character at a time: each character is
    /// appended to the value between its `keydown` and `keyup`.
    pub fn type_text(&self, input: NodeId, text: &str) {
        for c in text.chars() {
            self.key_down(input, Key::Character(c));
            let mut value = self.value(input);
            value.push(c);
            self.set_value(input, &value);
            self.key_up(input, Key::Character(c));
        }
    }

    /// Remove the last character of an input's value, as Backspace would.
    pub fn backspace(&self, input: NodeId) {
        self.key_down(input, Key::Backspace);
        let mut value = self.value(input);
        value.pop();
        self.set_value(input, &value);
        self.key_up(input, Key::Backspace);
    }

    /// Dispatch a click on `node`.
    pub fn click(&self, node: NodeId) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::Click, node))
    }

    /// Dispatch a mouse-down on `node`.
    pub fn mouse_down(&self, node: NodeId) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::MouseDown, node))
    }

    /// Dispatch a scroll event on `target`.
    pub fn scroll(&self, target: EventTarget) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::Scroll, target))
    }

    /// Resize the window and dispatch `resize`.
    pub fn resize(&self, inner_width: f32, inner_height: f32) -> DomEvent {
        {
            let mut inner = self.inner.borrow_mut();
            inner.viewport.inner_width = inner_width;
            inner.viewport.inner_height = inner_height;
        }
        self.dispatch(DomEvent::new(EventKind::Resize, EventTarget::Window))
    }

    /// Remove focus from the active element, dispatching `blur` on it.
    pub fn blur(&self) {
        let previous = self.inner.borrow_mut().active.take();
        if let Some(previous) = previous {
            self.dispatch(DomEvent::new(EventKind::Blur, previous));
        }
    }

    fn content_height(&self, node: NodeId) -> f32 {
        self.children(node)
            .into_iter()
            .map(|child| self.offset_height(child))
            .sum()
    }
}

fn collect_text(nodes: &SlotMap<NodeId, NodeData>, node: NodeId, out: &mut String) {
    if let Some(data) = nodes.get(node) {
        out.push_str(&data.text);
        for child in &data.children {
            collect_text(nodes, *child, out);
        }
    }
}

fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

impl Document for HeadlessDocument {
    fn create_element(&self, tag: &str) -> NodeId {
        self.touch();
        self.inner.borrow_mut().nodes.insert(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        })
    }

    fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes.get(node).and_then(|n| n.parent)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .and_then(|n| n.children.first().copied())
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(parent) || !inner.nodes.contains_key(child) {
            return;
        }
        let old_parent = inner.nodes[child].parent;
        if let Some(old_parent) = old_parent {
            inner.nodes[old_parent].children.retain(|c| *c != child);
        }
        inner.nodes[child].parent = Some(parent);
        inner.nodes[parent].children.push(child);
        drop(inner);
        self.touch();
    }

    fn remove_child(&self, parent: NodeId, child: NodeId) {
        let mut inner = self.inner.borrow_mut();
        let is_child = inner.nodes.get(child).and_then(|n| n.parent) == Some(parent);
        if !is_child {
            return;
        }
        inner.nodes[parent].children.retain(|c| *c != child);
        inner.nodes[child].parent = None;
        drop(inner);
        self.touch();
    }

    fn release(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if node == inner.body || inner.nodes.get(node).is_none_or(|n| n.parent.is_some()) {
            return;
        }
        let freed = inner.free_subtree(node);
        drop(inner);
        tracing::trace!(target: targets::HEADLESS, freed, "released subtree");
        self.touch();
    }

    fn set_text_content(&self, node: NodeId, text: &str) {
        let mut inner = self.inner.borrow_mut();
        let Some(data) = inner.nodes.get_mut(node) else {
            return;
        };
        data.text = text.to_string();
        let children = std::mem::take(&mut data.children);
        for child in children {
            if let Some(c) = inner.nodes.get_mut(child) {
                c.parent = None;
            }
            inner.free_subtree(child);
        }
        drop(inner);
        self.touch();
    }

    fn class_name(&self, node: NodeId) -> String {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .map(|n| n.class_name.clone())
            .unwrap_or_default()
    }

    fn set_class_name(&self, node: NodeId, class_name: &str) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(node) {
            data.class_name = class_name.trim().to_string();
        }
        self.touch();
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(node) {
            if value.is_empty() {
                data.styles.remove(property);
            } else {
                data.styles.insert(property.to_string(), value.to_string());
            }
        }
        self.touch();
    }

    fn bounding_client_rect(&self, node: NodeId) -> Rect {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .and_then(|n| n.geometry)
            .unwrap_or(Rect::ZERO)
    }

    fn offset_width(&self, node: NodeId) -> f32 {
        self.bounding_client_rect(node).width()
    }

    fn offset_height(&self, node: NodeId) -> f32 {
        let inner = self.inner.borrow();
        match inner.nodes.get(node) {
            Some(data) => data.geometry.map_or(inner.row_height, |g| g.height()),
            None => 0.0,
        }
    }

    fn offset_top(&self, node: NodeId) -> f32 {
        let (geometry, parent) = {
            let inner = self.inner.borrow();
            match inner.nodes.get(node) {
                Some(data) => (data.geometry, data.parent),
                None => return 0.0,
            }
        };
        if let Some(geometry) = geometry {
            return geometry.top();
        }
        let Some(parent) = parent else {
            return 0.0;
        };
        self.children(parent)
            .into_iter()
            .take_while(|sibling| *sibling != node)
            .map(|sibling| self.offset_height(sibling))
            .sum()
    }

    fn client_height(&self, node: NodeId) -> f32 {
        let (explicit, max_height) = {
            let inner = self.inner.borrow();
            match inner.nodes.get(node) {
                Some(data) => (
                    data.client_height,
                    data.styles.get("max-height").and_then(|v| parse_px(v)),
                ),
                None => return 0.0,
            }
        };
        if let Some(height) = explicit {
            return height;
        }
        let content = self.content_height(node);
        max_height.map_or(content, |max| content.min(max))
    }

    fn scroll_top(&self, node: NodeId) -> f32 {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .map_or(0.0, |n| n.scroll_top)
    }

    fn set_scroll_top(&self, node: NodeId, value: f32) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(node) {
            data.scroll_top = value.max(0.0);
        }
        self.touch();
    }

    fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    fn value(&self, input: NodeId) -> String {
        self.inner
            .borrow()
            .nodes
            .get(input)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    fn selection_start(&self, input: NodeId) -> Option<usize> {
        self.inner
            .borrow()
            .nodes
            .get(input)
            .and_then(|n| n.selection_start)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.inner.borrow().active
    }

    fn focus(&self, node: NodeId) {
        if self.active_element() == Some(node) || !self.contains(node) {
            return;
        }
        self.blur();
        self.inner.borrow_mut().active = Some(node);
        self.dispatch(DomEvent::new(EventKind::Focus, node));
    }

    fn add_event_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenerOptions,
        listener: Listener,
    ) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.listener_sequence += 1;
        let sequence = inner.listener_sequence;
        inner.listeners.insert(ListenerEntry {
            target,
            kind,
            capture: options.capture,
            sequence,
            listener,
        })
    }

    fn remove_event_listener(&self, id: ListenerId) {
        self.inner.borrow_mut().listeners.remove(id);
    }

    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        self.timers.borrow_mut().schedule(delay, callback)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().cancel(id);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn record(
        doc: &HeadlessDocument,
        log: &Rc<RefCell<Vec<&'static str>>>,
        target: EventTarget,
        options: ListenerOptions,
        name: &'static str,
    ) -> ListenerId {
        let log = Rc::clone(log);
        doc.add_event_listener(
            target,
            EventKind::Click,
            options,
            Rc::new(move |_: &mut DomEvent| log.borrow_mut().push(name)),
        )
    }

    #[test]
    fn test_tree_edits() {
        let doc = HeadlessDocument::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("span");

        doc.append_child(doc.body(), parent);
        doc.append_child(parent, child);
        assert_eq!(doc.parent(child), Some(parent));
        assert_eq!(doc.first_child(parent), Some(child));

        doc.remove_child(parent, child);
        assert_eq!(doc.parent(child), None);
        assert!(doc.children(parent).is_empty());
    }

    #[test]
    fn test_text_content_replaces_children() {
        let doc = HeadlessDocument::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(parent, child);
        doc.set_text_content(child, "inner");
        assert_eq!(doc.text_content(parent), "inner");

        doc.set_text_content(parent, "outer");
        assert_eq!(doc.text_content(parent), "outer");
        assert_eq!(doc.parent(child), None);
        // Replaced children are freed.
        assert!(!doc.contains(child));
    }

    #[test]
    fn test_release_frees_detached_subtree() {
        let doc = HeadlessDocument::new();
        let list = doc.create_element("div");
        let row = doc.create_element("div");
        let label = doc.create_element("span");
        doc.append_child(list, row);
        doc.append_child(row, label);
        doc.add_event_listener(
            EventTarget::Node(row),
            EventKind::Click,
            ListenerOptions::default(),
            Rc::new(|_: &mut DomEvent| {}),
        );
        assert_eq!(doc.node_count(), 4);

        doc.release(list);

        assert_eq!(doc.node_count(), 1);
        assert!(!doc.contains(row));
        assert!(!doc.contains(label));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_release_ignores_attached_node() {
        let doc = HeadlessDocument::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node);

        doc.release(node);
        assert!(doc.contains(node));

        doc.remove_child(doc.body(), node);
        doc.release(node);
        assert!(!doc.contains(node));

        doc.release(doc.body());
        assert!(doc.contains(doc.body()));
    }

    #[test]
    fn test_rebuilding_children_keeps_node_count_bounded() {
        let doc = HeadlessDocument::new();
        let list = doc.create_element("div");
        doc.append_child(doc.body(), list);

        for _ in 0..1000 {
            while let Some(child) = doc.first_child(list) {
                doc.remove_child(list, child);
                doc.release(child);
            }
            for _ in 0..3 {
                let row = doc.create_element("div");
                doc.append_child(list, row);
            }
        }

        // Body, list and the three current rows.
        assert_eq!(doc.node_count(), 5);
    }

    #[test]
    fn test_row_height_drives_unsized_layout() {
        let doc = HeadlessDocument::new();
        let list = doc.create_element("div");
        let first = doc.create_element("div");
        let second = doc.create_element("div");
        doc.append_child(list, first);
        doc.append_child(list, second);
        assert_eq!(doc.offset_top(second), DEFAULT_ROW_HEIGHT);

        doc.set_row_height(32.0);
        assert_eq!(doc.offset_height(first), 32.0);
        assert_eq!(doc.offset_top(second), 32.0);
        assert_eq!(doc.client_height(list), 64.0);
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let doc = HeadlessDocument::new();
        let node = doc.create_element("div");
        doc.add_class(node, "selected");
        doc.add_class(node, "selected");
        doc.add_class(node, "group");
        assert_eq!(doc.class_name(node), "selected group");
    }

    #[test]
    fn test_dispatch_order_and_stop_propagation() {
        let doc = HeadlessDocument::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, inner);

        let log = Rc::new(RefCell::new(Vec::new()));
        record(&doc, &log, EventTarget::Document, ListenerOptions::CAPTURE, "document-capture");
        record(&doc, &log, EventTarget::Node(outer), ListenerOptions::default(), "outer-bubble");
        record(&doc, &log, EventTarget::Node(inner), ListenerOptions::default(), "inner");
        record(&doc, &log, EventTarget::Window, ListenerOptions::default(), "window-bubble");

        doc.click(inner);
        assert_eq!(
            *log.borrow(),
            vec!["document-capture", "inner", "outer-bubble", "window-bubble"]
        );

        log.borrow_mut().clear();
        doc.add_event_listener(
            EventTarget::Node(inner),
            EventKind::Click,
            ListenerOptions::default(),
            Rc::new(|event: &mut DomEvent| event.stop_propagation()),
        );
        let event = doc.click(inner);
        assert!(event.is_propagation_stopped());
        assert_eq!(*log.borrow(), vec!["document-capture", "inner"]);
    }

    #[test]
    fn test_removed_listener_is_not_invoked() {
        let doc = HeadlessDocument::new();
        let node = doc.create_element("div");
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = record(&doc, &log, EventTarget::Node(node), ListenerOptions::default(), "removed");
        doc.remove_event_listener(id);

        doc.click(node);
        assert!(log.borrow().is_empty());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_focus_dispatches_blur_then_focus() {
        let doc = HeadlessDocument::new();
        let a = doc.create_input();
        let b = doc.create_input();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (node, kind, name) in [
            (a, EventKind::Blur, "a-blur"),
            (b, EventKind::Focus, "b-focus"),
        ] {
            let log = Rc::clone(&log);
            doc.add_event_listener(
                EventTarget::Node(node),
                kind,
                ListenerOptions::default(),
                Rc::new(move |_: &mut DomEvent| log.borrow_mut().push(name)),
            );
        }

        doc.focus(a);
        doc.focus(b);
        assert_eq!(*log.borrow(), vec!["a-blur", "b-focus"]);
        assert_eq!(doc.active_element(), Some(b));
    }

    #[test]
    fn test_stacked_layout_and_client_height() {
        let doc = HeadlessDocument::new();
        let list = doc.create_element("div");
        let rows: Vec<_> = (0..5).map(|_| doc.create_element("div")).collect();
        for row in &rows {
            doc.append_child(list, *row);
        }

        assert_eq!(doc.offset_top(rows[0]), 0.0);
        assert_eq!(doc.offset_top(rows[3]), 60.0);
        assert_eq!(doc.client_height(list), 100.0);

        doc.set_style(list, "max-height", "50px");
        assert_eq!(doc.client_height(list), 50.0);

        doc.set_client_height(list, 30.0);
        assert_eq!(doc.client_height(list), 30.0);
    }

    #[test]
    fn test_advance_runs_due_timers() {
        let doc = HeadlessDocument::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        doc.set_timeout(Duration::from_millis(100), Box::new(move || counter.set(counter.get() + 1)));

        doc.advance(Duration::from_millis(99));
        assert_eq!(fired.get(), 0);
        doc.advance(Duration::from_millis(1));
        assert_eq!(fired.get(), 1);
        assert_eq!(doc.pending_timers(), 0);
        assert_eq!(doc.now(), Duration::from_millis(100));
    }

    #[test]
    fn test_mutation_counter_ignores_reads() {
        let doc = HeadlessDocument::new();
        let node = doc.create_element("div");
        let before = doc.mutation_count();

        let _ = doc.class_name(node);
        let _ = doc.offset_height(node);
        let _ = doc.children(node);
        assert_eq!(doc.mutation_count(), before);

        doc.set_style(node, "top", "4px");
        assert_eq!(doc.mutation_count(), before + 1);
    }
}
