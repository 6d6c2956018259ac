//! The dropdown controller.
//!
//! A [`Dropdown`] binds to one text input. It listens for keys, focus, blur,
//! window resize and page scroll, asks the caller's fetch function for items,
//! and keeps an overlay under the input showing them.
//!
//! # States
//!
//! - **Idle**: no items, overlay detached.
//! - **Open**: items (or the empty message) shown, overlay attached.
//! - **Destroyed**: every listener removed, overlay detached, callbacks never
//!   invoked again. Terminal.
//!
//! # Reentrancy
//!
//! The controller's state lives behind `RefCell`s, and no borrow is held
//! while a caller-supplied callback runs. A fetch function may apply its
//! update synchronously, and `on_select` may destroy the dropdown.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use autosuggest_core::logging::targets;
use autosuggest_core::{
    Document, DomEvent, EventKind, EventTarget, Key, ListenerId, ListenerOptions, NodeId, TimerId,
};

use crate::error::{Error, Result};
use crate::fetch::{Epoch, FetchRequest, FetchTrigger, Update};
use crate::item::SuggestionItem;
use crate::position::{self, CustomizeContext};
use crate::render::{self, RenderContext, RenderFn, RenderGroupFn};
use crate::selection::SelectionState;
use crate::settings::DropdownSettings;

/// Produces items for a request and delivers them through the [`Update`].
pub type FetchFn<T> = Rc<dyn Fn(FetchRequest, Update<T>)>;

/// Called with the confirmed item and the bound input.
pub type SelectFn<T> = Rc<dyn Fn(&T, NodeId)>;

/// Called after every placement to adjust the overlay further.
pub type CustomizeFn = Rc<dyn Fn(&dyn Document, &CustomizeContext)>;

pub(crate) struct Callbacks<T: SuggestionItem> {
    pub(crate) fetch: FetchFn<T>,
    pub(crate) on_select: SelectFn<T>,
    pub(crate) render: RenderFn<T>,
    pub(crate) render_group: RenderGroupFn,
    pub(crate) customize: Option<CustomizeFn>,
}

/// Registrations owned by a live dropdown.
#[derive(Default)]
pub(crate) struct Binding {
    pub(crate) listeners: Vec<ListenerId>,
    pub(crate) row_listeners: Vec<ListenerId>,
    pub(crate) debounce: Option<TimerId>,
}

/// State shared between the handle, listeners, timers and updates.
pub(crate) struct Shared<T: SuggestionItem> {
    pub(crate) document: Rc<dyn Document>,
    pub(crate) input: NodeId,
    pub(crate) container: NodeId,
    pub(crate) settings: DropdownSettings,
    pub(crate) callbacks: Callbacks<T>,
    pub(crate) state: RefCell<SelectionState<T>>,
    pub(crate) binding: RefCell<Binding>,
    pub(crate) destroyed: Cell<bool>,
    pub(crate) weak_self: Weak<Shared<T>>,
}

impl<T: SuggestionItem> Shared<T> {
    fn bind(&self) {
        let input = EventTarget::Node(self.input);
        let container = EventTarget::Node(self.container);
        let bubble = ListenerOptions::default();

        let listeners = vec![
            self.listen(input, EventKind::KeyDown, bubble, Self::on_key_down),
            self.listen(input, EventKind::KeyUp, bubble, Self::on_key_up),
            self.listen(input, EventKind::Focus, bubble, Self::on_focus),
            self.listen(input, EventKind::Blur, bubble, Self::on_blur),
            self.listen(EventTarget::Window, EventKind::Resize, bubble, Self::on_resize),
            self.listen(
                EventTarget::Document,
                EventKind::Scroll,
                ListenerOptions::CAPTURE,
                Self::on_scroll,
            ),
            self.listen(container, EventKind::MouseDown, bubble, Self::on_overlay_mouse_down),
            self.listen(container, EventKind::Focus, bubble, Self::on_overlay_focus),
        ];
        self.binding.borrow_mut().listeners = listeners;
    }

    fn listen(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenerOptions,
        handler: fn(&Self, &mut DomEvent),
    ) -> ListenerId {
        let weak = self.weak_self.clone();
        self.document.add_event_listener(
            target,
            kind,
            options,
            Rc::new(move |event: &mut DomEvent| {
                if let Some(shared) = weak.upgrade() {
                    handler(&shared, event);
                }
            }),
        )
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.document.parent(self.container).is_some()
    }

    /// Whether a response for `epoch` would be applied.
    pub(crate) fn accepts(&self, epoch: Epoch) -> bool {
        !self.is_destroyed() && self.state.borrow().is_current(epoch)
    }

    /// Apply a fetch response for `epoch`, issued for `text`.
    pub(crate) fn apply_response(&self, epoch: Epoch, text: &str, response: Option<Vec<T>>) {
        if self.is_destroyed() {
            tracing::trace!(target: targets::FETCH, %epoch, "response after destroy ignored");
            return;
        }
        let Some(items) = response else {
            tracing::trace!(target: targets::FETCH, %epoch, "empty response ignored");
            return;
        };

        let count = items.len();
        let items = items.into_iter().map(Rc::new).collect();
        let auto_select = !self.settings.disable_auto_select;
        let adopted = self
            .state
            .borrow_mut()
            .adopt(epoch, items, text, auto_select);
        if adopted {
            tracing::debug!(target: targets::FETCH, %epoch, count, "response applied");
            self.render();
        }
    }

    /// Begin a request generation and fetch for the current input text.
    pub(crate) fn start_fetch(&self, trigger: FetchTrigger) {
        self.cancel_debounce();
        let epoch = self.state.borrow_mut().begin_request();

        let text = self.document.value(self.input);
        if !trigger.is_focus() && text.chars().count() < self.settings.min_length {
            tracing::trace!(
                target: targets::FETCH,
                len = text.chars().count(),
                min_length = self.settings.min_length,
                "input too short"
            );
            self.clear();
            return;
        }

        let cursor_pos = self.document.selection_start(self.input).unwrap_or(0);
        let update = Update::new(epoch, Rc::from(text.as_str()), self.weak_self.clone());
        let request = FetchRequest {
            text,
            trigger,
            cursor_pos,
        };

        let debounce = self.settings.debounce;
        if trigger == FetchTrigger::Keyboard && !debounce.is_zero() {
            let weak = self.weak_self.clone();
            let id = self.document.set_timeout(
                debounce,
                Box::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.binding.borrow_mut().debounce = None;
                        shared.invoke_fetch(request, update);
                    }
                }),
            );
            self.binding.borrow_mut().debounce = Some(id);
            tracing::trace!(target: targets::FETCH, %epoch, ?debounce, "fetch debounced");
        } else {
            self.invoke_fetch(request, update);
        }
    }

    fn invoke_fetch(&self, request: FetchRequest, update: Update<T>) {
        tracing::debug!(
            target: targets::FETCH,
            epoch = %update.epoch(),
            trigger = ?request.trigger,
            text = %request.text,
            "fetching"
        );
        (self.callbacks.fetch)(request, update);
    }

    fn cancel_debounce(&self) {
        let pending = self.binding.borrow_mut().debounce.take();
        if let Some(id) = pending {
            self.document.clear_timeout(id);
        }
    }

    /// Return to idle: drop items and selection and detach the overlay.
    pub(crate) fn clear(&self) {
        self.cancel_debounce();
        self.state.borrow_mut().clear();
        self.detach();
        self.clear_rows();
    }

    pub(crate) fn attach(&self) {
        if !self.is_open() {
            self.document.append_child(self.document.body(), self.container);
            tracing::trace!(target: targets::LIFECYCLE, "overlay attached");
        }
    }

    fn detach(&self) {
        if let Some(parent) = self.document.parent(self.container) {
            self.document.remove_child(parent, self.container);
            tracing::trace!(target: targets::LIFECYCLE, "overlay detached");
        }
    }

    /// Place the overlay under the input and run the customize hook.
    pub(crate) fn reposition(&self) {
        if !self.is_open() {
            return;
        }
        let context = position::place(&*self.document, self.input, self.container);
        if let Some(customize) = &self.callbacks.customize {
            customize(&*self.document, &context);
        }
    }

    /// Report `item` to `on_select`, then return to idle.
    pub(crate) fn confirm(&self, item: &Rc<T>) {
        tracing::debug!(target: targets::SELECTION, label = ?item.label(), "item confirmed");
        (self.callbacks.on_select)(item, self.input);
        self.clear();
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let listeners = std::mem::take(&mut self.binding.borrow_mut().listeners);
        for id in listeners {
            self.document.remove_event_listener(id);
        }
        self.clear();
        self.document.release(self.container);
        tracing::debug!(target: targets::LIFECYCLE, "dropdown destroyed");
    }

    fn on_key_down(&self, event: &mut DomEvent) {
        let Some(key) = event.key_value() else {
            return;
        };
        tracing::trace!(target: targets::EVENTS, ?key, "keydown");

        match key {
            Key::ArrowUp | Key::ArrowDown => {
                if !self.is_open() || self.state.borrow().items().is_empty() {
                    return;
                }
                {
                    let mut state = self.state.borrow_mut();
                    if key == Key::ArrowUp {
                        state.select_prev();
                    } else {
                        state.select_next();
                    }
                }
                self.render();
                event.prevent_default();
                event.stop_propagation();
            }
            Key::Escape => {
                let was_open = self.is_open();
                self.clear();
                event.prevent_default();
                if was_open {
                    event.stop_propagation();
                }
            }
            Key::Enter => {
                let selected = self.state.borrow().selected().cloned();
                if let Some(item) = selected {
                    self.confirm(&item);
                }
                if self.settings.prevent_submit {
                    event.prevent_default();
                }
            }
            _ => {}
        }
    }

    fn on_key_up(&self, event: &mut DomEvent) {
        let Some(key) = event.key_value() else {
            return;
        };
        if !key.edits_text() {
            return;
        }
        // ArrowDown opens a closed list; once open it navigates on keydown.
        if key == Key::ArrowDown && self.is_open() {
            return;
        }
        self.start_fetch(FetchTrigger::Keyboard);
    }

    fn on_focus(&self, _event: &mut DomEvent) {
        if self.settings.show_on_focus {
            self.start_fetch(FetchTrigger::Focus);
        }
    }

    fn on_blur(&self, _event: &mut DomEvent) {
        let weak = self.weak_self.clone();
        self.document.set_timeout(
            self.settings.blur_delay,
            Box::new(move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if shared.is_destroyed() {
                    return;
                }
                if shared.document.active_element() != Some(shared.input) {
                    tracing::trace!(target: targets::EVENTS, "focus left input, closing");
                    shared.clear();
                }
            }),
        );
    }

    fn on_resize(&self, _event: &mut DomEvent) {
        if self.is_open() {
            self.render();
        }
    }

    fn on_scroll(&self, event: &mut DomEvent) {
        if event.target().node() == Some(self.container) {
            // Scrolling the list itself must not move or rebuild it.
            event.stop_propagation();
            event.prevent_default();
            return;
        }
        if self.is_open() {
            self.render();
        }
    }

    fn on_overlay_mouse_down(&self, event: &mut DomEvent) {
        // Keeps focus in the input while a row is clicked.
        event.prevent_default();
        event.stop_propagation();
    }

    fn on_overlay_focus(&self, _event: &mut DomEvent) {
        self.document.focus(self.input);
    }
}

/// Builder for [`Dropdown`].
///
/// `fetch` and `on_select` are required; everything else has a default.
pub struct DropdownBuilder<T: SuggestionItem> {
    document: Rc<dyn Document>,
    input: NodeId,
    settings: DropdownSettings,
    fetch: Option<FetchFn<T>>,
    on_select: Option<SelectFn<T>>,
    render: Option<RenderFn<T>>,
    render_group: Option<RenderGroupFn>,
    customize: Option<CustomizeFn>,
}

impl<T: SuggestionItem> DropdownBuilder<T> {
    fn new(document: Rc<dyn Document>, input: NodeId) -> Self {
        Self {
            document,
            input,
            settings: DropdownSettings::default(),
            fetch: None,
            on_select: None,
            render: None,
            render_group: None,
            customize: None,
        }
    }

    /// Replace all non-callback options.
    pub fn settings(mut self, settings: DropdownSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the minimum input length for keyboard fetches.
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.settings.min_length = min_length;
        self
    }

    /// Set the message shown for an empty result.
    pub fn empty_msg(mut self, message: impl Into<String>) -> Self {
        self.settings.empty_msg = Some(message.into());
        self
    }

    /// Fetch when the input gains focus.
    pub fn show_on_focus(mut self, show: bool) -> Self {
        self.settings.show_on_focus = show;
        self
    }

    /// Suppress the default action of Enter.
    pub fn prevent_submit(mut self, prevent: bool) -> Self {
        self.settings.prevent_submit = prevent;
        self
    }

    /// Leave new lists without a selection.
    pub fn disable_auto_select(mut self, disable: bool) -> Self {
        self.settings.disable_auto_select = disable;
        self
    }

    /// Set the grace period between blur and closing.
    pub fn blur_delay(mut self, delay: Duration) -> Self {
        self.settings.blur_delay = delay;
        self
    }

    /// Set the keystroke debounce.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.settings.debounce = debounce;
        self
    }

    /// Add classes to the overlay container.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.settings.class_name = Some(class_name.into());
        self
    }

    /// Set the function that produces items.
    pub fn fetch<F>(mut self, fetch: F) -> Self
    where
        F: Fn(FetchRequest, Update<T>) + 'static,
    {
        self.fetch = Some(Rc::new(fetch));
        self
    }

    /// Set the function called when an item is confirmed.
    pub fn on_select<F>(mut self, on_select: F) -> Self
    where
        F: Fn(&T, NodeId) + 'static,
    {
        self.on_select = Some(Rc::new(on_select));
        self
    }

    /// Replace the item renderer.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&dyn Document, &T, &RenderContext<'_>) -> Option<NodeId> + 'static,
    {
        self.render = Some(Rc::new(render));
        self
    }

    /// Replace the group header renderer.
    pub fn render_group<F>(mut self, render_group: F) -> Self
    where
        F: Fn(&dyn Document, &str, &RenderContext<'_>) -> Option<NodeId> + 'static,
    {
        self.render_group = Some(Rc::new(render_group));
        self
    }

    /// Set a hook run after each placement.
    pub fn customize<F>(mut self, customize: F) -> Self
    where
        F: Fn(&dyn Document, &CustomizeContext) + 'static,
    {
        self.customize = Some(Rc::new(customize));
        self
    }

    /// Create the overlay and bind to the input.
    pub fn build(self) -> Result<Dropdown<T>> {
        let fetch = self.fetch.ok_or_else(|| Error::missing_callback("fetch"))?;
        let on_select = self
            .on_select
            .ok_or_else(|| Error::missing_callback("on_select"))?;
        if !self.document.contains(self.input) {
            return Err(Error::InvalidTarget);
        }

        let document = self.document;
        let container = document.create_element("div");
        document.set_class_name(container, &self.settings.container_class());
        document.set_style(container, "position", "absolute");

        let render: RenderFn<T> = match self.render {
            Some(render) => render,
            None => Rc::new(render::default_render::<T>),
        };
        let render_group: RenderGroupFn = match self.render_group {
            Some(render_group) => render_group,
            None => Rc::new(render::default_render_group),
        };
        let callbacks = Callbacks {
            fetch,
            on_select,
            render,
            render_group,
            customize: self.customize,
        };

        let shared = Rc::new_cyclic(|weak| Shared {
            document,
            input: self.input,
            container,
            settings: self.settings,
            callbacks,
            state: RefCell::new(SelectionState::new()),
            binding: RefCell::new(Binding::default()),
            destroyed: Cell::new(false),
            weak_self: weak.clone(),
        });
        shared.bind();

        tracing::debug!(
            target: targets::LIFECYCLE,
            min_length = shared.settings.min_length,
            debounce = ?shared.settings.debounce,
            "dropdown bound"
        );
        Ok(Dropdown { shared })
    }
}

/// A suggestion dropdown bound to one input.
///
/// Dropping the handle destroys the dropdown.
pub struct Dropdown<T: SuggestionItem> {
    shared: Rc<Shared<T>>,
}

impl<T: SuggestionItem> Dropdown<T> {
    /// Start building a dropdown for `input` in `document`.
    pub fn builder(document: Rc<dyn Document>, input: NodeId) -> DropdownBuilder<T> {
        DropdownBuilder::new(document, input)
    }

    /// Fetch for the current input text now, as if a key had been released.
    /// The minimum length applies. Does nothing once destroyed.
    pub fn fetch(&self) {
        if !self.shared.is_destroyed() {
            self.shared.start_fetch(FetchTrigger::Manual);
        }
    }

    /// Close the overlay without confirming anything.
    pub fn close(&self) {
        if !self.shared.is_destroyed() {
            self.shared.clear();
        }
    }

    /// Unbind from the input and remove the overlay. Idempotent.
    pub fn destroy(&self) {
        self.shared.destroy();
    }

    /// Whether the overlay is attached.
    pub fn is_open(&self) -> bool {
        self.shared.is_open()
    }

    /// Whether [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.shared.is_destroyed()
    }

    /// The bound input.
    pub fn input(&self) -> NodeId {
        self.shared.input
    }

    /// The overlay container.
    pub fn container(&self) -> NodeId {
        self.shared.container
    }

    /// The effective settings.
    pub fn settings(&self) -> &DropdownSettings {
        &self.shared.settings
    }

    /// The displayed items.
    pub fn items(&self) -> Vec<Rc<T>> {
        self.shared.state.borrow().items().to_vec()
    }

    /// The highlighted item.
    pub fn selected(&self) -> Option<Rc<T>> {
        self.shared.state.borrow().selected().cloned()
    }

    /// Index of the highlighted item.
    pub fn selected_index(&self) -> Option<usize> {
        self.shared.state.borrow().selected_index()
    }

    /// The input text the displayed items were fetched for.
    pub fn input_value(&self) -> String {
        self.shared.state.borrow().input_value().to_string()
    }

    /// The current request generation.
    pub fn epoch(&self) -> Epoch {
        self.shared.state.borrow().epoch()
    }
}

impl<T: SuggestionItem> Drop for Dropdown<T> {
    fn drop(&mut self) {
        self.shared.destroy();
    }
}

impl<T: SuggestionItem> fmt::Debug for Dropdown<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropdown")
            .field("input", &self.shared.input)
            .field("container", &self.shared.container)
            .field("open", &self.is_open())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Suggestion;
    use autosuggest_core::HeadlessDocument;

    fn setup() -> (Rc<HeadlessDocument>, NodeId) {
        let doc = Rc::new(HeadlessDocument::new());
        let input = doc.create_input();
        (doc, input)
    }

    #[test]
    fn test_build_requires_fetch() {
        let (doc, input) = setup();
        let err = Dropdown::<Suggestion>::builder(doc, input)
            .on_select(|_, _| {})
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingCallback { name: "fetch" }));
    }

    #[test]
    fn test_build_requires_on_select() {
        let (doc, input) = setup();
        let err = Dropdown::<Suggestion>::builder(doc, input)
            .fetch(|_, _| {})
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required callback 'on_select'");
    }

    #[test]
    fn test_build_rejects_foreign_input() {
        let (doc, _) = setup();
        let other = HeadlessDocument::new();
        let _ = other.create_input();
        let foreign = other.create_input();
        let err = Dropdown::<Suggestion>::builder(doc, foreign)
            .fetch(|_, _| {})
            .on_select(|_, _| {})
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTarget));
    }

    #[test]
    fn test_build_creates_detached_container() {
        let (doc, input) = setup();
        let dropdown = Dropdown::<Suggestion>::builder(doc.clone(), input)
            .class_name("dark")
            .fetch(|_, _| {})
            .on_select(|_, _| {})
            .build()
            .unwrap();

        let container = dropdown.container();
        assert!(!dropdown.is_open());
        assert!(doc.has_class(container, "autocomplete"));
        assert!(doc.has_class(container, "dark"));
        assert_eq!(doc.style(container, "position").as_deref(), Some("absolute"));
        assert_eq!(doc.listener_count(), 8);
    }

    #[test]
    fn test_drop_unbinds() {
        let (doc, input) = setup();
        let dropdown = Dropdown::<Suggestion>::builder(doc.clone(), input)
            .fetch(|_, _| {})
            .on_select(|_, _| {})
            .build()
            .unwrap();
        assert_eq!(doc.listener_count(), 8);

        drop(dropdown);
        assert_eq!(doc.listener_count(), 0);
    }
}
