//! Event model shared between the widget and its document backend.
//!
//! Events are plain values dispatched by the backend to registered
//! listeners. A listener receives `&mut DomEvent` and may mark it with
//! [`DomEvent::prevent_default`] or [`DomEvent::stop_propagation`]; the
//! backend reads those flags back after each listener returns.

use crate::dom::NodeId;

/// The kinds of events the widget listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A key was pressed (`keydown`).
    KeyDown,
    /// A key was released (`keyup`).
    KeyUp,
    /// An element gained focus. Does not bubble.
    Focus,
    /// An element lost focus. Does not bubble.
    Blur,
    /// A primary-button click.
    Click,
    /// A mouse button was pressed.
    MouseDown,
    /// An element or the page scrolled. Does not bubble.
    Scroll,
    /// The window was resized. Only targets the window.
    Resize,
}

impl EventKind {
    /// Whether events of this kind bubble from the target to its ancestors.
    pub fn bubbles(self) -> bool {
        matches!(
            self,
            Self::KeyDown | Self::KeyUp | Self::Click | Self::MouseDown
        )
    }
}

/// Where an event is dispatched or a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The global window object.
    Window,
    /// The document object (root of the node tree).
    Document,
    /// A specific element.
    Node(NodeId),
}

impl EventTarget {
    /// Returns the node if this target is an element.
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }
}

impl From<NodeId> for EventTarget {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// Options applied when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Invoke during the capture phase instead of target/bubble.
    pub capture: bool,
}

impl ListenerOptions {
    /// Capture-phase listener.
    pub const CAPTURE: Self = Self { capture: true };
}

/// A logical key, as reported by `KeyboardEvent.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    Backspace,
    Delete,
    Insert,
    Enter,
    Tab,
    Escape,

    Shift,
    Control,
    Alt,
    Meta,
    AltGraph,
    CapsLock,
    NumLock,
    ScrollLock,

    /// Function keys F1 through F24.
    Function(u8),

    PrintScreen,
    Pause,
    ContextMenu,

    /// A key producing a single character.
    Character(char),
    /// Anything else (dead keys, IME composition, media keys).
    Unidentified,
}

impl Key {
    /// Parse a `KeyboardEvent.key` value.
    ///
    /// Accepts the legacy IE/Edge names (`"Up"`, `"Esc"`, `"Apps"`, ...) as
    /// well as the standard ones.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,

            "Backspace" => Self::Backspace,
            "Delete" | "Del" => Self::Delete,
            "Insert" => Self::Insert,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,

            "Shift" => Self::Shift,
            "Control" => Self::Control,
            "Alt" => Self::Alt,
            "Meta" | "OS" | "Win" | "Super" => Self::Meta,
            "AltGraph" => Self::AltGraph,
            "CapsLock" => Self::CapsLock,
            "NumLock" => Self::NumLock,
            "ScrollLock" | "Scroll" => Self::ScrollLock,

            "PrintScreen" => Self::PrintScreen,
            "Pause" => Self::Pause,
            "ContextMenu" | "Apps" => Self::ContextMenu,
            "Spacebar" => Self::Character(' '),

            other => Self::parse_other(other),
        }
    }

    fn parse_other(key: &str) -> Self {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::Character(c);
        }

        // Function keys: "F1" .. "F24"
        if let Some(n) = key.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=24).contains(&n) {
                return Self::Function(n);
            }
        }

        Self::Unidentified
    }

    /// Whether releasing this key can change the text of an input.
    ///
    /// Navigation, modifier, lock and function keys return `false`;
    /// character keys and editing keys return `true`. `ArrowDown` returns
    /// `true` because it opens a closed suggestion list.
    pub fn edits_text(self) -> bool {
        match self {
            Self::Character(_) | Self::Backspace | Self::Delete | Self::ArrowDown => true,
            Self::Unidentified => true,
            Self::ArrowUp
            | Self::ArrowLeft
            | Self::ArrowRight
            | Self::Home
            | Self::End
            | Self::PageUp
            | Self::PageDown
            | Self::Insert
            | Self::Enter
            | Self::Tab
            | Self::Escape
            | Self::Shift
            | Self::Control
            | Self::Alt
            | Self::Meta
            | Self::AltGraph
            | Self::CapsLock
            | Self::NumLock
            | Self::ScrollLock
            | Self::Function(_)
            | Self::PrintScreen
            | Self::Pause
            | Self::ContextMenu => false,
        }
    }
}

/// An event being dispatched through the document.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    kind: EventKind,
    target: EventTarget,
    key: Option<Key>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Create a new event aimed at `target`.
    pub fn new(kind: EventKind, target: impl Into<EventTarget>) -> Self {
        Self {
            kind,
            target: target.into(),
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a key event (`KeyDown` or `KeyUp`) for `key`.
    pub fn key(kind: EventKind, target: impl Into<EventTarget>, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(kind, target)
        }
    }

    /// The event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Where the event was originally dispatched.
    pub fn target(&self) -> EventTarget {
        self.target
    }

    /// The key for keyboard events.
    pub fn key_value(&self) -> Option<Key> {
        self.key
    }

    /// Suppress the host's default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Check if the default action was suppressed.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop the event from reaching any further listeners.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if propagation was stopped.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom_names() {
        assert_eq!(Key::from_dom_key("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_dom_key("Down"), Key::ArrowDown);
        assert_eq!(Key::from_dom_key("Esc"), Key::Escape);
        assert_eq!(Key::from_dom_key("a"), Key::Character('a'));
        assert_eq!(Key::from_dom_key("é"), Key::Character('é'));
        assert_eq!(Key::from_dom_key(" "), Key::Character(' '));
        assert_eq!(Key::from_dom_key("F5"), Key::Function(5));
        assert_eq!(Key::from_dom_key("F30"), Key::Unidentified);
        assert_eq!(Key::from_dom_key("MediaPlayPause"), Key::Unidentified);
    }

    #[test]
    fn test_key_edits_text() {
        assert!(Key::Character('x').edits_text());
        assert!(Key::Backspace.edits_text());
        assert!(Key::ArrowDown.edits_text());
        assert!(!Key::ArrowUp.edits_text());
        assert!(!Key::Enter.edits_text());
        assert!(!Key::Shift.edits_text());
        assert!(!Key::Function(1).edits_text());
    }

    #[test]
    fn test_event_flags() {
        let mut event = DomEvent::new(EventKind::Click, EventTarget::Document);
        assert!(!event.is_default_prevented());
        assert!(!event.is_propagation_stopped());

        event.prevent_default();
        event.stop_propagation();
        assert!(event.is_default_prevented());
        assert!(event.is_propagation_stopped());
    }

    #[test]
    fn test_bubbling_kinds() {
        assert!(EventKind::KeyUp.bubbles());
        assert!(EventKind::Click.bubbles());
        assert!(!EventKind::Scroll.bubbles());
        assert!(!EventKind::Focus.bubbles());
    }
}
