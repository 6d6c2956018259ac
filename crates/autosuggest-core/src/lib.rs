//! Core systems for autosuggest.
//!
//! This crate holds everything the suggestion widget needs from its host
//! without knowing about suggestions:
//!
//! - **Document seam**: the [`Document`] trait and the [`NodeId`],
//!   [`ListenerId`] and [`TimerId`] handles it hands out
//! - **Event model**: [`DomEvent`], [`EventKind`], [`EventTarget`] and the
//!   logical [`Key`]
//! - **Geometry**: [`Rect`] and [`Viewport`], as read back from the host
//! - **Headless backend**: [`HeadlessDocument`], an in-memory document with a
//!   virtual clock
//! - **Logging**: `tracing` target names in [`logging::targets`]
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use autosuggest_core::{
//!     Document, DomEvent, EventKind, EventTarget, HeadlessDocument, ListenerOptions,
//! };
//!
//! let doc = HeadlessDocument::new();
//! let input = doc.create_input();
//!
//! let id = doc.add_event_listener(
//!     EventTarget::Node(input),
//!     EventKind::KeyDown,
//!     ListenerOptions::default(),
//!     Rc::new(|event: &mut DomEvent| event.prevent_default()),
//! );
//!
//! let event = doc.key_down(input, autosuggest_core::Key::Enter);
//! assert!(event.is_default_prevented());
//!
//! doc.remove_event_listener(id);
//! ```

pub mod dom;
pub mod event;
pub mod geometry;
mod headless;
pub mod logging;

pub use dom::{Document, Listener, ListenerId, NodeId, TimerCallback, TimerId};
pub use event::{DomEvent, EventKind, EventTarget, Key, ListenerOptions};
pub use geometry::{Point, Rect, Size, Viewport};
pub use headless::{HeadlessDocument, DEFAULT_ROW_HEIGHT};
