//! Autosuggest - a type-ahead suggestion dropdown for text inputs.
//!
//! Bind a [`Dropdown`] to an input and it asks your fetch function for items
//! as the user types, shows them in an overlay positioned under the input,
//! and reports the item the user picks with the mouse or keyboard.
//!
//! This crate re-exports everything from `autosuggest-core`, including the
//! [`Document`] seam and the in-memory [`HeadlessDocument`].
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use autosuggest::{Document, Dropdown, HeadlessDocument, Key, Suggestion};
//!
//! let doc = Rc::new(HeadlessDocument::new());
//! let input = doc.create_input();
//! let picked = Rc::new(RefCell::new(None));
//!
//! let dropdown = Dropdown::<Suggestion>::builder(doc.clone(), input)
//!     .fetch(|request, update| {
//!         let items = ["apple", "apricot", "banana"]
//!             .into_iter()
//!             .filter(|fruit| fruit.starts_with(request.text.as_str()))
//!             .map(Suggestion::new)
//!             .collect();
//!         update.items(items);
//!     })
//!     .on_select({
//!         let picked = picked.clone();
//!         move |item: &Suggestion, _input| *picked.borrow_mut() = item.label.clone()
//!     })
//!     .build()?;
//!
//! doc.focus(input);
//! doc.type_text(input, "ap");
//! assert!(dropdown.is_open());
//! assert_eq!(dropdown.items().len(), 2);
//!
//! doc.press_key(input, Key::ArrowDown);
//! doc.press_key(input, Key::Enter);
//! assert_eq!(picked.borrow().as_deref(), Some("apricot"));
//! assert!(!dropdown.is_open());
//! # Ok::<(), autosuggest::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`dropdown`]: the controller, its builder and event handling
//! - [`fetch`]: requests, epochs and the latest-wins [`Update`] handle
//! - [`selection`]: the item list and highlighted item
//! - [`render`]: overlay content and scroll-into-view
//! - [`position`]: overlay placement under the input
//! - [`settings`]: options and TOML loading

pub mod dropdown;
pub mod error;
pub mod fetch;
pub mod item;
pub mod position;
pub mod render;
pub mod selection;
pub mod settings;

pub use autosuggest_core::*;

pub use dropdown::{CustomizeFn, Dropdown, DropdownBuilder, FetchFn, SelectFn};
pub use error::{Error, Result};
pub use fetch::{Epoch, FetchRequest, FetchTrigger, Update};
pub use item::{Suggestion, SuggestionItem};
pub use position::{CustomizeContext, Placement};
pub use render::{RenderContext, RenderFn, RenderGroupFn};
pub use selection::SelectionState;
pub use settings::DropdownSettings;
