//! Logging facilities for autosuggest.
//!
//! Autosuggest uses the `tracing` crate for instrumentation and never installs
//! a subscriber itself. To see logs, install one in the embedding application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("autosuggest::fetch=debug,autosuggest::render=trace")
//!     .init();
//! ```
//!
//! Per-event flow (key handling, render passes, timer fires) is logged at
//! `trace`; lifecycle and applied/dropped fetch responses at `debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Fetch orchestration: requests issued, responses applied or dropped.
    pub const FETCH: &str = "autosuggest::fetch";
    /// Selection navigation.
    pub const SELECTION: &str = "autosuggest::selection";
    /// Overlay content rebuilds and scrolling.
    pub const RENDER: &str = "autosuggest::render";
    /// Overlay placement.
    pub const POSITION: &str = "autosuggest::position";
    /// Listener dispatch on the bound input, window and document.
    pub const EVENTS: &str = "autosuggest::events";
    /// Construction and teardown.
    pub const LIFECYCLE: &str = "autosuggest::lifecycle";
    /// The in-memory document backend.
    pub const HEADLESS: &str = "autosuggest_core::headless";
}
