//! Error types for constructing a dropdown.

/// Result type alias for autosuggest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or binding a dropdown.
///
/// Once bound, the widget itself has no failure path: a missing render
/// result omits that row and a response it cannot use is ignored.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required callback was never supplied to the builder.
    #[error("Missing required callback '{name}'")]
    MissingCallback { name: &'static str },

    /// The input node does not belong to the document.
    #[error("Input node is not part of the document")]
    InvalidTarget,

    /// A settings file could not be read.
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be parsed from TOML.
    #[error("Invalid dropdown settings: {0}")]
    Settings(#[from] toml::de::Error),
}

impl Error {
    /// Create a missing-callback error.
    pub fn missing_callback(name: &'static str) -> Self {
        Self::MissingCallback { name }
    }
}
