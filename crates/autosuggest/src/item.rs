//! Suggestion items.

/// A record the dropdown can display.
///
/// Items are otherwise opaque to the widget. Once adopted from a fetch
/// response each item is held behind an `Rc` and compared by identity, so two
/// equal values are still two distinct rows.
pub trait SuggestionItem: 'static {
    /// Text shown by the default renderer.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Group this item belongs to. Consecutive items with the same group are
    /// shown under one header.
    fn group(&self) -> Option<&str> {
        None
    }
}

/// A ready-made item with an optional label and group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Suggestion {
    pub label: Option<String>,
    pub group: Option<String>,
}

impl Suggestion {
    /// Create an ungrouped suggestion.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            group: None,
        }
    }

    /// Set the group using builder pattern.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl SuggestionItem for Suggestion {
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

impl SuggestionItem for String {
    fn label(&self) -> Option<&str> {
        Some(self)
    }
}

impl SuggestionItem for &'static str {
    fn label(&self) -> Option<&str> {
        Some(self)
    }
}

impl From<&str> for Suggestion {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}
