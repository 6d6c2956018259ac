//! Dropdown configuration.
//!
//! [`DropdownSettings`] holds every non-callback option. It can be built in
//! code with the `with_*` methods or loaded from TOML:
//!
//! ```
//! use std::time::Duration;
//! use autosuggest::DropdownSettings;
//!
//! let settings = DropdownSettings::from_toml_str(r#"
//!     min_length = 3
//!     empty_msg = "No matches"
//!     show_on_focus = true
//!     blur_delay_ms = 150
//! "#).unwrap();
//!
//! assert_eq!(settings.min_length, 3);
//! assert_eq!(settings.blur_delay, Duration::from_millis(150));
//! assert!(!settings.prevent_submit);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use autosuggest_core::logging::targets;

use crate::error::Result;

/// Default minimum input length before a keyboard fetch is issued.
pub const DEFAULT_MIN_LENGTH: usize = 2;

/// Default grace period between blur and closing the overlay.
pub const DEFAULT_BLUR_DELAY: Duration = Duration::from_millis(200);

/// Class always present on the overlay container.
pub const CONTAINER_CLASS: &str = "autocomplete";

/// Non-callback options for a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownSettings {
    /// Minimum number of characters before typing triggers a fetch.
    pub min_length: usize,

    /// Message shown when a fetch returns no items. Without one, an empty
    /// result closes the overlay.
    pub empty_msg: Option<String>,

    /// Fetch when the input gains focus, regardless of `min_length`.
    pub show_on_focus: bool,

    /// Suppress the default action of Enter (form submission).
    pub prevent_submit: bool,

    /// Leave the list without a selection when new items arrive.
    pub disable_auto_select: bool,

    /// How long after blur to wait before closing, giving an in-progress
    /// click on an overlay row time to land.
    #[serde(rename = "blur_delay_ms", with = "millis")]
    pub blur_delay: Duration,

    /// Quiet period after a keystroke before fetching. Zero fetches
    /// immediately.
    #[serde(rename = "debounce_ms", with = "millis")]
    pub debounce: Duration,

    /// Extra classes for the overlay container, after `autocomplete`.
    pub class_name: Option<String>,
}

impl Default for DropdownSettings {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            empty_msg: None,
            show_on_focus: false,
            prevent_submit: false,
            disable_auto_select: false,
            blur_delay: DEFAULT_BLUR_DELAY,
            debounce: Duration::ZERO,
            class_name: None,
        }
    }
}

impl DropdownSettings {
    /// Create settings with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load settings from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: targets::LIFECYCLE,
            path = %path.display(),
            "loaded dropdown settings"
        );
        Ok(settings)
    }

    /// Set the minimum length using builder pattern.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Set the empty-result message using builder pattern.
    pub fn with_empty_msg(mut self, message: impl Into<String>) -> Self {
        self.empty_msg = Some(message.into());
        self
    }

    /// Enable or disable fetch on focus using builder pattern.
    pub fn with_show_on_focus(mut self, show: bool) -> Self {
        self.show_on_focus = show;
        self
    }

    /// Enable or disable Enter suppression using builder pattern.
    pub fn with_prevent_submit(mut self, prevent: bool) -> Self {
        self.prevent_submit = prevent;
        self
    }

    /// Enable or disable auto-selection of the first item using builder
    /// pattern.
    pub fn with_disable_auto_select(mut self, disable: bool) -> Self {
        self.disable_auto_select = disable;
        self
    }

    /// Set the blur grace delay using builder pattern.
    pub fn with_blur_delay(mut self, delay: Duration) -> Self {
        self.blur_delay = delay;
        self
    }

    /// Set the keystroke debounce using builder pattern.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set extra container classes using builder pattern.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// The full class list for the overlay container.
    pub fn container_class(&self) -> String {
        match self.class_name.as_deref().map(str::trim) {
            Some(extra) if !extra.is_empty() => format!("{CONTAINER_CLASS} {extra}"),
            _ => CONTAINER_CLASS.to_string(),
        }
    }
}

/// Serde adapter storing a [`Duration`] as whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DropdownSettings::default();
        assert_eq!(settings.min_length, 2);
        assert_eq!(settings.empty_msg, None);
        assert!(!settings.show_on_focus);
        assert!(!settings.prevent_submit);
        assert_eq!(settings.blur_delay, Duration::from_millis(200));
        assert_eq!(settings.debounce, Duration::ZERO);
    }

    #[test]
    fn test_builder_methods() {
        let settings = DropdownSettings::new()
            .with_min_length(1)
            .with_empty_msg("Nothing")
            .with_prevent_submit(true)
            .with_debounce(Duration::from_millis(50));

        assert_eq!(settings.min_length, 1);
        assert_eq!(settings.empty_msg.as_deref(), Some("Nothing"));
        assert!(settings.prevent_submit);
        assert_eq!(settings.debounce, Duration::from_millis(50));
    }

    #[test]
    fn test_container_class() {
        assert_eq!(DropdownSettings::new().container_class(), "autocomplete");
        assert_eq!(
            DropdownSettings::new()
                .with_class_name("dark")
                .container_class(),
            "autocomplete dark"
        );
        assert_eq!(
            DropdownSettings::new().with_class_name("  ").container_class(),
            "autocomplete"
        );
    }

    #[test]
    fn test_toml_round_trip_keeps_durations_in_millis() {
        let settings = DropdownSettings::new()
            .with_blur_delay(Duration::from_millis(120))
            .with_debounce(Duration::from_millis(30));

        let text = toml::to_string(&settings).unwrap();
        assert!(text.contains("blur_delay_ms = 120"));
        assert!(text.contains("debounce_ms = 30"));

        let parsed = DropdownSettings::from_toml_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropdown.toml");
        std::fs::write(&path, "min_length = 1\nprevent_submit = true\n").unwrap();

        let settings = DropdownSettings::from_toml_file(&path).unwrap();
        assert_eq!(settings.min_length, 1);
        assert!(settings.prevent_submit);
        assert_eq!(settings.blur_delay, DEFAULT_BLUR_DELAY);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DropdownSettings::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = DropdownSettings::from_toml_str("min_length = \"two\"").unwrap_err();
        assert!(err.to_string().starts_with("Invalid dropdown settings"));
    }
}
