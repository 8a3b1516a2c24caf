//! Render configuration with enumerated defaults

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Accessible label used when the caller provides none
pub const DEFAULT_ARIA_LABEL: &str = "content";

/// Placeholder shown for absent or unrenderable content
pub const DEFAULT_FALLBACK_TEXT: &str = "No content available";

/// Elements removed together with their content, whatever the allow-list says
pub const FORBIDDEN_TAGS: [&str; 2] = ["script", "style"];

/// Configuration for one content renderer
///
/// Missing fields deserialize to the defaults below, so a partially
/// specified document is always usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Tags kept by the sanitizer; empty means text-only
    pub allowed_tags: BTreeSet<String>,
    /// Attributes kept on allowed tags
    pub allowed_attributes: BTreeSet<String>,
    /// Visible text when content is absent or fails to sanitize
    pub fallback_text: String,
    /// Accessible label for the container
    pub aria_label: Option<String>,
    /// Largest raw value accepted for sanitization
    pub max_input_bytes: usize,
}

impl RenderOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With allowed tags
    #[must_use]
    pub fn with_allowed_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// With allowed attributes
    #[must_use]
    pub fn with_allowed_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// With fallback text
    #[inline]
    #[must_use]
    pub fn with_fallback_text(mut self, text: impl Into<String>) -> Self {
        self.fallback_text = text.into();
        self
    }

    /// With accessible label
    #[inline]
    #[must_use]
    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    /// With input size ceiling
    #[inline]
    #[must_use]
    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }

    /// Label placed on the container
    ///
    /// Blank labels count as absent.
    #[must_use]
    pub fn effective_aria_label(&self) -> &str {
        self.aria_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(DEFAULT_ARIA_LABEL)
    }

    /// Allow-listed tags minus the ones that are never allowed
    pub fn permitted_tags(&self) -> impl Iterator<Item = &str> {
        self.allowed_tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !FORBIDDEN_TAGS.iter().any(|f| f.eq_ignore_ascii_case(tag)))
    }

    /// Allow-listed attributes minus event handlers and inline styles
    pub fn permitted_attributes(&self) -> impl Iterator<Item = &str> {
        self.allowed_attributes
            .iter()
            .map(String::as_str)
            .filter(|attr| !is_forbidden_attribute(attr))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            allowed_tags: BTreeSet::new(),
            allowed_attributes: BTreeSet::new(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            aria_label: None,
            max_input_bytes: 256 * 1024, // 256KB
        }
    }
}

/// `on*` handlers and `style` are stripped unconditionally
#[must_use]
pub fn is_forbidden_attribute(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    name.starts_with("on") || name == "style"
}
