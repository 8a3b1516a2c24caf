//! Content payloads and sanitization results

use serde::{Deserialize, Serialize};

/// Raw content handed to the renderer for one render pass
///
/// `is_trusted_html` marks markup that was vetted upstream; everything else
/// goes through the sanitizer before it is emitted as markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentPayload {
    /// User- or system-supplied text, possibly containing markup
    pub raw_value: Option<String>,
    /// Whether `raw_value` is already safe to emit verbatim
    pub is_trusted_html: bool,
    /// Decode failure recorded by [`ContentPayload::from_bytes`]
    ///
    /// Serialized with the payload so a stored lossy value still reports
    /// its decode failure when rendered later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoding_error: Option<String>,
}

impl ContentPayload {
    /// Payload that must be sanitized
    #[inline]
    #[must_use]
    pub fn untrusted(raw: impl Into<String>) -> Self {
        Self {
            raw_value: Some(raw.into()),
            is_trusted_html: false,
            encoding_error: None,
        }
    }

    /// Payload vetted upstream, emitted without sanitization
    #[inline]
    #[must_use]
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self {
            raw_value: Some(raw.into()),
            is_trusted_html: true,
            encoding_error: None,
        }
    }

    /// Payload with no value at all
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Untrusted payload from optional text
    #[inline]
    #[must_use]
    pub fn from_optional(raw: Option<String>) -> Self {
        Self {
            raw_value: raw,
            is_trusted_html: false,
            encoding_error: None,
        }
    }

    /// Untrusted payload decoded from bytes
    ///
    /// Invalid UTF-8 is not an error here. The lossy decoding is kept so the
    /// empty-input check still applies, and the renderer reports the decode
    /// failure through its sanitize-error hook.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::untrusted(text),
            Err(e) => Self {
                raw_value: Some(String::from_utf8_lossy(bytes).into_owned()),
                is_trusted_html: false,
                encoding_error: Some(e.to_string()),
            },
        }
    }

    /// Value with surrounding whitespace removed, `None` when blank
    #[must_use]
    pub fn non_blank(&self) -> Option<&str> {
        self.raw_value
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
    }

    /// Decode failure, if the payload came from invalid bytes
    #[inline]
    #[must_use]
    pub fn encoding_error(&self) -> Option<&str> {
        self.encoding_error.as_deref()
    }
}

impl From<&str> for ContentPayload {
    fn from(raw: &str) -> Self {
        Self::untrusted(raw)
    }
}

impl From<String> for ContentPayload {
    fn from(raw: String) -> Self {
        Self::untrusted(raw)
    }
}

impl From<Option<String>> for ContentPayload {
    fn from(raw: Option<String>) -> Self {
        Self::from_optional(raw)
    }
}

/// Output of one sanitizer pass over an untrusted payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationResult {
    /// Markup safe to place inside the container
    pub safe_html: String,
    /// Whether the sanitizer stripped, escaped or rewrote anything
    pub was_modified: bool,
}

impl SanitizationResult {
    /// Build result by comparing sanitizer output against its input
    #[must_use]
    pub fn compare(input: &str, safe_html: String) -> Self {
        let was_modified = safe_html != input;
        Self {
            safe_html,
            was_modified,
        }
    }
}
