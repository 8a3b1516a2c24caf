//! Error types for content sanitization
//!
//! Every variant here is recovered inside the renderer: the caller sees the
//! fallback container and, if registered, a call to the sanitize-error hook.

/// Failure while turning an untrusted payload into safe markup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanitizeError {
    /// Sanitizer reported the input as unrecoverable
    #[error("sanitizer rejected input: {0}")]
    Rejected(String),

    /// Sanitizer panicked while processing the input
    #[error("sanitizer panicked: {0}")]
    Panicked(String),

    /// Input exceeds the configured size ceiling
    #[error("input too large: {size} bytes (max: {max})")]
    InputTooLarge { size: usize, max: usize },

    /// Payload bytes were not valid UTF-8
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Sanitizer output still carried an executable context
    #[error("sanitizer output failed safety check: {0}")]
    UnsafeOutput(&'static str),
}

impl SanitizeError {
    /// Create rejection error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Stable short name used in log fields
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::Panicked(_) => "panicked",
            Self::InputTooLarge { .. } => "input_too_large",
            Self::InvalidEncoding(_) => "invalid_encoding",
            Self::UnsafeOutput(_) => "unsafe_output",
        }
    }
}
