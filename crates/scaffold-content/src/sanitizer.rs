//! Sanitizer seam and the ammonia-backed default
//!
//! The renderer only depends on [`Sanitizer`]; [`AmmoniaSanitizer`] is the
//! allow-list implementation used unless a caller injects another one.

use crate::error::SanitizeError;
use crate::options::{RenderOptions, FORBIDDEN_TAGS};
use std::collections::HashSet;

/// URL schemes kept on allowed link attributes
pub const SAFE_URL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Pure function from untrusted markup to safe markup
///
/// Implementations must strip every tag outside
/// [`RenderOptions::permitted_tags`] and every attribute outside
/// [`RenderOptions::permitted_attributes`]. Returning an error means the
/// input could not be recovered; the renderer falls back and reports it.
#[cfg_attr(test, mockall::automock)]
pub trait Sanitizer: Send + Sync {
    /// Sanitize `html` under the allow-lists in `options`
    fn sanitize(&self, html: &str, options: &RenderOptions) -> Result<String, SanitizeError>;
}

/// Allow-list sanitizer built on `ammonia`
///
/// `script` and `style` are dropped with their content, comments are
/// stripped, and URLs are limited to [`SAFE_URL_SCHEMES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AmmoniaSanitizer;

impl AmmoniaSanitizer {
    /// Create new sanitizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str, options: &RenderOptions) -> Result<String, SanitizeError> {
        // ammonia matches lowercase element and attribute names
        let tags: Vec<String> = options
            .permitted_tags()
            .map(str::to_ascii_lowercase)
            .collect();
        let attributes: Vec<String> = options
            .permitted_attributes()
            .map(str::to_ascii_lowercase)
            .collect();

        let cleaned = ammonia::Builder::empty()
            .tags(tags.iter().map(String::as_str).collect::<HashSet<_>>())
            .generic_attributes(attributes.iter().map(String::as_str).collect::<HashSet<_>>())
            .clean_content_tags(FORBIDDEN_TAGS.into_iter().collect::<HashSet<_>>())
            .url_schemes(SAFE_URL_SCHEMES.into_iter().collect::<HashSet<_>>())
            .link_rel(None)
            .strip_comments(true)
            .clean(html)
            .to_string();

        Ok(cleaned)
    }
}

impl<T: Sanitizer + ?Sized> Sanitizer for std::sync::Arc<T> {
    fn sanitize(&self, html: &str, options: &RenderOptions) -> Result<String, SanitizeError> {
        (**self).sanitize(html, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(html: &str, tags: &[&str]) -> String {
        let options = RenderOptions::new().with_allowed_tags(tags.iter().copied());
        AmmoniaSanitizer.sanitize(html, &options).unwrap()
    }

    #[test]
    fn keeps_allowed_tags() {
        assert_eq!(sanitize("<b>Hi</b>", &["b"]), "<b>Hi</b>");
    }

    #[test]
    fn strips_tags_not_allowed_but_keeps_text() {
        assert_eq!(sanitize("<i>Hi</i> <b>there</b>", &["b"]), "Hi <b>there</b>");
    }

    #[test]
    fn removes_script_with_content_even_when_allowed() {
        let out = sanitize("<b>Hi</b><script>alert(1)</script>", &["b", "script"]);
        assert_eq!(out, "<b>Hi</b>");
    }

    #[test]
    fn removes_style_block() {
        let out = sanitize("<style>body{display:none}</style>text", &["style"]);
        assert_eq!(out, "text");
    }

    #[test]
    fn removes_event_handlers() {
        let options = RenderOptions::new()
            .with_allowed_tags(["a"])
            .with_allowed_attributes(["href", "onclick"]);
        let out = AmmoniaSanitizer
            .sanitize(r#"<a href="https://example.com" onclick="steal()">x</a>"#, &options)
            .unwrap();
        assert!(out.contains(r#"href="https://example.com""#));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn drops_javascript_urls() {
        let options = RenderOptions::new()
            .with_allowed_tags(["a"])
            .with_allowed_attributes(["href"]);
        let out = AmmoniaSanitizer
            .sanitize(r#"<a href="javascript:alert(1)">x</a>"#, &options)
            .unwrap();
        assert!(!out.to_ascii_lowercase().contains("javascript"));
    }

    #[test]
    fn uppercase_allow_list_matches() {
        assert_eq!(sanitize("<B>Hi</B>", &["B"]), "<b>Hi</b>");
    }
}
