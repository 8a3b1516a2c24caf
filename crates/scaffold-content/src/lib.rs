//! Scaffold Content
//!
//! Sanitize-then-render display of possibly untrusted text.
//!
//! # Architecture
//!
//! ```text
//! ContentPayload + RenderOptions → SafeContentRenderer → RenderedContent
//!                                        │
//!                                  Sanitizer (ammonia)
//!                                        │
//!                              MemoizedRenderer (moka)
//! ```
//!
//! Markup built from untrusted strings is confined to this crate; other
//! crates hand payloads to the renderer and never concatenate HTML.
//!
//! # Example
//!
//! ```rust
//! use scaffold_content::{ContentPayload, RenderOptions, SafeContentRenderer};
//!
//! let renderer = SafeContentRenderer::new();
//! let options = RenderOptions::new().with_allowed_tags(["b"]);
//! let out = renderer.render(
//!     &ContentPayload::untrusted("<b>Hi</b><script>alert(1)</script>"),
//!     &options,
//! );
//! assert_eq!(out.html(), r#"<div role="region" aria-label="content"><b>Hi</b></div>"#);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod markup;
pub mod memo;
pub mod options;
pub mod payload;
pub mod renderer;
pub mod sanitizer;

pub use error::SanitizeError;
pub use memo::{MemoStats, MemoizedRenderer};
pub use options::{RenderOptions, DEFAULT_ARIA_LABEL, DEFAULT_FALLBACK_TEXT};
pub use payload::{ContentPayload, SanitizationResult};
pub use renderer::{RenderOutcome, RenderedContent, SafeContentRenderer, SanitizeErrorHook};
pub use sanitizer::{AmmoniaSanitizer, Sanitizer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for rendering content
    pub use crate::options::RenderOptions;
    pub use crate::payload::ContentPayload;
    pub use crate::renderer::{RenderOutcome, RenderedContent, SafeContentRenderer};
    pub use crate::sanitizer::Sanitizer;
}
