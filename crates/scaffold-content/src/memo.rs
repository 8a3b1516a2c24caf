//! Memoizing renderer using moka
//!
//! Sanitization runs once per distinct raw value and option set; repeated
//! renders of the same payload are served from a bounded cache.

use crate::options::RenderOptions;
use crate::payload::ContentPayload;
use crate::renderer::{RenderOutcome, RenderedContent, SafeContentRenderer};
use crate::sanitizer::{AmmoniaSanitizer, Sanitizer};
use moka::sync::Cache;
use std::fmt;

/// Digest of everything that influences a render
pub type RenderKey = [u8; 32];

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoStats {
    /// Number of cached renders
    pub entry_count: u64,
}

/// Renderer that caches successful renders by content digest
///
/// Recovered renders are never cached so the error hook fires for every
/// failing render, not only the first.
#[derive(Clone)]
pub struct MemoizedRenderer<S = AmmoniaSanitizer> {
    renderer: SafeContentRenderer<S>,
    cache: Cache<RenderKey, RenderedContent>,
}

impl<S: Sanitizer + 'static> MemoizedRenderer<S> {
    /// Wrap renderer with a cache of `max_capacity` entries
    #[must_use]
    pub fn new(renderer: SafeContentRenderer<S>, max_capacity: u64) -> Self {
        Self {
            renderer,
            cache: Cache::new(max_capacity),
        }
    }

    /// Render, reusing a cached result for identical inputs
    pub fn render(&self, payload: &ContentPayload, options: &RenderOptions) -> RenderedContent {
        let key = render_key(payload, options);
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!("render cache hit");
            return hit;
        }

        let rendered = self.renderer.render(payload, options);
        if rendered.outcome() != RenderOutcome::Recovered {
            self.cache.insert(key, rendered.clone());
        }
        rendered
    }

    /// Underlying renderer
    #[inline]
    #[must_use]
    pub fn renderer(&self) -> &SafeContentRenderer<S> {
        &self.renderer
    }

    /// Drop every cached render
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.cache.run_pending_tasks();
        MemoStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

impl<S> fmt::Debug for MemoizedRenderer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedRenderer")
            .field("renderer", &self.renderer)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

/// Compute the cache key for a payload and its options
#[must_use]
pub fn render_key(payload: &ContentPayload, options: &RenderOptions) -> RenderKey {
    let mut hasher = blake3::Hasher::new();

    hasher.update(&[u8::from(payload.is_trusted_html)]);
    hash_optional(&mut hasher, payload.raw_value.as_deref());
    hash_optional(&mut hasher, payload.encoding_error());

    hasher.update(&(options.allowed_tags.len() as u64).to_le_bytes());
    for tag in &options.allowed_tags {
        hash_str(&mut hasher, tag);
    }
    hasher.update(&(options.allowed_attributes.len() as u64).to_le_bytes());
    for attribute in &options.allowed_attributes {
        hash_str(&mut hasher, attribute);
    }
    hash_str(&mut hasher, &options.fallback_text);
    hash_optional(&mut hasher, options.aria_label.as_deref());
    hasher.update(&(options.max_input_bytes as u64).to_le_bytes());

    *hasher.finalize().as_bytes()
}

fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn hash_optional(hasher: &mut blake3::Hasher, value: Option<&str>) {
    match value {
        Some(value) => {
            hasher.update(&[1]);
            hash_str(hasher, value);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}
