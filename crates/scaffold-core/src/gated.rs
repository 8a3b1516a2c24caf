//! Gate in front of the content renderer

use scaffold_content::{
    AmmoniaSanitizer, ContentPayload, MemoizedRenderer, RenderOptions, RenderedContent, Sanitizer,
};
use scaffold_gate::{GateHandle, ResolutionStatus, VariantResolution};
use std::fmt;
use std::sync::Arc;

/// Experiment-gated content
///
/// The gate decides which payload is shown; the renderer decides how it is
/// shown. Every branch goes through the same sanitize-then-render path, so
/// a variant payload is never emitted unsanitized unless it is marked
/// trusted.
pub struct GatedContent<S = AmmoniaSanitizer> {
    handle: GateHandle<ContentPayload>,
    renderer: Arc<MemoizedRenderer<S>>,
    options: RenderOptions,
}

impl<S: Sanitizer + 'static> GatedContent<S> {
    pub(crate) fn new(
        handle: GateHandle<ContentPayload>,
        renderer: Arc<MemoizedRenderer<S>>,
        options: RenderOptions,
    ) -> Self {
        Self {
            handle,
            renderer,
            options,
        }
    }

    /// Render the branch selected by the current gate state
    #[must_use]
    pub fn render(&self) -> RenderedContent {
        self.renderer.render(self.handle.current(), &self.options)
    }

    /// Wait for the gate to settle and render the terminal branch
    pub async fn settled(&self) -> RenderedContent {
        let resolution = self.handle.settled().await;
        tracing::trace!(
            key = %self.handle.key(),
            status = ?resolution.status(),
            "gated content settled"
        );
        self.render()
    }

    /// Snapshot of the gate resolution
    #[inline]
    #[must_use]
    pub fn resolution(&self) -> VariantResolution {
        self.handle.resolution()
    }

    /// Current gate status
    #[inline]
    #[must_use]
    pub fn status(&self) -> ResolutionStatus {
        self.handle.status()
    }

    /// Underlying gate handle
    #[inline]
    #[must_use]
    pub fn handle(&self) -> &GateHandle<ContentPayload> {
        &self.handle
    }

    /// Options every branch is rendered with
    #[inline]
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Unmount the gate, discarding any in-flight resolution
    pub fn unmount(&mut self) {
        self.handle.unmount();
    }

    /// Resolve a different experiment key
    pub fn rekey(&mut self, key: impl Into<String>) {
        self.handle.rekey(key);
    }
}

impl<S> fmt::Debug for GatedContent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatedContent")
            .field("handle", &self.handle)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
