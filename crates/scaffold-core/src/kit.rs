//! Scaffold kit facade
//!
//! Owns one memoizing renderer and one gate factory, both configured from a
//! single [`KitConfig`].

use crate::config::KitConfig;
use crate::error::KitResult;
use crate::gated::GatedContent;
use scaffold_content::{
    AmmoniaSanitizer, ContentPayload, MemoStats, MemoizedRenderer, RenderOptions, RenderedContent,
    SafeContentRenderer, Sanitizer,
};
use scaffold_gate::{BranchSet, VariantGate, VariantResolver};
use scaffold_store::{RecordId, Repository};
use std::fmt;
use std::sync::Arc;

/// Entry point for rendering sanitized and gated content
pub struct ScaffoldKit<S = AmmoniaSanitizer> {
    config: KitConfig,
    renderer: Arc<MemoizedRenderer<S>>,
    gate: VariantGate,
}

impl ScaffoldKit<AmmoniaSanitizer> {
    /// Create kit with the ammonia renderer and no hooks
    #[must_use]
    pub fn from_config(config: KitConfig, resolver: Arc<dyn VariantResolver>) -> Self {
        Self::new(config, SafeContentRenderer::new(), VariantGate::new(resolver))
    }
}

impl<S: Sanitizer + 'static> ScaffoldKit<S> {
    /// Create kit from a configured renderer and gate factory
    ///
    /// The gate's configuration is replaced by `config.gate`; hooks
    /// registered on `renderer` and `gate` are kept.
    #[must_use]
    pub fn new(config: KitConfig, renderer: SafeContentRenderer<S>, gate: VariantGate) -> Self {
        tracing::info!(
            cache_capacity = config.cache_capacity,
            "scaffold kit created"
        );
        Self {
            renderer: Arc::new(MemoizedRenderer::new(renderer, config.cache_capacity)),
            gate: gate.with_config(config.gate.clone()),
            config,
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    /// Render payload with the configured options
    #[must_use]
    pub fn render(&self, payload: &ContentPayload) -> RenderedContent {
        self.renderer.render(payload, &self.config.render)
    }

    /// Render payload with per-call options
    #[must_use]
    pub fn render_with(&self, payload: &ContentPayload, options: &RenderOptions) -> RenderedContent {
        self.renderer.render(payload, options)
    }

    /// Mount a gate choosing between content payloads
    ///
    /// # Errors
    /// `KitError::Gate` when called outside a tokio runtime
    pub fn mount(
        &self,
        key: impl Into<String>,
        branches: BranchSet<ContentPayload>,
    ) -> KitResult<GatedContent<S>> {
        let handle = self.gate.mount(key, branches)?;
        Ok(GatedContent::new(
            handle,
            Arc::clone(&self.renderer),
            self.config.render.clone(),
        ))
    }

    /// Load a stored payload and render it
    ///
    /// # Errors
    /// `KitError::Store` if the record cannot be loaded
    pub async fn render_stored<R>(&self, repo: &R, id: RecordId) -> KitResult<RenderedContent>
    where
        R: Repository<ContentPayload> + ?Sized,
    {
        let record = repo.get(id).await?;
        tracing::debug!(%id, version = record.version, "rendering stored payload");
        Ok(self.render(&record.value))
    }

    /// Get render cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> MemoStats {
        self.renderer.stats()
    }

    /// Drop every memoized render
    pub fn invalidate_cache(&self) {
        self.renderer.invalidate_all();
    }
}

impl<S> fmt::Debug for ScaffoldKit<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaffoldKit")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
