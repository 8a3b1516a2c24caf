//! Named content branches selectable by a gate

use crate::error::GateError;
use crate::resolution::{ResolutionStatus, VariantResolution};
use std::collections::BTreeMap;

/// Branches a gate can render, with a guaranteed control branch
///
/// Loading and fallback branches default to the control branch when not
/// set explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSet<B> {
    control_key: String,
    control: B,
    variants: BTreeMap<String, B>,
    loading: Option<B>,
    fallback: Option<B>,
}

impl<B> BranchSet<B> {
    /// Build from named branches
    ///
    /// # Errors
    /// `GateError::MissingControlBranch` if `control_key` names no branch
    pub fn new<I, K>(control_key: impl Into<String>, branches: I) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = (K, B)>,
        K: Into<String>,
    {
        let control_key = control_key.into();
        let mut variants: BTreeMap<String, B> = branches
            .into_iter()
            .map(|(key, branch)| (key.into(), branch))
            .collect();

        let control = variants
            .remove(&control_key)
            .ok_or_else(|| GateError::MissingControlBranch(control_key.clone()))?;

        Ok(Self {
            control_key,
            control,
            variants,
            loading: None,
            fallback: None,
        })
    }

    /// With branch shown while pending
    #[inline]
    #[must_use]
    pub fn with_loading(mut self, branch: B) -> Self {
        self.loading = Some(branch);
        self
    }

    /// With branch shown after a failure
    #[inline]
    #[must_use]
    pub fn with_fallback(mut self, branch: B) -> Self {
        self.fallback = Some(branch);
        self
    }

    /// Key of the control branch
    #[inline]
    #[must_use]
    pub fn control_key(&self) -> &str {
        &self.control_key
    }

    /// Check if a label names a branch
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        key == self.control_key || self.variants.contains_key(key)
    }

    /// Branch by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&B> {
        if key == self.control_key {
            Some(&self.control)
        } else {
            self.variants.get(key)
        }
    }

    /// Control branch
    #[inline]
    #[must_use]
    pub fn control(&self) -> &B {
        &self.control
    }

    /// Branch shown while pending
    #[inline]
    #[must_use]
    pub fn loading(&self) -> &B {
        self.loading.as_ref().unwrap_or(&self.control)
    }

    /// Branch shown after a failure
    #[inline]
    #[must_use]
    pub fn fallback(&self) -> &B {
        self.fallback.as_ref().unwrap_or(&self.control)
    }

    /// All selectable keys, control first
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.control_key.as_str()).chain(self.variants.keys().map(String::as_str))
    }

    /// Number of selectable branches
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len() + 1
    }

    /// Always false: the control branch exists
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Branch to render for a resolution snapshot
    ///
    /// A resolved label that names no branch renders the control branch.
    #[must_use]
    pub fn select(&self, resolution: &VariantResolution) -> &B {
        match resolution.status() {
            ResolutionStatus::Pending => self.loading(),
            ResolutionStatus::Failed => self.fallback(),
            ResolutionStatus::Resolved => resolution
                .variant()
                .and_then(|key| self.get(key))
                .unwrap_or(&self.control),
        }
    }
}
