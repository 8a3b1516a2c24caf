//! Testing utilities for Scaffold Kit workspace
//!
//! Shared resolvers, sanitizers, hooks and fixtures.

#![allow(missing_docs)]

use parking_lot::Mutex;
use scaffold_content::{RenderOptions, SanitizeError, Sanitizer};
use scaffold_gate::{Assignment, BranchSet, ResolveError, VariantResolver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tokio::sync::watch;

static TRACING: Once = Once::new();

/// Install a test-friendly subscriber honoring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Branches from the `exp1` experiment: control `A`, variant `B`
pub fn message_branches() -> BranchSet<&'static str> {
    BranchSet::new("A", [("A", "Message A"), ("B", "Message B")])
        .expect("control branch present")
        .with_loading("Loading")
        .with_fallback("Fallback")
}

/// Resolver that answers only after [`ScriptedResolver::release`]
#[derive(Debug)]
pub struct ScriptedResolver {
    outcome: Result<Assignment, ResolveError>,
    released: watch::Sender<bool>,
    calls: AtomicUsize,
}

impl ScriptedResolver {
    pub fn new(outcome: Result<Assignment, ResolveError>) -> Arc<Self> {
        let (released, _) = watch::channel(false);
        Arc::new(Self {
            outcome,
            released,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn variant(label: &str) -> Arc<Self> {
        Self::new(Ok(Assignment::Variant(label.to_string())))
    }

    pub fn rejecting(reason: &str) -> Arc<Self> {
        Self::new(Err(ResolveError::Unavailable(reason.to_string())))
    }

    /// Let pending and future calls answer
    pub fn release(&self) {
        self.released.send_replace(true);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl VariantResolver for ScriptedResolver {
    async fn resolve(&self, _key: &str) -> Result<Assignment, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rx = self.released.subscribe();
        // sender lives in self, so the channel cannot close here
        let _ = rx.wait_for(|released| *released).await;
        self.outcome.clone()
    }
}

/// Records every value a hook is called with
#[derive(Debug)]
pub struct RecordingHook<E> {
    seen: Arc<Mutex<Vec<E>>>,
}

impl<E> Clone for RecordingHook<E> {
    fn clone(&self) -> Self {
        Self {
            seen: Arc::clone(&self.seen),
        }
    }
}

impl<E: Clone + Send + 'static> RecordingHook<E> {
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Closure suitable for `on_error` / `on_sanitize_error`
    pub fn hook(&self) -> impl Fn(&E) + Send + Sync + 'static {
        let seen = Arc::clone(&self.seen);
        move |value: &E| seen.lock().push(value.clone())
    }

    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn seen(&self) -> Vec<E> {
        self.seen.lock().clone()
    }
}

impl<E: Clone + Send + 'static> Default for RecordingHook<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitizer that always rejects
#[derive(Debug, Clone)]
pub struct FailingSanitizer(pub SanitizeError);

impl Sanitizer for FailingSanitizer {
    fn sanitize(&self, _html: &str, _options: &RenderOptions) -> Result<String, SanitizeError> {
        Err(self.0.clone())
    }
}

/// Counts calls before delegating to an inner sanitizer
#[derive(Debug, Default)]
pub struct CountingSanitizer<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S: Sanitizer> CountingSanitizer<S> {
    pub fn new(inner: S) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: Sanitizer> Sanitizer for CountingSanitizer<S> {
    fn sanitize(&self, html: &str, options: &RenderOptions) -> Result<String, SanitizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sanitize(html, options)
    }
}
