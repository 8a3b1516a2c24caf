//! Variant gate: one cancellable resolution per mount
//!
//! ```text
//!            mount / rekey
//!                 │
//!                 ▼
//!             ┌────────┐  resolver ok    ┌──────────┐
//!             │pending │ ──────────────► │ resolved │
//!             └────────┘                 └──────────┘
//!                 │ reject / timeout / panic
//!                 ▼
//!             ┌────────┐
//!             │ failed │ ── on_error (once)
//!             └────────┘
//! ```
//!
//! Every attempt carries the epoch it was started under. Unmount, rekey and
//! drop bump the epoch, so a result arriving afterwards is discarded without
//! touching state or calling hooks. The epoch is also published on a watch
//! channel so waiters in [`GateHandle::settled`] wake on cancellation.

use crate::branches::BranchSet;
use crate::config::GateConfig;
use crate::error::{GateError, ResolutionError};
use crate::resolution::{ResolutionStatus, VariantResolution};
use crate::resolver::VariantResolver;
use futures::FutureExt;
use parking_lot::Mutex;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Side channel for resolution failures
pub type ErrorHook = Arc<dyn Fn(&ResolutionError) + Send + Sync>;

/// Factory for gate mounts sharing a resolver, config and error hook
#[derive(Clone)]
pub struct VariantGate {
    resolver: Arc<dyn VariantResolver>,
    config: GateConfig,
    on_error: Option<ErrorHook>,
}

impl VariantGate {
    /// Create gate factory with default config
    #[must_use]
    pub fn new(resolver: Arc<dyn VariantResolver>) -> Self {
        Self {
            resolver,
            config: GateConfig::default(),
            on_error: None,
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the resolution failure hook
    #[must_use]
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResolutionError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Register an already shared hook
    #[must_use]
    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.on_error = Some(hook);
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Mount a gate and start its single resolution attempt
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// `GateError::NoRuntime` outside a runtime
    pub fn mount<B>(
        &self,
        key: impl Into<String>,
        branches: BranchSet<B>,
    ) -> Result<GateHandle<B>, GateError>
    where
        B: Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| GateError::NoRuntime)?;
        let (state, _) = watch::channel(VariantResolution::pending());
        let (epochs, _) = watch::channel(0);

        let mut handle = GateHandle {
            key: key.into(),
            branches: Arc::new(branches),
            shared: Arc::new(Shared {
                lifecycle: Mutex::new(Lifecycle {
                    epoch: 0,
                    mounted: false,
                }),
                state,
                epochs,
            }),
            gate: self.clone(),
            runtime,
            task: None,
        };
        handle.start();
        Ok(handle)
    }
}

impl fmt::Debug for VariantGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantGate")
            .field("config", &self.config)
            .field("has_error_hook", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Lifecycle {
    epoch: u64,
    mounted: bool,
}

struct Shared {
    lifecycle: Mutex<Lifecycle>,
    state: watch::Sender<VariantResolution>,
    /// Mirrors `Lifecycle::epoch`, written under the lifecycle lock
    epochs: watch::Sender<u64>,
}

/// One mounted gate
///
/// Dropping the handle unmounts it.
pub struct GateHandle<B> {
    key: String,
    branches: Arc<BranchSet<B>>,
    shared: Arc<Shared>,
    gate: VariantGate,
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl<B: Send + Sync + 'static> GateHandle<B> {
    /// Key being resolved
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Branches this gate selects from
    #[inline]
    #[must_use]
    pub fn branches(&self) -> &BranchSet<B> {
        &self.branches
    }

    /// Snapshot of the current resolution
    #[must_use]
    pub fn resolution(&self) -> VariantResolution {
        self.shared.state.borrow().clone()
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> ResolutionStatus {
        self.shared.state.borrow().status()
    }

    /// Branch to render right now
    #[must_use]
    pub fn current(&self) -> &B {
        let state = self.shared.state.borrow();
        self.branches.select(&state)
    }

    /// Check if the gate is still mounted
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.lifecycle.lock().mounted
    }

    /// Receiver observing every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<VariantResolution> {
        self.shared.state.subscribe()
    }

    /// Wait for the current attempt to reach a terminal state
    ///
    /// Returns the current snapshot right away when the gate is unmounted,
    /// and as soon as the attempt is cancelled, so a cancelled pending gate
    /// yields its pending snapshot. An attempt without a timeout whose
    /// resolver never answers never settles.
    pub async fn settled(&self) -> VariantResolution {
        let (mut state, mut epochs, attempt) = {
            let lifecycle = self.shared.lifecycle.lock();
            (
                self.shared.state.subscribe(),
                self.shared.epochs.subscribe(),
                lifecycle.mounted.then_some(lifecycle.epoch),
            )
        };
        let Some(attempt) = attempt else {
            return self.resolution();
        };

        tokio::select! {
            terminal = state.wait_for(VariantResolution::is_terminal) => {
                if let Ok(terminal) = terminal {
                    return terminal.clone();
                }
            }
            _ = epochs.wait_for(|epoch| *epoch != attempt) => {
                tracing::trace!(key = %self.key, epoch = attempt, "attempt cancelled before settling");
            }
        }
        self.resolution()
    }

    /// Unmount, discarding any in-flight result
    pub fn unmount(&mut self) {
        self.cancel();
        self.shared.lifecycle.lock().mounted = false;
        tracing::trace!(key = %self.key, "gate unmounted");
    }

    /// Resolve a different key, discarding any in-flight result
    ///
    /// Starts a fresh pending attempt. Rekeying to the key already being
    /// resolved by a mounted gate is a no-op.
    pub fn rekey(&mut self, key: impl Into<String>) {
        let key = key.into();
        if key == self.key && self.is_mounted() {
            return;
        }
        self.cancel();
        tracing::debug!(from = %self.key, to = %key, "gate rekeyed");
        self.key = key;
        self.start();
    }

    fn start(&mut self) {
        let epoch = {
            let mut lifecycle = self.shared.lifecycle.lock();
            lifecycle.epoch += 1;
            lifecycle.mounted = true;
            self.shared.epochs.send_replace(lifecycle.epoch);
            self.shared.state.send_replace(VariantResolution::pending());
            lifecycle.epoch
        };

        let attempt = Attempt {
            shared: Arc::clone(&self.shared),
            epoch,
            key: self.key.clone(),
            control_key: self.branches.control_key().to_string(),
            known_keys: self.branches.keys().map(str::to_string).collect(),
            gate: self.gate.clone(),
        };
        tracing::debug!(key = %self.key, epoch, "gate resolution started");
        self.task = Some(self.runtime.spawn(attempt.run()));
    }
}

impl<B> GateHandle<B> {
    fn cancel(&mut self) {
        {
            let mut lifecycle = self.shared.lifecycle.lock();
            lifecycle.epoch += 1;
            self.shared.epochs.send_replace(lifecycle.epoch);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<B> Drop for GateHandle<B> {
    fn drop(&mut self) {
        self.cancel();
        self.shared.lifecycle.lock().mounted = false;
    }
}

impl<B> fmt::Debug for GateHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateHandle")
            .field("key", &self.key)
            .field("resolution", &*self.shared.state.borrow())
            .finish_non_exhaustive()
    }
}

/// One resolution attempt, owned by its spawned task
struct Attempt {
    shared: Arc<Shared>,
    epoch: u64,
    key: String,
    control_key: String,
    known_keys: Vec<String>,
    gate: VariantGate,
}

impl Attempt {
    async fn run(self) {
        let outcome = self.resolve().await;
        self.settle(outcome);
    }

    async fn resolve(&self) -> Result<String, ResolutionError> {
        let call = AssertUnwindSafe(self.gate.resolver.resolve(&self.key)).catch_unwind();

        let joined = match self.gate.config.timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(joined) => joined,
                Err(_) => {
                    return Err(ResolutionError::TimedOut {
                        key: self.key.clone(),
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            },
            None => call.await,
        };

        match joined {
            Ok(Ok(assignment)) => Ok(assignment.into_label(&self.gate.config)),
            Ok(Err(e)) => Err(ResolutionError::rejected(&self.key, &e)),
            Err(_) => Err(ResolutionError::Panicked {
                key: self.key.clone(),
            }),
        }
    }

    /// Apply the outcome if this attempt is still current
    ///
    /// Returns whether state changed.
    fn settle(&self, outcome: Result<String, ResolutionError>) -> bool {
        let next = match outcome {
            Ok(label) if self.known_keys.iter().any(|k| *k == label) => {
                VariantResolution::resolved(label)
            }
            Ok(label) => {
                tracing::debug!(
                    key = %self.key,
                    label = %label,
                    control = %self.control_key,
                    "unrecognized variant, using control branch"
                );
                VariantResolution::resolved(self.control_key.clone())
            }
            Err(error) => VariantResolution::failed(error),
        };

        {
            let lifecycle = self.shared.lifecycle.lock();
            if lifecycle.epoch != self.epoch || !lifecycle.mounted {
                tracing::trace!(key = %self.key, epoch = self.epoch, "discarding stale resolution");
                return false;
            }
            let applied = self.shared.state.send_if_modified(|state| {
                if state.is_pending() {
                    *state = next.clone();
                    true
                } else {
                    false
                }
            });
            if !applied {
                return false;
            }
        }

        match next.error() {
            Some(error) => {
                tracing::warn!(key = %self.key, error = %error, "variant resolution failed, using fallback");
                if let Some(hook) = &self.gate.on_error {
                    hook(error);
                }
            }
            None => {
                tracing::debug!(key = %self.key, variant = next.variant(), "variant resolved");
            }
        }
        true
    }
}
