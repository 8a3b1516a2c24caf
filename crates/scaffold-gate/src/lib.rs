//! Scaffold Gate
//!
//! Asynchronously resolves an experiment or feature-flag key and selects
//! one of several content branches.
//!
//! # Lifecycle
//!
//! - Mounting starts exactly one resolution attempt
//! - The gate shows its loading branch while pending
//! - A known label renders that branch; an unknown label renders control
//! - Rejection, timeout or a resolver panic renders the fallback branch and
//!   calls `on_error` once, with no retry
//! - Unmount, rekey and drop discard any in-flight result
//!
//! # Example
//!
//! ```rust
//! use scaffold_gate::{BranchSet, StaticResolver, VariantGate};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), scaffold_gate::GateError> {
//! let resolver = StaticResolver::new().with_variant("exp1", "B");
//! let branches = BranchSet::new("A", [("A", "Message A"), ("B", "Message B")])?;
//!
//! let gate = VariantGate::new(Arc::new(resolver)).mount("exp1", branches)?;
//! gate.settled().await;
//! assert_eq!(*gate.current(), "Message B");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod branches;
pub mod config;
pub mod error;
pub mod gate;
pub mod resolution;
pub mod resolver;

pub use branches::BranchSet;
pub use config::GateConfig;
pub use error::{GateError, ResolutionError, ResolveError};
pub use gate::{ErrorHook, GateHandle, VariantGate};
pub use resolution::{ResolutionStatus, VariantResolution};
pub use resolver::{Assignment, StaticResolver, VariantResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for gating content
    pub use crate::{
        Assignment, BranchSet, GateConfig, GateHandle, ResolutionStatus, VariantGate,
        VariantResolution, VariantResolver,
    };
}
