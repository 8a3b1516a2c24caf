//! Scaffold Core
//!
//! Composes the content renderer, the variant gate and the repository
//! interface behind one configured facade.
//!
//! # Architecture
//!
//! ```text
//!                     ┌──────────────┐
//!   KitConfig ──────► │ ScaffoldKit  │
//!                     └──────┬───────┘
//!          ┌─────────────────┼──────────────────┐
//!          ▼                 ▼                  ▼
//!   ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//!   │ VariantGate │   │ Memoized    │   │ Repository   │
//!   │ (which)     │──►│ Renderer    │◄──│ (stored      │
//!   └─────────────┘   │ (how)       │   │  payloads)   │
//!                     └─────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use scaffold_core::prelude::*;
//! use scaffold_gate::StaticResolver;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), scaffold_core::KitError> {
//! let config = KitConfig::from_json_str(r#"{"render": {"fallback_text": "No content"}}"#)?;
//! let resolver = StaticResolver::new().with_variant("exp1", "B");
//! let kit = ScaffoldKit::from_config(config, Arc::new(resolver));
//!
//! let branches = BranchSet::new(
//!     "A",
//!     [
//!         ("A", ContentPayload::untrusted("Message A")),
//!         ("B", ContentPayload::untrusted("Message B")),
//!     ],
//! )?;
//! let gated = kit.mount("exp1", branches)?;
//! let out = gated.settled().await;
//! assert_eq!(out.html(), r#"<div role="region" aria-label="content">Message B</div>"#);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod gated;
pub mod kit;

pub use config::{KitConfig, DEFAULT_CACHE_CAPACITY};
pub use error::{KitError, KitResult};
pub use gated::GatedContent;
pub use kit::ScaffoldKit;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Scaffold Kit
    pub use crate::{GatedContent, KitConfig, KitError, ScaffoldKit};
    pub use scaffold_content::prelude::*;
    pub use scaffold_gate::prelude::*;
    pub use scaffold_store::{InMemoryRepository, RecordId, Repository};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
