//! Domain models and types for Folio.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`AssetId`], [`TemplateId`], [`EditionId`], [`JobId`])
//! - **Domain models** ([`Production`], [`Edition`], [`Asset`], [`NavItem`])
//! - **Feedback events** ([`FeedbackEvent`])
//! - **Error types** ([`FolioError`], [`ArchiveError`], [`RenderError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes, so an asset id can't be passed where a template id
//! is expected:
//!
//! ```rust
//! use folio::domain::{AssetId, TemplateId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let asset_id = AssetId::new("a1")?;
//! let template_id = TemplateId::new("garlic")?;
//!
//! // let wrong: AssetId = template_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, FolioError>`]:
//!
//! ```rust,no_run
//! use folio::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = folio::config::load_config("folio.toml")?;
//!     Ok(())
//! }
//! ```

pub mod asset;
pub mod edition;
pub mod errors;
pub mod feedback;
pub mod ids;
pub mod nav;
pub mod production;
pub mod result;

// Re-export commonly used types for convenience
pub use asset::{Asset, AssetKind};
pub use edition::{Edition, EditionData, EditionMetadata, EditionStyle};
pub use errors::{ArchiveError, FolioError, RenderError};
pub use feedback::{FeedbackEvent, FeedbackKind};
pub use ids::{AssetId, EditionId, JobId, TemplateId};
pub use nav::NavItem;
pub use production::{AssetMap, Production};
pub use result::Result;
