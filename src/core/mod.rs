//! Core business logic for Folio.
//!
//! # Modules
//!
//! - [`export`] - Export stages and the pipeline that sequences them
//! - [`verification`] - Archive checksums
//!
//! # Export Workflow
//!
//! 1. **Workspace**: Create `<temp_dir>/<job id>`
//! 2. **Assets**: Load through the asset loader, externalize embedded images
//! 3. **Data**: Write `production.json`, `locale.json` and friends
//! 4. **Bundle**: Copy the template's client runtime
//! 5. **Render**: One `index.html` per route
//! 6. **Archive**: Zip the workspace to the output path
//! 7. **Cleanup**: Remove the workspace
//!
//! # Example
//!
//! ```rust,no_run
//! use folio::adapters::assets::EmbeddedAssetLoader;
//! use folio::config::load_config;
//! use folio::core::export::{ExportPipeline, ExportRequest};
//! use folio::domain::{Edition, Production};
//! use folio::template::TemplateRegistry;
//! use std::sync::Arc;
//!
//! # async fn example(production: Production, edition: Edition) -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("folio.toml")?;
//!
//! let pipeline = ExportPipeline::from_config(
//!     &config,
//!     Arc::new(TemplateRegistry::builtin()),
//!     Arc::new(EmbeddedAssetLoader),
//! );
//!
//! let summary = pipeline
//!     .run(ExportRequest::new(production, edition, "site.zip"))
//!     .await?;
//!
//! println!("Routes: {}", summary.routes_rendered);
//! println!("Archive: {} bytes", summary.archive_bytes);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod verification;
