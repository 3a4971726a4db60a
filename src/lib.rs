//! # Folio - static site export for productions
//!
//! Folio turns a structured "production" (a document/edition content graph)
//! into a self-contained static website archive: one HTML page per route,
//! externalized image assets, the client data files and runtime bundle, all
//! zipped and ready for hosting.
//!
//! ## Architecture
//!
//! Folio follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export stages and the pipeline that sequences them
//! - [`template`] - Pluggable rendering templates and their registry
//! - [`adapters`] - Asset loading
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::adapters::assets::EmbeddedAssetLoader;
//! use folio::config::FolioConfig;
//! use folio::core::export::{generate_output, ExportRequest};
//! use folio::domain::{Edition, Production};
//! use folio::template::TemplateRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let production: Production =
//!         serde_json::from_str(&std::fs::read_to_string("production.json")?)?;
//!     let edition: Edition = serde_json::from_str(&std::fs::read_to_string("edition.json")?)?;
//!
//!     let summary = generate_output(
//!         &FolioConfig::default(),
//!         Arc::new(TemplateRegistry::builtin()),
//!         Arc::new(EmbeddedAssetLoader),
//!         ExportRequest::new(production, edition, "site.zip"),
//!         None,
//!     )
//!     .await?;
//!
//!     println!("Rendered {} routes", summary.routes_rendered);
//!     Ok(())
//! }
//! ```
//!
//! ## Archive Layout
//!
//! ```text
//! /bundle.js
//! /production.json
//! /preprocessedData.json        (when provided)
//! /locale.json
//! /styles.css                   (when the template or edition has css)
//! /assets/<assetId>/<filename>
//! /<route path>/index.html
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::FolioError`]. The first fatal
//! error of an export is returned unchanged; a route whose body fails to
//! render is written with an empty body instead.
//!
//! ## Logging
//!
//! Folio uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(job_id = "…", "Starting export");
//! warn!(route = "/page", "Route output collision, last route wins");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod template;
