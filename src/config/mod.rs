//! Configuration management for Folio.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Folio uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FOLIO_*` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use folio::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("folio.toml")?;
//!
//! println!("Jobs staged under: {}", config.export.temp_dir.display());
//! println!("Served under: '{}'", config.export.url_prefix);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ExportConfig`] - Workspace, URL prefix, bundles, concurrency, cleanup
//! - [`ClientConfig`] - Globals injected into every exported page
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! temp_dir = "./temp"
//! url_prefix = "/press"
//! templates_bundles_path = "./bundles"
//! cleanup = "await"
//!
//! [client.globals]
//! API_ROOT = "${FOLIO_API_ROOT}"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CleanupMode, ClientConfig, ExportConfig, FolioConfig, LoggingConfig,
};
