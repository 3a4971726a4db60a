//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod init;
pub mod validate;

use crate::config::{load_config, parse_config, FolioConfig};
use crate::domain::Result;
use std::path::Path;

/// Loads the configuration file, falling back to defaults when it is absent
///
/// Defaults still go through `FOLIO_*` overrides and validation.
pub fn load_config_or_default(config_path: &str) -> Result<FolioConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)
    } else {
        tracing::debug!(config_path = %config_path, "No configuration file, using defaults");
        parse_config("")
    }
}
