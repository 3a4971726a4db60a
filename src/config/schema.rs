//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `folio.toml`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

static JS_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Main Folio configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FolioConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Values exposed to the exported site's client runtime
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FolioConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.client.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// When the job workspace is removed after a successful export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CleanupMode {
    /// Remove before the export returns
    #[default]
    Await,
    /// Spawn the removal and return immediately
    Background,
}

impl std::str::FromStr for CleanupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "await" => Ok(CleanupMode::Await),
            "background" => Ok(CleanupMode::Background),
            other => Err(format!(
                "Invalid cleanup mode '{other}'. Must be 'await' or 'background'"
            )),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root under which each job creates its workspace
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Public base path the site is served under (no trailing `/`)
    #[serde(default)]
    pub url_prefix: String,

    /// Directory holding `<templateId>/bundle.js` for templates without an
    /// in-memory bundle
    #[serde(default)]
    pub templates_bundles_path: Option<PathBuf>,

    /// Maximum concurrent asset/route writes
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Deflate level for the archive (0-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,

    /// Workspace cleanup after success
    #[serde(default)]
    pub cleanup: CleanupMode,

    /// Best-effort workspace removal after a fatal error
    #[serde(default = "default_true")]
    pub remove_workspace_on_failure: bool,

    /// Client uses an in-memory router instead of the browser router
    #[serde(default)]
    pub single_page: bool,
}

impl ExportConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.temp_dir.as_os_str().is_empty() {
            return Err("export.temp_dir cannot be empty".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("export.max_concurrency must be greater than 0".to_string());
        }
        if !(0..=9).contains(&self.compression_level) {
            return Err(format!(
                "export.compression_level must be between 0 and 9, got {}",
                self.compression_level
            ));
        }
        if self.url_prefix.ends_with('/') {
            return Err(format!(
                "export.url_prefix '{}' must not end with '/'",
                self.url_prefix
            ));
        }
        if self.url_prefix.contains(['?', '#', '"', '\'', '<', '>']) {
            return Err(format!(
                "export.url_prefix '{}' contains characters not allowed in a base path",
                self.url_prefix
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            url_prefix: String::new(),
            templates_bundles_path: None,
            max_concurrency: default_max_concurrency(),
            compression_level: default_compression_level(),
            cleanup: CleanupMode::default(),
            remove_workspace_on_failure: true,
            single_page: false,
        }
    }
}

/// Client runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// Emitted as `var NAME = "value";` in every page
    #[serde(default)]
    pub globals: BTreeMap<String, String>,
}

impl ClientConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        validate_client_globals(&self.globals)
    }
}

/// Checks that every global name is a JavaScript identifier
pub fn validate_client_globals(globals: &BTreeMap<String, String>) -> Result<(), String> {
    for name in globals.keys() {
        if !JS_IDENTIFIER.is_match(name) {
            return Err(format!(
                "Client global '{name}' is not a valid JavaScript identifier"
            ));
        }
    }
    Ok(())
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("./temp")
}

fn default_max_concurrency() -> usize {
    4
}

fn default_compression_level() -> i32 {
    9
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
