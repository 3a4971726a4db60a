//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FolioConfig;
use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FolioConfig
/// 4. Applies environment variable overrides (FOLIO_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use folio::config::loader::load_config;
///
/// let config = load_config("folio.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FolioConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FolioError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FolioError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Applies the same substitution, overrides and validation as [`load_config`].
pub fn parse_config(contents: &str) -> Result<FolioConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: FolioConfig = toml::from_str(&contents)
        .map_err(|e| FolioError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        FolioError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in ENV_PLACEHOLDER.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FolioError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using FOLIO_* prefix
///
/// Environment variables follow the pattern: FOLIO_<SECTION>_<KEY>
/// For example: FOLIO_EXPORT_TEMP_DIR, FOLIO_EXPORT_URL_PREFIX
fn apply_env_overrides(config: &mut FolioConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("FOLIO_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("FOLIO_EXPORT_TEMP_DIR") {
        config.export.temp_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("FOLIO_EXPORT_URL_PREFIX") {
        config.export.url_prefix = val;
    }
    if let Ok(val) = std::env::var("FOLIO_EXPORT_TEMPLATES_BUNDLES_PATH") {
        config.export.templates_bundles_path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("FOLIO_EXPORT_MAX_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.export.max_concurrency = concurrency;
        }
    }
    if let Ok(val) = std::env::var("FOLIO_EXPORT_COMPRESSION_LEVEL") {
        if let Ok(level) = val.parse() {
            config.export.compression_level = level;
        }
    }
    if let Ok(val) = std::env::var("FOLIO_EXPORT_CLEANUP") {
        config.export.cleanup = val.parse().map_err(FolioError::Configuration)?;
    }
    if let Ok(val) = std::env::var("FOLIO_EXPORT_SINGLE_PAGE") {
        config.export.single_page = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("FOLIO_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("FOLIO_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("FOLIO_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
