//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Folio configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Temp Dir: {}", config.export.temp_dir.display());
        println!(
            "  URL Prefix: {}",
            if config.export.url_prefix.is_empty() {
                "(root)"
            } else {
                config.export.url_prefix.as_str()
            }
        );
        println!(
            "  Bundles Path: {}",
            config
                .export
                .templates_bundles_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(template-provided only)".to_string())
        );
        println!("  Max Concurrency: {}", config.export.max_concurrency);
        println!("  Compression Level: {}", config.export.compression_level);
        println!("  Cleanup: {:?}", config.export.cleanup);
        println!("  Client Globals: {:?}", config.client.globals.keys().collect::<Vec<_>>());
        println!();
        Ok(0)
    }
}
