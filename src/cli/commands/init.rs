//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "folio.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Folio configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: folio validate-config");
                println!("  3. Run export: folio export -p production.json -e edition.json -o site.zip");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the default configuration with comments
    fn generate_config() -> String {
        r#"# Folio Configuration File
# Static site export for productions and editions

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[export]
# Each export job stages its files under <temp_dir>/<job id>
temp_dir = "./temp"

# Public base path the site is served under, without a trailing slash
# (e.g. "/press" or "https://example.org/press")
url_prefix = ""

# Directory holding <templateId>/bundle.js for templates that do not ship
# their client bundle in memory
# templates_bundles_path = "./bundles"

# Maximum simultaneous asset and page writes
max_concurrency = 4

# Deflate level for the archive (0-9)
compression_level = 9

# Workspace removal after success: "await" or "background"
cleanup = "await"

# Remove the workspace after a failed export
remove_workspace_on_failure = true

# Use an in-memory router on the client instead of the browser router
single_page = false

[client.globals]
# Injected into every page as `var NAME = "value";`
# API_ROOT = "${FOLIO_API_ROOT}"

[logging]
# JSON log files with rotation
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }
}
