//! Export command implementation
//!
//! This module implements the `export` command, which turns a production and
//! an edition (JSON files) into a static site archive using the built-in
//! templates.

use super::load_config_or_default;
use crate::adapters::assets::{AssetLoader, DirectoryAssetLoader, EmbeddedAssetLoader};
use crate::core::export::{ExportPipeline, ExportRequest, TracingFeedbackSink};
use crate::domain::{Edition, FolioError, Production};
use crate::template::TemplateRegistry;
use anyhow::Context;
use clap::Args;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Production JSON file
    #[arg(short, long)]
    pub production: PathBuf,

    /// Edition JSON file
    #[arg(short, long)]
    pub edition: PathBuf,

    /// Locale JSON file
    #[arg(long)]
    pub locale: Option<PathBuf>,

    /// Preprocessed data JSON file
    #[arg(long)]
    pub preprocessed: Option<PathBuf>,

    /// Directory holding `<assetId>/<filename>` asset files
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,

    /// Archive file to create
    #[arg(short, long)]
    pub output: PathBuf,

    /// Override the public base path
    #[arg(long)]
    pub url_prefix: Option<String>,

    /// Override the workspace root
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(prefix) = &self.url_prefix {
            tracing::info!(url_prefix = %prefix, "Overriding URL prefix from CLI");
            config.export.url_prefix = prefix.clone();
        }
        if let Some(temp_dir) = &self.temp_dir {
            tracing::info!(temp_dir = %temp_dir.display(), "Overriding temp dir from CLI");
            config.export.temp_dir = temp_dir.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let production: Production = read_json(&self.production)?;
        let edition: Edition = read_json(&self.edition)?;
        let mut request = ExportRequest::new(production, edition, &self.output);
        if let Some(path) = &self.locale {
            request = request.with_locale(read_json::<Value>(path)?);
        }
        if let Some(path) = &self.preprocessed {
            request = request.with_preprocessed_data(read_json::<Value>(path)?);
        }

        let loader: Arc<dyn AssetLoader> = match &self.assets_dir {
            Some(dir) => Arc::new(DirectoryAssetLoader::new(dir)),
            None => Arc::new(EmbeddedAssetLoader),
        };

        let pipeline =
            ExportPipeline::from_config(&config, Arc::new(TemplateRegistry::builtin()), loader)
                .with_feedback(Arc::new(TracingFeedbackSink));

        println!("🚀 Exporting to {}", self.output.display());

        let summary = match pipeline.run(request).await {
            Ok(summary) => summary,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(match e {
                    FolioError::Configuration(_) => 2,
                    _ => 5,
                });
            }
        };

        summary.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(0);
        }

        println!();
        println!("📊 Export Summary:");
        println!("  Template: {}", summary.template_id);
        println!(
            "  Assets: {} ({} externalized)",
            summary.assets_total, summary.assets_externalized
        );
        println!(
            "  Routes: {} ({} pages written)",
            summary.routes_rendered, summary.pages_written
        );
        println!("  Archive: {} bytes", summary.archive_bytes);
        println!("  SHA-256: {}", summary.archive_sha256);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if !summary.degraded_routes.is_empty() {
            println!("⚠️  Routes rendered with an empty body:");
            for route in &summary.degraded_routes {
                println!("  - {route}");
            }
            println!();
        }
        if summary.route_collisions > 0 {
            println!(
                "⚠️  {} route(s) overwritten by later routes with the same path",
                summary.route_collisions
            );
            println!();
        }

        println!("✅ Export completed successfully!");
        Ok(0)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
