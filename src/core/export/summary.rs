//! Export summary and reporting
//!
//! This module defines the pipeline stage model and the summary returned by a
//! successful export.

use crate::domain::{AssetId, JobId, TemplateId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Pipeline stage
///
/// Stages advance strictly in declaration order. `Failed` is reachable from
/// any stage and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStage {
    Init,
    WorkspaceReady,
    AssetsLoaded,
    AssetsExternalized,
    MetadataWritten,
    TemplateCopied,
    RoutesRendered,
    Archived,
    Cleaned,
    Done,
    Failed,
}

impl ExportStage {
    /// The stage that follows this one on success
    pub fn next(self) -> Option<ExportStage> {
        use ExportStage::*;
        match self {
            Init => Some(WorkspaceReady),
            WorkspaceReady => Some(AssetsLoaded),
            AssetsLoaded => Some(AssetsExternalized),
            AssetsExternalized => Some(MetadataWritten),
            MetadataWritten => Some(TemplateCopied),
            TemplateCopied => Some(RoutesRendered),
            RoutesRendered => Some(Archived),
            Archived => Some(Cleaned),
            Cleaned => Some(Done),
            Done | Failed => None,
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, ExportStage::Done | ExportStage::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportStage::Init => "init",
            ExportStage::WorkspaceReady => "workspace_ready",
            ExportStage::AssetsLoaded => "assets_loaded",
            ExportStage::AssetsExternalized => "assets_externalized",
            ExportStage::MetadataWritten => "metadata_written",
            ExportStage::TemplateCopied => "template_copied",
            ExportStage::RoutesRendered => "routes_rendered",
            ExportStage::Archived => "archived",
            ExportStage::Cleaned => "cleaned",
            ExportStage::Done => "done",
            ExportStage::Failed => "failed",
        }
    }
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a successful export
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Job that produced the archive
    pub job_id: JobId,

    /// Template used for rendering
    pub template_id: TemplateId,

    /// Archive location
    pub output_path: PathBuf,

    /// Assets returned by the loader
    pub assets_total: usize,

    /// Assets written to disk and referenced by URL
    pub assets_externalized: usize,

    /// Assets of kinds that are not externalized, references left as loaded
    pub assets_passed_through: Vec<AssetId>,

    /// Routes enumerated and rendered
    pub routes_rendered: usize,

    /// `index.html` files written (routes minus collisions)
    pub pages_written: usize,

    /// Routes written with an empty body after a render failure
    pub degraded_routes: Vec<String>,

    /// Routes overwritten by a later route with the same folder
    pub route_collisions: usize,

    /// Hex SHA-256 of the archive
    pub archive_sha256: String,

    /// Archive size in bytes
    pub archive_bytes: u64,

    /// Last stage reached
    pub final_stage: ExportStage,

    /// Wall-clock start
    pub started_at: DateTime<Utc>,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new summary for a job
    pub fn new(
        job_id: JobId,
        template_id: TemplateId,
        output_path: PathBuf,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id,
            template_id,
            output_path,
            assets_total: 0,
            assets_externalized: 0,
            assets_passed_through: Vec::new(),
            routes_rendered: 0,
            pages_written: 0,
            degraded_routes: Vec::new(),
            route_collisions: 0,
            archive_sha256: String::new(),
            archive_bytes: 0,
            final_stage: ExportStage::Init,
            started_at,
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether every route rendered with a body and no route was overwritten
    pub fn is_clean(&self) -> bool {
        self.degraded_routes.is_empty() && self.route_collisions == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = %self.job_id,
            template_id = %self.template_id,
            output = %self.output_path.display(),
            assets_total = self.assets_total,
            assets_externalized = self.assets_externalized,
            routes = self.routes_rendered,
            pages = self.pages_written,
            archive_bytes = self.archive_bytes,
            archive_sha256 = %self.archive_sha256,
            duration_ms = self.duration.as_millis(),
            "Export summary"
        );

        if !self.assets_passed_through.is_empty() {
            tracing::info!(
                count = self.assets_passed_through.len(),
                "Assets left unresolved (kind not externalized)"
            );
        }
        if !self.degraded_routes.is_empty() {
            tracing::warn!(
                count = self.degraded_routes.len(),
                routes = ?self.degraded_routes,
                "Routes written with an empty body"
            );
        }
        if self.route_collisions > 0 {
            tracing::warn!(
                collisions = self.route_collisions,
                "Routes overwritten by later routes"
            );
        }
    }
}
