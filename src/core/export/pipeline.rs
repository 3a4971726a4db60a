//! Export pipeline - orchestrates one production-to-archive export
//!
//! Stages run strictly in order, each awaited before the next starts:
//!
//! 1. Resolve the edition's template (before touching the filesystem)
//! 2. Create the job workspace
//! 3. Load assets through the [`AssetLoader`]
//! 4. Externalize embedded assets
//! 5. Write `production.json`, `preprocessedData.json`, `locale.json`, `styles.css`
//! 6. Copy the template's client bundle
//! 7. Enumerate and render routes
//! 8. Archive the workspace
//! 9. Remove the workspace
//!
//! The first fatal error aborts the remaining stages and is returned unchanged.

use super::archive::ArchiveBuilder;
use super::assets::AssetExternalizer;
use super::feedback::{Feedback, FeedbackSink};
use super::html::PageShell;
use super::render::{RenderInputs, RouteRenderer};
use super::routes::RouteEnumerator;
use super::summary::{ExportStage, ExportSummary};
use super::workspace::JobWorkspace;
use crate::adapters::assets::AssetLoader;
use crate::config::schema::validate_client_globals;
use crate::config::{CleanupMode, ExportConfig, FolioConfig};
use crate::core::verification::calculate_checksum_file;
use crate::domain::{Edition, FeedbackEvent, FolioError, Production, Result, TemplateId};
use crate::template::{NavContext, Template, TemplateRegistry};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Inputs of one export
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub production: Production,
    pub edition: Edition,
    pub locale: Value,
    pub preprocessed_data: Option<Value>,
    /// Archive file to create
    pub output_path: PathBuf,
}

impl ExportRequest {
    /// Creates a request with an empty locale and no preprocessed data
    pub fn new(production: Production, edition: Edition, output_path: impl Into<PathBuf>) -> Self {
        Self {
            production,
            edition,
            locale: json!({}),
            preprocessed_data: None,
            output_path: output_path.into(),
        }
    }

    pub fn with_locale(mut self, locale: Value) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_preprocessed_data(mut self, data: Value) -> Self {
        self.preprocessed_data = Some(data);
        self
    }
}

/// Tracks the current stage and logs transitions
#[derive(Debug)]
struct StageTracker {
    stage: ExportStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: ExportStage::Init,
        }
    }

    fn advance(&mut self, to: ExportStage) {
        debug_assert_eq!(self.stage.next(), Some(to), "stages advance in order");
        crate::log_stage_transition!(self.stage, to);
        self.stage = to;
    }

    fn fail(&mut self) {
        crate::log_stage_transition!(self.stage, ExportStage::Failed);
        self.stage = ExportStage::Failed;
    }
}

/// Export pipeline
///
/// Holds everything that does not change between exports: the template
/// registry, the asset loader, export settings and the optional feedback
/// sink. Each [`ExportPipeline::run`] owns a fresh workspace, so one pipeline
/// can run several exports concurrently.
///
/// # Example
///
/// ```rust,no_run
/// use folio::adapters::assets::EmbeddedAssetLoader;
/// use folio::config::ExportConfig;
/// use folio::core::export::{ExportPipeline, ExportRequest};
/// use folio::domain::{Edition, Production};
/// use folio::template::TemplateRegistry;
/// use std::sync::Arc;
///
/// # async fn example(production: Production, edition: Edition) -> folio::domain::Result<()> {
/// let pipeline = ExportPipeline::new(
///     Arc::new(TemplateRegistry::builtin()),
///     Arc::new(EmbeddedAssetLoader),
///     ExportConfig::default(),
/// );
///
/// let summary = pipeline
///     .run(ExportRequest::new(production, edition, "site.zip"))
///     .await?;
/// println!("{} routes, sha256 {}", summary.routes_rendered, summary.archive_sha256);
/// # Ok(())
/// # }
/// ```
pub struct ExportPipeline {
    registry: Arc<TemplateRegistry>,
    loader: Arc<dyn AssetLoader>,
    config: ExportConfig,
    client_globals: BTreeMap<String, String>,
    feedback: Feedback,
}

impl ExportPipeline {
    /// Create a new export pipeline
    pub fn new(
        registry: Arc<TemplateRegistry>,
        loader: Arc<dyn AssetLoader>,
        config: ExportConfig,
    ) -> Self {
        Self {
            registry,
            loader,
            config,
            client_globals: BTreeMap::new(),
            feedback: Feedback::default(),
        }
    }

    /// Create a pipeline from the full application configuration
    pub fn from_config(
        config: &FolioConfig,
        registry: Arc<TemplateRegistry>,
        loader: Arc<dyn AssetLoader>,
    ) -> Self {
        Self::new(registry, loader, config.export.clone())
            .with_client_globals(config.client.globals.clone())
    }

    /// Sets the progress sink
    pub fn with_feedback(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = Feedback::new(Some(sink));
        self
    }

    /// Sets the globals injected into every page
    pub fn with_client_globals(mut self, globals: BTreeMap<String, String>) -> Self {
        self.client_globals = globals;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Execute one export
    ///
    /// # Errors
    ///
    /// - [`FolioError::Precondition`] if no template matches the edition
    ///   (nothing is written)
    /// - [`FolioError::Configuration`] / [`FolioError::Validation`] for invalid
    ///   settings or output path (nothing is written)
    /// - Any fatal stage error, returned unchanged. The workspace is removed
    ///   best-effort when `remove_workspace_on_failure` is set.
    pub async fn run(&self, request: ExportRequest) -> Result<ExportSummary> {
        let started_at = Utc::now();
        let start = Instant::now();

        self.feedback.emit(FeedbackEvent::info("starting generation"));

        let template = self.registry.resolve(&request.edition)?;
        self.check_preconditions(&request)?;

        let mut tracker = StageTracker::new();
        let workspace = match JobWorkspace::create(&self.config.temp_dir).await {
            Ok(workspace) => workspace,
            Err(e) => {
                tracker.fail();
                crate::log_error_with_context!(&e, "Failed to create job workspace");
                return Err(e);
            }
        };
        tracker.advance(ExportStage::WorkspaceReady);
        crate::log_export_start!(workspace.job_id(), template.id());

        let mut summary = ExportSummary::new(
            *workspace.job_id(),
            template.id().clone(),
            request.output_path.clone(),
            started_at,
        );

        let outcome = self
            .run_stages(&workspace, &template, &request, &mut tracker, &mut summary)
            .await;

        if let Err(e) = outcome {
            tracker.fail();
            tracing::error!(
                job_id = %workspace.job_id(),
                error = %e,
                "Export failed"
            );
            if self.config.remove_workspace_on_failure {
                if let Err(cleanup_err) = workspace.remove().await {
                    tracing::warn!(
                        job_id = %workspace.job_id(),
                        error = %cleanup_err,
                        "Failed to remove workspace after failure"
                    );
                }
            }
            return Err(e);
        }

        self.feedback
            .emit(FeedbackEvent::info("cleaning temporary files"));
        self.cleanup(workspace).await;
        tracker.advance(ExportStage::Cleaned);
        tracker.advance(ExportStage::Done);

        summary.final_stage = tracker.stage;
        let summary = summary.with_duration(start.elapsed());
        crate::log_export_complete!(summary.routes_rendered, summary.duration);
        Ok(summary)
    }

    fn check_preconditions(&self, request: &ExportRequest) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| FolioError::Configuration(format!("Invalid export settings: {e}")))?;
        validate_client_globals(&self.client_globals).map_err(FolioError::Configuration)?;

        if request.output_path.as_os_str().is_empty() {
            return Err(FolioError::Validation("output path is empty".to_string()));
        }
        if request.output_path.is_dir() {
            return Err(FolioError::Validation(format!(
                "output path {} is a directory",
                request.output_path.display()
            )));
        }
        Ok(())
    }

    async fn run_stages(
        &self,
        workspace: &JobWorkspace,
        template: &Arc<dyn Template>,
        request: &ExportRequest,
        tracker: &mut StageTracker,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        let production = &request.production;
        let edition = &request.edition;

        // Assets
        self.feedback.emit(FeedbackEvent::info("loading assets"));
        let assets = self.loader.load_assets(production, edition).await?;
        summary.assets_total = assets.len();
        tracker.advance(ExportStage::AssetsLoaded);

        self.feedback.emit(FeedbackEvent::info("packing assets"));
        let externalized = AssetExternalizer::new(&self.config.url_prefix, self.config.max_concurrency)
            .externalize(workspace, assets, &self.feedback)
            .await?;
        summary.assets_externalized = externalized.resolved_count();
        summary.assets_passed_through = externalized.passed_through();
        let loaded_production = production.with_assets(externalized.assets);
        tracker.advance(ExportStage::AssetsExternalized);

        // Data files
        let has_stylesheet = self
            .write_metadata(workspace, template.as_ref(), &loaded_production, request)
            .await?;
        tracker.advance(ExportStage::MetadataWritten);

        // Client bundle
        self.feedback.emit(FeedbackEvent::info("loading template"));
        let bundle = self.client_bundle(template.as_ref()).await?;
        workspace.write_file("bundle.js", &bundle).await?;
        tracker.advance(ExportStage::TemplateCopied);

        // Routes
        self.feedback.emit(FeedbackEvent::info("building website"));
        let routes = RouteEnumerator::new(template.as_ref()).enumerate(&NavContext {
            production,
            edition,
            locale: &request.locale,
        });
        let shell = PageShell {
            url_prefix: self.config.url_prefix.clone(),
            edition_id: edition.id.to_string(),
            single_page: self.config.single_page,
            allow_annotation: edition.data.allow_annotation,
            has_stylesheet,
            has_preprocessed_data: request.preprocessed_data.is_some(),
            client_globals: self.client_globals.clone(),
        };
        let renderer = RouteRenderer::new(template.clone(), shell, self.config.max_concurrency);
        let report = renderer
            .render_all(
                workspace,
                &routes,
                &RenderInputs {
                    production: &loaded_production,
                    edition,
                    locale: &request.locale,
                    contextualizers: self.registry.contextualizers(),
                    preprocessed_data: request.preprocessed_data.as_ref(),
                },
            )
            .await?;
        summary.routes_rendered = routes.len();
        summary.pages_written = report.pages_written;
        summary.degraded_routes = report.degraded_routes;
        summary.route_collisions = report.route_collisions;
        tracker.advance(ExportStage::RoutesRendered);

        // Archive
        self.feedback.emit(FeedbackEvent::info("creating archive"));
        let archive = ArchiveBuilder::new(self.config.compression_level)
            .build(workspace.path(), &request.output_path)
            .await;
        match archive {
            Ok(outcome) => {
                tracing::debug!(
                    files = outcome.files,
                    directories = outcome.directories,
                    skipped = outcome.skipped,
                    "Archive written"
                );
                self.feedback.emit(FeedbackEvent::success("archive created"));
            }
            Err(e) => {
                self.feedback.emit(
                    FeedbackEvent::error("archive error").with_payload(json!({"error": e.to_string()})),
                );
                return Err(e.into());
            }
        }
        let (sha256, bytes) = calculate_checksum_file(&request.output_path).await?;
        summary.archive_sha256 = sha256;
        summary.archive_bytes = bytes;
        tracker.advance(ExportStage::Archived);

        Ok(())
    }

    /// Writes the JSON data files and the stylesheet
    ///
    /// Returns whether `styles.css` was written.
    async fn write_metadata(
        &self,
        workspace: &JobWorkspace,
        template: &dyn Template,
        loaded_production: &Production,
        request: &ExportRequest,
    ) -> Result<bool> {
        workspace
            .write_file("production.json", &serde_json::to_vec(loaded_production)?)
            .await?;

        if let Some(data) = &request.preprocessed_data {
            workspace
                .write_file("preprocessedData.json", &serde_json::to_vec(data)?)
                .await?;
        }

        workspace
            .write_file(
                "locale.json",
                serde_json::to_string_pretty(&request.locale)?.as_bytes(),
            )
            .await?;

        let styles = compose_styles(template.stylesheet(), request.edition.custom_css());
        if styles.is_empty() {
            return Ok(false);
        }
        workspace.write_file("styles.css", styles.as_bytes()).await?;
        Ok(true)
    }

    /// Template-provided bundle bytes, else `<bundles path>/<templateId>/bundle.js`
    async fn client_bundle(&self, template: &dyn Template) -> Result<Vec<u8>> {
        if let Some(bytes) = template.client_bundle() {
            return Ok(bytes.to_vec());
        }

        let path = bundle_path(self.config.templates_bundles_path.as_deref(), template.id())?;
        tokio::fs::read(&path).await.map_err(|e| {
            FolioError::Io(format!(
                "client bundle for template '{}' ({}): {}",
                template.id(),
                path.display(),
                e
            ))
        })
    }

    async fn cleanup(&self, workspace: JobWorkspace) {
        match self.config.cleanup {
            CleanupMode::Await => {
                if let Err(e) = workspace.remove().await {
                    tracing::warn!(
                        job_id = %workspace.job_id(),
                        error = %e,
                        "Failed to remove job workspace"
                    );
                }
            }
            CleanupMode::Background => {
                // Detached; the handle is not awaited
                drop(workspace.spawn_remove());
            }
        }
    }
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("client_globals", &self.client_globals)
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}

fn bundle_path(bundles_root: Option<&Path>, template_id: &TemplateId) -> Result<PathBuf> {
    let root = bundles_root.ok_or_else(|| {
        FolioError::Io(format!(
            "template '{template_id}' ships no client bundle and export.templates_bundles_path is not set"
        ))
    })?;
    if !template_id.is_path_safe() {
        return Err(FolioError::Validation(format!(
            "template id '{template_id}' cannot be used as a bundle directory"
        )));
    }
    Ok(root.join(template_id.as_str()).join("bundle.js"))
}

/// Template css followed by the edition's custom css
fn compose_styles(template_css: Option<&str>, edition_css: Option<&str>) -> String {
    [template_css, edition_css]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|css| !css.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Runs a single export with the given configuration
///
/// Convenience wrapper over [`ExportPipeline`] for callers that export once.
pub async fn generate_output(
    config: &FolioConfig,
    registry: Arc<TemplateRegistry>,
    loader: Arc<dyn AssetLoader>,
    request: ExportRequest,
    feedback: Option<Arc<dyn FeedbackSink>>,
) -> Result<ExportSummary> {
    let mut pipeline = ExportPipeline::from_config(config, registry, loader);
    if let Some(sink) = feedback {
        pipeline = pipeline.with_feedback(sink);
    }
    pipeline.run(request).await
}
