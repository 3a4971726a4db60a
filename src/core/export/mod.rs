//! Export orchestration
//!
//! This module turns a production and an edition into a static site archive:
//! - [`JobWorkspace`] - per-job temporary directory
//! - [`AssetExternalizer`] - writes embedded assets and rewrites their URLs
//! - [`RouteEnumerator`] - lists the routes to render
//! - [`RouteRenderer`] - renders each route into `index.html`
//! - [`ArchiveBuilder`] - zips the workspace
//! - [`ExportPipeline`] - sequences the stages and reports progress

pub mod archive;
pub mod assets;
pub mod feedback;
pub mod html;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod summary;
pub mod workspace;

pub use archive::{ArchiveBuilder, ArchiveOutcome};
pub use assets::{AssetExternalizer, AssetResolution, ExternalizedAssets};
pub use feedback::{FeedbackSink, TracingFeedbackSink};
pub use html::{url_base_name, PageShell};
pub use pipeline::{generate_output, ExportPipeline, ExportRequest};
pub use render::{route_folder, RenderInputs, RenderReport, RouteRenderer};
pub use routes::RouteEnumerator;
pub use summary::{ExportStage, ExportSummary};
pub use workspace::JobWorkspace;
