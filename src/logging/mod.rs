//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON file output with daily or hourly rotation
//! - `RUST_LOG` overrides the configured level
//!
//! # Example
//!
//! ```no_run
//! use folio::logging::init_logging;
//! use folio::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export job
///
/// # Example
///
/// ```no_run
/// use folio::log_export_start;
/// use folio::domain::{JobId, TemplateId};
///
/// let job_id = JobId::generate();
/// let template_id = TemplateId::new("basic").unwrap();
/// log_export_start!(&job_id, &template_id);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($job_id:expr, $template_id:expr) => {
        tracing::info!(
            job_id = %$job_id,
            template_id = %$template_id,
            "Starting export"
        );
    };
}

/// Log the completion of an export job
///
/// # Example
///
/// ```no_run
/// use folio::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(12, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($routes:expr, $duration:expr) => {
        tracing::info!(
            routes = $routes,
            duration_ms = $duration.as_millis(),
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use folio::log_error_with_context;
/// use folio::domain::FolioError;
///
/// let error = FolioError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a pipeline stage transition
///
/// ```no_run
/// use folio::log_stage_transition;
///
/// log_stage_transition!("init", "workspace_ready");
/// ```
#[macro_export]
macro_rules! log_stage_transition {
    ($from:expr, $to:expr) => {
        tracing::debug!(from = %$from, to = %$to, "Export stage transition");
    };
}
