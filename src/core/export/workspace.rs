//! Per-job temporary workspace

use crate::domain::{FolioError, JobId, Result};
use std::path::{Path, PathBuf};

/// A uniquely named directory holding one export job's staged output
///
/// The path is `<temp_root>/<job_id>`. Every stage writes inside it; only the
/// final archive is written elsewhere.
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    job_id: JobId,
    path: PathBuf,
}

impl JobWorkspace {
    /// Generates a fresh job id and creates its directory tree
    ///
    /// Creating an already existing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Io`] if the directory cannot be created.
    pub async fn create(temp_root: impl AsRef<Path>) -> Result<Self> {
        let job_id = JobId::generate();
        let path = temp_root.as_ref().join(job_id.to_string());

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| FolioError::io_at(&path, e))?;

        tracing::debug!(job_id = %job_id, path = %path.display(), "Created job workspace");

        Ok(Self { job_id, path })
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Workspace root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Joins a workspace-relative path
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// Writes a file at a workspace-relative path, creating parent directories
    pub async fn write_file(&self, relative: impl AsRef<Path>, contents: &[u8]) -> Result<PathBuf> {
        let target = self.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FolioError::io_at(parent, e))?;
        }
        tokio::fs::write(&target, contents)
            .await
            .map_err(|e| FolioError::io_at(&target, e))?;
        Ok(target)
    }

    /// Deletes the whole subtree
    ///
    /// A workspace that is already gone counts as removed.
    pub async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {
                tracing::debug!(job_id = %self.job_id, "Removed job workspace");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FolioError::io_at(&self.path, e)),
        }
    }

    /// Removes the workspace on a background task
    ///
    /// Failures are logged, never returned.
    pub fn spawn_remove(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.remove().await {
                tracing::warn!(job_id = %self.job_id, error = %e, "Failed to remove job workspace");
            }
        })
    }
}
