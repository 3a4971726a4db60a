//! Zip archive creation from a job workspace

use crate::domain::ArchiveError;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// What was written to the archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub files: usize,
    pub directories: usize,
    /// Entries that vanished during the walk
    pub skipped: usize,
}

/// Streams a directory tree into a deflate-compressed zip file
///
/// Entry names are relative to the source directory and use `/` separators.
/// Entries are added in file-name order with a fixed timestamp, so the same
/// tree always produces the same archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveBuilder {
    compression_level: i32,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new(9)
    }
}

impl ArchiveBuilder {
    /// Creates a builder with a deflate level (0-9, clamped)
    pub fn new(compression_level: i32) -> Self {
        Self {
            compression_level: compression_level.clamp(0, 9),
        }
    }

    /// Archives `source` into `output`
    ///
    /// Runs on the blocking pool. Missing-entry warnings are logged and
    /// skipped; any other failure removes the partial output file.
    pub async fn build(&self, source: &Path, output: &Path) -> Result<ArchiveOutcome, ArchiveError> {
        let source = source.to_path_buf();
        let output_path = output.to_path_buf();
        let level = self.compression_level;

        let result = tokio::task::spawn_blocking(move || write_archive(&source, &output_path, level))
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))
            .and_then(|result| result);

        if result.is_err() {
            match tokio::fs::remove_file(output).await {
                Ok(()) => {
                    tracing::debug!(output = %output.display(), "Removed partial archive")
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    output = %output.display(),
                    error = %e,
                    "Failed to remove partial archive"
                ),
            }
        }

        result
    }
}

fn write_archive(source: &Path, output: &Path, level: i32) -> Result<ArchiveOutcome, ArchiveError> {
    if !source.is_dir() {
        return Err(ArchiveError::Walk(format!(
            "{} is not a directory",
            source.display()
        )));
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ArchiveError::Io(format!("{}: {}", parent.display(), e)))?;
    }
    let file = File::create(output)
        .map_err(|e| ArchiveError::Io(format!("{}: {}", output.display(), e)))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(level))
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut outcome = ArchiveOutcome::default();
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let not_found = e
                    .io_error()
                    .is_some_and(|io| io.kind() == io::ErrorKind::NotFound);
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                if not_found {
                    warn_skipped(&ArchiveError::EntryNotFound(path.display().to_string()));
                    outcome.skipped += 1;
                    continue;
                }
                return Err(ArchiveError::Walk(e.to_string()));
            }
        };

        let name = entry_name(source, entry.path())?;
        if entry.file_type().is_dir() {
            writer.add_directory(name, options.unix_permissions(0o755))?;
            outcome.directories += 1;
            continue;
        }

        match add_file(&mut writer, entry.path(), &name, options) {
            Ok(()) => outcome.files += 1,
            Err(e) if e.is_warning() => {
                warn_skipped(&e);
                outcome.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let mut inner = writer.finish()?;
    io::Write::flush(&mut inner).map_err(|e| ArchiveError::Io(e.to_string()))?;

    Ok(outcome)
}

fn add_file<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
    options: FileOptions,
) -> Result<(), ArchiveError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ArchiveError::EntryNotFound(path.display().to_string()))
        }
        Err(e) => return Err(ArchiveError::Io(format!("{}: {}", path.display(), e))),
    };
    writer.start_file(name, options)?;
    io::copy(&mut file, writer).map_err(|e| ArchiveError::Io(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

/// Zip entry name for `path` relative to `root`, `/`-separated
fn entry_name(root: &Path, path: &Path) -> Result<String, ArchiveError> {
    let relative: PathBuf = path
        .strip_prefix(root)
        .map_err(|e| ArchiveError::Walk(e.to_string()))?
        .to_path_buf();
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn warn_skipped(warning: &ArchiveError) {
    tracing::warn!(warning = %warning, "Skipping archive entry");
}
