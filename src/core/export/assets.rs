//! Asset externalization
//!
//! Embedded raster images are decoded and written under
//! `<workspace>/assets/<assetId>/<filename>`; their `data` is rewritten to the
//! public URL. Other kinds pass through untouched and are reported as
//! unresolved.

use super::feedback::Feedback;
use super::workspace::JobWorkspace;
use crate::domain::ids::is_path_segment;
use crate::domain::{Asset, AssetId, AssetMap, FeedbackEvent, FolioError, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Standard alphabet, padding optional
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Outcome for one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetResolution {
    /// Written to disk and referenced by URL
    Resolved {
        url: String,
        /// Workspace-relative path of the written file
        path: PathBuf,
    },
    /// Kind not handled, reference left as loaded
    PassThrough,
}

impl AssetResolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, AssetResolution::Resolved { .. })
    }
}

/// Result of externalizing an asset map
#[derive(Debug, Clone, Default)]
pub struct ExternalizedAssets {
    /// Assets with rewritten references, same keys as the input
    pub assets: AssetMap,
    pub resolutions: BTreeMap<AssetId, AssetResolution>,
}

impl ExternalizedAssets {
    pub fn resolved_count(&self) -> usize {
        self.resolutions.values().filter(|r| r.is_resolved()).count()
    }

    /// Ids left unresolved, in id order
    pub fn passed_through(&self) -> Vec<AssetId> {
        self.resolutions
            .iter()
            .filter(|(_, r)| !r.is_resolved())
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Writes embedded asset payloads into a job workspace
#[derive(Debug, Clone)]
pub struct AssetExternalizer {
    url_prefix: String,
    concurrency: usize,
}

impl AssetExternalizer {
    /// Creates an externalizer
    ///
    /// `url_prefix` is prepended to every rewritten URL. `concurrency` bounds
    /// the number of simultaneous writes (minimum 1).
    pub fn new(url_prefix: impl Into<String>, concurrency: usize) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Public URL of an externalized asset
    pub fn asset_url(&self, id: &AssetId, filename: &str) -> String {
        format!("{}/assets/{}/{}", self.url_prefix, id, filename)
    }

    /// Externalizes every asset
    ///
    /// Emits one `packing asset` feedback event per asset, in id order.
    ///
    /// # Errors
    ///
    /// The first failing asset aborts the batch:
    /// - [`FolioError::Validation`] for a key/id mismatch, an unsafe filename,
    ///   or a payload that is not base64 text
    /// - [`FolioError::Io`] when a file cannot be written
    pub(crate) async fn externalize(
        &self,
        workspace: &JobWorkspace,
        assets: AssetMap,
        feedback: &Feedback,
    ) -> Result<ExternalizedAssets> {
        let total = assets.len();
        let mut results = stream::iter(assets)
            .map(|(key, asset)| async move {
                let (asset, resolution) = self.externalize_one(workspace, &key, asset).await?;
                Ok::<_, FolioError>((key, asset, resolution))
            })
            .buffered(self.concurrency);

        let mut output = ExternalizedAssets::default();
        let mut index = 0;
        while let Some(result) = results.next().await {
            let (key, asset, resolution) = result?;
            feedback.emit(
                FeedbackEvent::info("packing asset")
                    .with_payload(json!({"currentIndex": index, "totalIndex": total})),
            );
            output.assets.insert(key.clone(), asset);
            output.resolutions.insert(key, resolution);
            index += 1;
        }

        Ok(output)
    }

    async fn externalize_one(
        &self,
        workspace: &JobWorkspace,
        key: &AssetId,
        mut asset: Asset,
    ) -> Result<(Asset, AssetResolution)> {
        if &asset.id != key {
            return Err(FolioError::Validation(format!(
                "asset stored under '{key}' declares id '{}'",
                asset.id
            )));
        }

        let kind = asset.kind();
        let Some(prefix) = kind.data_uri_prefix() else {
            tracing::debug!(
                asset_id = %key,
                mimetype = %asset.mimetype,
                "Asset kind not externalized, passing through"
            );
            return Ok((asset, AssetResolution::PassThrough));
        };

        if !is_path_segment(&asset.filename) {
            return Err(FolioError::Validation(format!(
                "asset '{key}' has an unsafe filename '{}'",
                asset.filename
            )));
        }

        let bytes = decode_payload(&asset.data, &prefix)
            .map_err(|e| FolioError::Validation(format!("asset '{key}': {e}")))?;

        let relative = Path::new("assets").join(key.as_str()).join(&asset.filename);
        workspace.write_file(&relative, &bytes).await?;

        let url = self.asset_url(key, &asset.filename);
        tracing::debug!(asset_id = %key, url = %url, bytes = bytes.len(), "Externalized asset");
        asset.data = Value::String(url.clone());

        Ok((
            asset,
            AssetResolution::Resolved {
                url,
                path: relative,
            },
        ))
    }
}

/// Strips the data-URI prefix, when present, and decodes the base64 remainder
///
/// Whitespace anywhere in the payload is ignored and padding is optional.
fn decode_payload(data: &Value, prefix: &str) -> std::result::Result<Vec<u8>, String> {
    let payload = data
        .as_str()
        .ok_or_else(|| "payload is not an encoded string".to_string())?;
    let encoded: String = payload
        .strip_prefix(prefix)
        .unwrap_or(payload)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    LENIENT_BASE64
        .decode(encoded)
        .map_err(|e| format!("invalid base64 payload: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedbackKind;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use test_case::test_case;

    fn image(id: &str, filename: &str, mimetype: &str, data: &str) -> (AssetId, Asset) {
        let asset_id = AssetId::new(id).unwrap();
        let asset = Asset::new(asset_id.clone(), filename, mimetype, json!(data));
        (asset_id, asset)
    }

    #[test]
    fn test_decode_payload_strips_prefix() {
        let bytes = decode_payload(&json!("data:image/png;base64,aGVsbG8="), "data:image/png;base64,")
            .unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_payload_without_prefix() {
        let bytes = decode_payload(&json!("aGVsbG8="), "data:image/png;base64,").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test_case("aGVsbG8" ; "missing padding")]
    #[test_case("aGVs\nbG8=\n" ; "line breaks")]
    #[test_case(" aGVs bG8= " ; "spaces")]
    fn test_decode_payload_is_lenient(encoded: &str) {
        let bytes = decode_payload(&json!(encoded), "data:image/png;base64,").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_payload_rejects_garbage() {
        assert!(decode_payload(&json!("@@not base64@@"), "data:image/png;base64,").is_err());
    }

    #[test]
    fn test_decode_payload_rejects_non_string() {
        assert!(decode_payload(&json!({"ref": 1}), "data:image/png;base64,").is_err());
    }

    #[tokio::test]
    async fn test_externalizes_images_and_passes_through_others() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let assets: AssetMap = [
            image("a1", "pic.png", "image/png", "data:image/png;base64,aGVsbG8="),
            image("b2", "photo.jpg", "image/jpeg", "data:image/jpeg;base64,d29ybGQ="),
            image("v1", "clip.mp4", "video/mp4", "https://cdn.example.org/clip.mp4"),
        ]
        .into_iter()
        .collect();

        let externalizer = AssetExternalizer::new("", 2);
        let output = externalizer
            .externalize(&workspace, assets, &Feedback::default())
            .await
            .unwrap();

        let a1 = AssetId::new("a1").unwrap();
        let v1 = AssetId::new("v1").unwrap();
        assert_eq!(output.assets[&a1].data, json!("/assets/a1/pic.png"));
        assert_eq!(output.assets[&a1].mimetype, "image/png");
        assert_eq!(
            std::fs::read(workspace.join("assets/a1/pic.png")).unwrap(),
            b"hello"
        );
        assert_eq!(
            std::fs::read(workspace.join("assets/b2/photo.jpg")).unwrap(),
            b"world"
        );
        assert_eq!(
            output.assets[&v1].data,
            json!("https://cdn.example.org/clip.mp4")
        );
        assert_eq!(output.resolutions[&v1], AssetResolution::PassThrough);
        assert_eq!(output.resolved_count(), 2);
        assert_eq!(output.passed_through(), vec![v1]);
    }

    #[tokio::test]
    async fn test_url_prefix_applied() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let assets: AssetMap = [image("a1", "pic.gif", "image/gif", "R0lG")]
            .into_iter()
            .collect();

        let output = AssetExternalizer::new("/press", 1)
            .externalize(&workspace, assets, &Feedback::default())
            .await
            .unwrap();

        let a1 = AssetId::new("a1").unwrap();
        assert_eq!(output.assets[&a1].data, json!("/press/assets/a1/pic.gif"));
    }

    #[tokio::test]
    async fn test_mismatched_key_rejected() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let (_, asset) = image("a1", "pic.png", "image/png", "aGVsbG8=");
        let mut assets = AssetMap::new();
        assets.insert(AssetId::new("other").unwrap(), asset);

        let err = AssetExternalizer::new("", 1)
            .externalize(&workspace, assets, &Feedback::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unsafe_filename_rejected() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let assets: AssetMap = [image("a1", "../escape.png", "image/png", "aGVsbG8=")]
            .into_iter()
            .collect();

        let err = AssetExternalizer::new("", 1)
            .externalize(&workspace, assets, &Feedback::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::Validation(_)));
        assert!(!root.path().join("escape.png").exists());
    }

    #[tokio::test]
    async fn test_packing_feedback_per_asset() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let assets: AssetMap = [
            image("a1", "pic.png", "image/png", "aGVsbG8="),
            image("a2", "pic.png", "image/png", "aGVsbG8="),
        ]
        .into_iter()
        .collect();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = events.clone();
        let feedback = Feedback::new(Some(Arc::new(move |event: &FeedbackEvent| {
            sink_events.lock().unwrap().push(event.clone());
        })));

        AssetExternalizer::new("", 4)
            .externalize(&workspace, assets, &feedback)
            .await
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == FeedbackKind::Info));
        assert_eq!(
            events[1].payload,
            Some(json!({"currentIndex": 1, "totalIndex": 2}))
        );
    }
}
