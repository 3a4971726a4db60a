//! Loader reading asset files from a local directory

use super::AssetLoader;
use crate::domain::ids::is_path_segment;
use crate::domain::{AssetKind, AssetMap, Edition, FolioError, Production, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads `<root>/<assetId>/<filename>` for every production asset
///
/// Raster images are encoded as `data:image/<subtype>;base64,` URIs, text and
/// JSON files are loaded as strings. Assets without a file on disk, and binary
/// files of any other kind, keep their inline data. Filenames must be a single
/// path segment.
#[derive(Debug, Clone)]
pub struct DirectoryAssetLoader {
    root: PathBuf,
}

impl DirectoryAssetLoader {
    /// Creates a loader rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Payload for the file's bytes, `None` when the inline data should stay
    fn encode(
        kind: &AssetKind,
        mimetype: &str,
        bytes: Vec<u8>,
    ) -> std::result::Result<Option<Value>, String> {
        if let Some(prefix) = kind.data_uri_prefix() {
            return Ok(Some(Value::String(format!("{prefix}{}", STANDARD.encode(bytes)))));
        }
        if mimetype == "application/json" {
            return serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| format!("invalid JSON: {e}"));
        }
        Ok(String::from_utf8(bytes).ok().map(Value::String))
    }
}

#[async_trait]
impl AssetLoader for DirectoryAssetLoader {
    async fn load_assets(&self, production: &Production, _edition: &Edition) -> Result<AssetMap> {
        let mut assets = production.assets.clone();

        for (asset_id, asset) in assets.iter_mut() {
            if !is_path_segment(&asset.filename) {
                return Err(FolioError::Validation(format!(
                    "asset '{asset_id}' has an unsafe filename '{}'",
                    asset.filename
                )));
            }
            let path = self.root.join(asset_id.as_str()).join(&asset.filename);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(
                        asset_id = %asset_id,
                        path = %path.display(),
                        "No asset file on disk, keeping inline data"
                    );
                    continue;
                }
                Err(e) => {
                    return Err(FolioError::AssetLoad(format!(
                        "failed to read {}: {}",
                        path.display(),
                        e
                    )))
                }
            };

            let encoded = Self::encode(&asset.kind(), &asset.mimetype, bytes).map_err(|e| {
                FolioError::AssetLoad(format!("asset '{asset_id}' ({}): {e}", path.display()))
            })?;
            match encoded {
                Some(data) => {
                    asset.data = data;
                    tracing::debug!(asset_id = %asset_id, mimetype = %asset.mimetype, "Loaded asset");
                }
                None => tracing::debug!(
                    asset_id = %asset_id,
                    mimetype = %asset.mimetype,
                    "Binary asset of an unhandled kind, keeping inline data"
                ),
            }
        }

        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetId, EditionId, TemplateId};
    use serde_json::json;
    use tempfile::TempDir;

    fn production() -> Production {
        serde_json::from_value(json!({
            "assets": {
                "a1": {"id": "a1", "filename": "pic.png", "mimetype": "image/png", "data": null},
                "t1": {"id": "t1", "filename": "table.csv", "mimetype": "text/csv", "data": null},
                "m1": {"id": "m1", "filename": "gone.gif", "mimetype": "image/gif", "data": "keep"}
            }
        }))
        .unwrap()
    }

    fn edition() -> Edition {
        Edition::new(
            EditionId::new("ed").unwrap(),
            TemplateId::new("basic").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_loads_and_encodes_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a1")).unwrap();
        std::fs::write(dir.path().join("a1/pic.png"), [0x89, b'P', b'N', b'G']).unwrap();
        std::fs::create_dir_all(dir.path().join("t1")).unwrap();
        std::fs::write(dir.path().join("t1/table.csv"), "a,b\n1,2\n").unwrap();

        let loader = DirectoryAssetLoader::new(dir.path());
        let assets = loader.load_assets(&production(), &edition()).await.unwrap();

        let a1 = &assets[&AssetId::new("a1").unwrap()];
        assert_eq!(a1.data, json!("data:image/png;base64,iVBORw=="));
        let t1 = &assets[&AssetId::new("t1").unwrap()];
        assert_eq!(t1.data, json!("a,b\n1,2\n"));
        let m1 = &assets[&AssetId::new("m1").unwrap()];
        assert_eq!(m1.data, json!("keep"));
    }

    #[tokio::test]
    async fn test_filename_outside_asset_dir_is_rejected() {
        let outer = TempDir::new().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "TOP-SECRET").unwrap();
        let root = outer.path().join("assets");
        std::fs::create_dir_all(root.join("t1")).unwrap();
        let production: Production = serde_json::from_value(json!({
            "assets": {
                "t1": {"id": "t1", "filename": "../../secret.txt", "mimetype": "text/plain"}
            }
        }))
        .unwrap();

        let loader = DirectoryAssetLoader::new(&root);
        let err = loader.load_assets(&production, &edition()).await.unwrap_err();
        assert!(matches!(err, FolioError::Validation(_)));
        assert!(!err.to_string().contains("TOP-SECRET"));
    }

    #[tokio::test]
    async fn test_binary_asset_of_other_kind_keeps_inline_data() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("p1")).unwrap();
        std::fs::write(dir.path().join("p1/doc.pdf"), [0x25, 0x50, 0xff, 0xfe, 0x00]).unwrap();
        let production: Production = serde_json::from_value(json!({
            "assets": {
                "p1": {
                    "id": "p1",
                    "filename": "doc.pdf",
                    "mimetype": "application/pdf",
                    "data": "https://cdn.example.org/doc.pdf"
                }
            }
        }))
        .unwrap();

        let loader = DirectoryAssetLoader::new(dir.path());
        let assets = loader.load_assets(&production, &edition()).await.unwrap();
        let p1 = &assets[&AssetId::new("p1").unwrap()];
        assert_eq!(p1.data, json!("https://cdn.example.org/doc.pdf"));
    }

    #[tokio::test]
    async fn test_invalid_json_asset_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("j1")).unwrap();
        std::fs::write(dir.path().join("j1/data.json"), "{not json").unwrap();
        let production: Production = serde_json::from_value(json!({
            "assets": {
                "j1": {"id": "j1", "filename": "data.json", "mimetype": "application/json"}
            }
        }))
        .unwrap();

        let loader = DirectoryAssetLoader::new(dir.path());
        let err = loader.load_assets(&production, &edition()).await.unwrap_err();
        assert!(matches!(err, FolioError::AssetLoad(_)));
        assert_eq!(err.to_string().matches("Asset loading error").count(), 1);
    }
}
