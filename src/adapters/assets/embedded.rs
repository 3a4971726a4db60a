//! Loader for productions whose assets are already inline

use super::AssetLoader;
use crate::domain::{AssetMap, Edition, Production, Result};
use async_trait::async_trait;

/// Returns the production's asset map unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssetLoader;

#[async_trait]
impl AssetLoader for EmbeddedAssetLoader {
    async fn load_assets(&self, production: &Production, _edition: &Edition) -> Result<AssetMap> {
        tracing::debug!(count = production.assets.len(), "Using embedded assets");
        Ok(production.assets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EditionId, TemplateId};
    use serde_json::json;

    #[tokio::test]
    async fn test_returns_production_assets() {
        let production: Production = serde_json::from_value(json!({
            "assets": {
                "a1": {"id": "a1", "filename": "pic.png", "mimetype": "image/png", "data": "x"}
            }
        }))
        .unwrap();
        let edition = Edition::new(
            EditionId::new("ed").unwrap(),
            TemplateId::new("basic").unwrap(),
        );

        let assets = EmbeddedAssetLoader
            .load_assets(&production, &edition)
            .await
            .unwrap();
        assert_eq!(assets, production.assets);
    }
}
