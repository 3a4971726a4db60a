//! Production domain model
//!
//! The production is the whole content graph being published. Folio only
//! looks at its asset map and title; every other field is carried through to
//! `production.json` untouched.

use super::asset::Asset;
use super::ids::AssetId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Asset map keyed by asset id, ordered for deterministic output
pub type AssetMap = BTreeMap<AssetId, Asset>;

/// A production (content graph)
///
/// Productions are never mutated by an export. [`Production::with_assets`]
/// builds the copy that carries externalized asset references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Production {
    /// Production identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Descriptive metadata (title, authors, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    /// Assets referenced by the production
    #[serde(default)]
    pub assets: AssetMap,

    /// Sections, resources, contextualizations and anything else
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Production {
    /// Returns a shallow copy with `assets` replaced
    pub fn with_assets(&self, assets: AssetMap) -> Self {
        Self {
            assets,
            ..self.clone()
        }
    }

    /// The production title, if set in metadata
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    /// Looks up a top-level collection such as `sections` or `resources`
    pub fn collection(&self, name: &str) -> Option<&Map<String, Value>> {
        self.extra.get(name).and_then(Value::as_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Production {
        serde_json::from_value(json!({
            "id": "prod-1",
            "metadata": {"title": "Collected Essays"},
            "assets": {
                "a1": {"id": "a1", "filename": "pic.png", "mimetype": "image/png", "data": "x"}
            },
            "sections": {"s1": {"metadata": {"title": "Intro"}}}
        }))
        .unwrap()
    }

    #[test]
    fn test_title_and_collections() {
        let production = sample();
        assert_eq!(production.title(), Some("Collected Essays"));
        assert_eq!(production.collection("sections").map(Map::len), Some(1));
        assert!(production.collection("resources").is_none());
    }

    #[test]
    fn test_with_assets_leaves_original_untouched() {
        let production = sample();
        let mut assets = production.assets.clone();
        let id = AssetId::new("a1").unwrap();
        if let Some(asset) = assets.get_mut(&id) {
            asset.data = json!("/assets/a1/pic.png");
        }

        let loaded = production.with_assets(assets);

        assert_eq!(production.assets[&id].data, json!("x"));
        assert_eq!(loaded.assets[&id].data, json!("/assets/a1/pic.png"));
        assert_eq!(loaded.extra, production.extra);
    }

    #[test]
    fn test_round_trip_preserves_unknown_fields() {
        let value = json!({
            "metadata": {"title": "T"},
            "assets": {},
            "resources": {"r1": {"kind": "bib"}},
            "contextualizations": {}
        });
        let production: Production = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&production).unwrap(), value);
    }

    #[test]
    fn test_missing_assets_defaults_to_empty() {
        let production: Production = serde_json::from_value(json!({})).unwrap();
        assert!(production.assets.is_empty());
        assert!(production.title().is_none());
    }
}
