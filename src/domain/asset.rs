//! Asset domain model
//!
//! An asset is a binary resource referenced by a production (usually an image).
//! Before export its `data` holds whatever the loader produced, typically an
//! embedded `data:` URI. After externalization `data` holds a relative URL.

use super::ids::AssetId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mimetypes whose embedded base64 payload is written out as a file
pub const RASTER_IMAGE_MIMETYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/tiff",
];

/// A production asset
///
/// # Examples
///
/// ```
/// use folio::domain::asset::{Asset, AssetKind};
/// use folio::domain::ids::AssetId;
///
/// let asset = Asset::new(
///     AssetId::new("a1").unwrap(),
///     "pic.png",
///     "image/png",
///     serde_json::json!("data:image/png;base64,AAAA"),
/// );
/// assert!(matches!(asset.kind(), AssetKind::RasterImage { .. }));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// Unique identifier within the production
    pub id: AssetId,

    /// File name used when the asset is written to disk
    pub filename: String,

    /// Mimetype, preserved through externalization
    pub mimetype: String,

    /// Payload or reference; replaced by a URL once externalized
    #[serde(default)]
    pub data: Value,

    /// Any other fields carried by the production
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Asset {
    /// Creates a new asset
    pub fn new(
        id: AssetId,
        filename: impl Into<String>,
        mimetype: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            id,
            filename: filename.into(),
            mimetype: mimetype.into(),
            data,
            extra: Map::new(),
        }
    }

    /// Classifies the asset by mimetype
    pub fn kind(&self) -> AssetKind {
        AssetKind::classify(&self.mimetype)
    }
}

/// How an asset is handled during externalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    /// Embedded raster image, decoded and written to disk
    RasterImage {
        /// Mimetype suffix (`png`, `jpeg`, ...), used to strip the data-URI prefix
        subtype: String,
    },

    /// Any other kind: left untouched, reference stays unresolved
    PassThrough,
}

impl AssetKind {
    /// Classifies a mimetype by exact match against the recognized raster types
    pub fn classify(mimetype: &str) -> Self {
        if RASTER_IMAGE_MIMETYPES.contains(&mimetype) {
            let subtype = mimetype.rsplit('/').next().unwrap_or_default();
            AssetKind::RasterImage {
                subtype: subtype.to_string(),
            }
        } else {
            AssetKind::PassThrough
        }
    }

    /// The data-URI prefix stripped before base64 decoding, if any
    pub fn data_uri_prefix(&self) -> Option<String> {
        match self {
            AssetKind::RasterImage { subtype } => Some(format!("data:image/{subtype};base64,")),
            AssetKind::PassThrough => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("image/png", "png")]
    #[test_case("image/jpeg", "jpeg")]
    #[test_case("image/jpg", "jpg")]
    #[test_case("image/gif", "gif")]
    #[test_case("image/tiff", "tiff")]
    fn test_classify_raster_images(mimetype: &str, subtype: &str) {
        assert_eq!(
            AssetKind::classify(mimetype),
            AssetKind::RasterImage {
                subtype: subtype.to_string()
            }
        );
    }

    #[test_case("text/csv")]
    #[test_case("image/svg+xml")]
    #[test_case("application/json")]
    #[test_case("")]
    fn test_classify_pass_through(mimetype: &str) {
        assert_eq!(AssetKind::classify(mimetype), AssetKind::PassThrough);
    }

    #[test]
    fn test_data_uri_prefix() {
        let kind = AssetKind::classify("image/jpeg");
        assert_eq!(
            kind.data_uri_prefix().as_deref(),
            Some("data:image/jpeg;base64,")
        );
        assert_eq!(AssetKind::PassThrough.data_uri_prefix(), None);
    }

    #[test]
    fn test_asset_keeps_extra_fields() {
        let json = json!({
            "id": "a1",
            "filename": "pic.png",
            "mimetype": "image/png",
            "data": "data:image/png;base64,AAAA",
            "credits": "someone"
        });
        let asset: Asset = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(asset.extra.get("credits"), Some(&json!("someone")));
        assert_eq!(serde_json::to_value(&asset).unwrap(), json);
    }
}
