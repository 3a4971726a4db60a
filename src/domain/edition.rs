//! Edition domain model
//!
//! An edition is a named rendering configuration over a production. It picks
//! exactly one template through `metadata.templateId`.

use super::ids::{EditionId, TemplateId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A rendering configuration over a production
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edition {
    /// Edition identifier, exposed to the client as `__editionId`
    pub id: EditionId,

    /// Template selection and descriptive metadata
    pub metadata: EditionMetadata,

    /// Per-edition settings
    #[serde(default)]
    pub data: EditionData,

    /// Other edition fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edition {
    /// Creates a minimal edition selecting `template_id`
    pub fn new(id: EditionId, template_id: TemplateId) -> Self {
        Self {
            id,
            metadata: EditionMetadata {
                template_id,
                title: None,
                edition_type: None,
                extra: Map::new(),
            },
            data: EditionData::default(),
            extra: Map::new(),
        }
    }

    /// Id of the template this edition renders with
    pub fn template_id(&self) -> &TemplateId {
        &self.metadata.template_id
    }

    /// Edition-level custom css, if any
    pub fn custom_css(&self) -> Option<&str> {
        self.data
            .style
            .as_ref()
            .map(|style| style.css.as_str())
            .filter(|css| !css.trim().is_empty())
    }
}

/// Edition metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditionMetadata {
    /// Template used to render this edition
    pub template_id: TemplateId,

    /// Edition title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Edition type (`web`, `paged`, ...), lets templates pick a body component
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edition_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-edition settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditionData {
    /// Adds the third-party annotation script to every page
    #[serde(default)]
    pub allow_annotation: bool,

    /// Custom styling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EditionStyle>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Edition styling settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EditionStyle {
    /// Css appended after the template stylesheet
    #[serde(default)]
    pub css: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
