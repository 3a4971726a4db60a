//! Template capability trait
//!
//! A template is a bundle of capabilities the export pipeline consumes: route
//! discovery, URL mapping, head and body markup, and optionally a prebuilt
//! client bundle and stylesheet. Templates are selected by id at a single
//! registry lookup and then called through this trait only.

use crate::domain::{Edition, NavItem, Production, RenderError, TemplateId};
use serde_json::{Map, Value};

/// Descriptive template metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMeta {
    /// Identifier editions refer to in `metadata.templateId`
    pub id: TemplateId,

    /// Human-readable name
    pub name: String,

    /// Short description
    pub description: Option<String>,
}

impl TemplateMeta {
    /// Creates template metadata
    pub fn new(id: TemplateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Inputs to route discovery
#[derive(Debug, Clone, Copy)]
pub struct NavContext<'a> {
    /// Production as given by the caller (asset references unresolved)
    pub production: &'a Production,
    pub edition: &'a Edition,
    pub locale: &'a Value,
}

/// Inputs to the `<head>` renderer
#[derive(Debug, Clone, Copy)]
pub struct HeadContext<'a> {
    /// Production with externalized asset URLs
    pub production: &'a Production,
    pub edition: &'a Edition,
    pub item: &'a NavItem,
}

/// Inputs to the body renderer
///
/// Rendering is a synchronous, routing-context-only server render: no
/// network, no timers.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub view_id: &'a str,
    pub view_class: &'a str,
    pub view_params: &'a Map<String, Value>,
    /// Route being rendered, query suffix included
    pub location: &'a str,
    /// Public base path links must start with (no trailing `/`)
    pub url_prefix: &'a str,
    /// Production with externalized asset URLs
    pub production: &'a Production,
    pub edition: &'a Edition,
    pub locale: &'a Value,
    /// Shared contextualizer modules from the registry
    pub contextualizers: &'a Value,
    pub preprocessed_data: Option<&'a Value>,
    /// Styles are served from `styles.css`, not inlined
    pub exclude_css: bool,
    pub preview_mode: bool,
    pub static_render: bool,
}

/// A pluggable rendering template
///
/// # Example
///
/// ```
/// use folio::domain::{NavItem, RenderError, TemplateId};
/// use folio::template::{HeadContext, NavContext, RenderContext, Template, TemplateMeta};
///
/// struct Minimal {
///     meta: TemplateMeta,
/// }
///
/// impl Template for Minimal {
///     fn meta(&self) -> &TemplateMeta {
///         &self.meta
///     }
///
///     fn build_nav(&self, _ctx: &NavContext<'_>) -> Vec<NavItem> {
///         vec![NavItem::new("home", "landing")]
///     }
///
///     fn route_item_to_url(&self, _item: &NavItem, _index: usize) -> String {
///         "/".to_string()
///     }
///
///     fn render_head(&self, _ctx: &HeadContext<'_>) -> Result<String, RenderError> {
///         Ok("<title>Home</title>".to_string())
///     }
///
///     fn render_body(&self, _ctx: &RenderContext<'_>) -> Result<String, RenderError> {
///         Ok("<main>Hello</main>".to_string())
///     }
/// }
///
/// let template = Minimal {
///     meta: TemplateMeta::new(TemplateId::new("minimal").unwrap(), "Minimal"),
/// };
/// assert_eq!(template.id().as_str(), "minimal");
/// ```
pub trait Template: Send + Sync {
    /// Template metadata
    fn meta(&self) -> &TemplateMeta;

    /// Template id
    fn id(&self) -> &TemplateId {
        &self.meta().id
    }

    /// Semantic navigation entries for an edition
    fn build_nav(&self, ctx: &NavContext<'_>) -> Vec<NavItem>;

    /// Fixed extra routes appended after the edition's navigation
    fn additional_routes(&self) -> Vec<NavItem> {
        Vec::new()
    }

    /// Maps a nav item to its public URL
    ///
    /// `index` is the item's position in the concatenated route list and may be
    /// used to disambiguate.
    fn route_item_to_url(&self, item: &NavItem, index: usize) -> String;

    /// Renders the `<head>` tags for a route
    ///
    /// # Errors
    ///
    /// A head render error aborts the export.
    fn render_head(&self, ctx: &HeadContext<'_>) -> Result<String, RenderError>;

    /// Renders the body markup for a route
    ///
    /// # Errors
    ///
    /// A body render error is logged and the route is written with an empty body.
    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<String, RenderError>;

    /// Prebuilt client runtime, if the template ships one in memory
    fn client_bundle(&self) -> Option<&[u8]> {
        None
    }

    /// Template stylesheet
    fn stylesheet(&self) -> Option<&str> {
        None
    }
}
