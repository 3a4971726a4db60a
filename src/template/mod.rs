//! Rendering templates
//!
//! Templates supply route discovery and markup; the export pipeline only
//! orchestrates them.
//!
//! - [`Template`] - the capability trait every template implements
//! - [`TemplateRegistry`] - id lookup (first match wins)
//! - [`BasicTemplate`] - the template shipped with Folio

pub mod basic;
pub mod registry;
pub mod traits;

pub use basic::{escape_html, BasicTemplate};
pub use registry::TemplateRegistry;
pub use traits::{HeadContext, NavContext, RenderContext, Template, TemplateMeta};
