//! Template registry
//!
//! Holds the available templates plus the shared contextualizer modules that
//! every body render receives.

use super::basic::BasicTemplate;
use super::traits::Template;
use crate::domain::{Edition, FolioError, Result, TemplateId};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Id-keyed collection of templates
///
/// Lookup is by exact id match and the first registered match wins.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Arc<dyn Template>>,
    contextualizers: Value,
}

impl TemplateRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the templates shipped with Folio
    pub fn builtin() -> Self {
        Self::new().with_template(Arc::new(BasicTemplate::new()))
    }

    /// Adds a template
    pub fn with_template(mut self, template: Arc<dyn Template>) -> Self {
        self.register(template);
        self
    }

    /// Sets the shared contextualizer modules
    pub fn with_contextualizers(mut self, contextualizers: Value) -> Self {
        self.contextualizers = contextualizers;
        self
    }

    /// Adds a template
    pub fn register(&mut self, template: Arc<dyn Template>) {
        tracing::debug!(template_id = %template.id(), "Registered template");
        self.templates.push(template);
    }

    /// Finds a template by id
    pub fn find(&self, id: &TemplateId) -> Option<Arc<dyn Template>> {
        self.templates.iter().find(|t| t.id() == id).cloned()
    }

    /// Resolves the template an edition selects
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Precondition`] if no template has the edition's
    /// `metadata.templateId`.
    pub fn resolve(&self, edition: &Edition) -> Result<Arc<dyn Template>> {
        let template_id = edition.template_id();
        self.find(template_id).ok_or_else(|| {
            FolioError::Precondition(format!(
                "No template with id '{}' for edition '{}' (available: {})",
                template_id,
                edition.id,
                self.ids()
                    .iter()
                    .map(TemplateId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    /// Ids of all registered templates, in registration order
    pub fn ids(&self) -> Vec<TemplateId> {
        self.templates.iter().map(|t| t.id().clone()).collect()
    }

    /// Shared contextualizer modules
    pub fn contextualizers(&self) -> &Value {
        &self.contextualizers
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EditionId, NavItem, RenderError};
    use crate::template::{HeadContext, NavContext, RenderContext, TemplateMeta};

    struct Named {
        meta: TemplateMeta,
    }

    impl Named {
        fn new(id: &str, name: &str) -> Arc<dyn Template> {
            Arc::new(Self {
                meta: TemplateMeta::new(TemplateId::new(id).unwrap(), name),
            })
        }
    }

    impl Template for Named {
        fn meta(&self) -> &TemplateMeta {
            &self.meta
        }

        fn build_nav(&self, _ctx: &NavContext<'_>) -> Vec<NavItem> {
            Vec::new()
        }

        fn route_item_to_url(&self, _item: &NavItem, _index: usize) -> String {
            "/".to_string()
        }

        fn render_head(&self, _ctx: &HeadContext<'_>) -> std::result::Result<String, RenderError> {
            Ok(String::new())
        }

        fn render_body(&self, _ctx: &RenderContext<'_>) -> std::result::Result<String, RenderError> {
            Ok(String::new())
        }
    }

    fn edition(template_id: &str) -> Edition {
        Edition::new(
            EditionId::new("ed").unwrap(),
            TemplateId::new(template_id).unwrap(),
        )
    }

    #[test]
    fn test_resolve_exact_match() {
        let registry = TemplateRegistry::new()
            .with_template(Named::new("garlic", "Garlic"))
            .with_template(Named::new("pyrrah", "Pyrrah"));

        let template = registry.resolve(&edition("pyrrah")).unwrap();
        assert_eq!(template.meta().name, "Pyrrah");
    }

    #[test]
    fn test_first_match_wins() {
        let registry = TemplateRegistry::new()
            .with_template(Named::new("garlic", "First"))
            .with_template(Named::new("garlic", "Second"));

        let template = registry.resolve(&edition("garlic")).unwrap();
        assert_eq!(template.meta().name, "First");
    }

    #[test]
    fn test_missing_template_is_precondition_error() {
        let registry = TemplateRegistry::new().with_template(Named::new("garlic", "Garlic"));

        let err = registry.resolve(&edition("unknown")).err().unwrap();
        assert!(matches!(err, FolioError::Precondition(_)));
        assert!(err.to_string().contains("unknown"));
        assert!(err.to_string().contains("garlic"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = TemplateRegistry::new().with_template(Named::new("garlic", "Garlic"));
        assert!(registry.find(&TemplateId::new("Garlic").unwrap()).is_none());
    }

    #[test]
    fn test_builtin_registry() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.len(), 1);
        assert!(registry.find(&TemplateId::new("basic").unwrap()).is_some());
    }
}
