//! Route enumeration

use crate::domain::NavItem;
use crate::template::{NavContext, Template};

/// Derives the ordered list of routes to render for an edition
///
/// The template's navigation entries come first, followed by its fixed
/// additional routes. Each entry's `route` is then set by the template's URL
/// mapper, which receives the entry's position in the combined list.
#[derive(Clone, Copy)]
pub struct RouteEnumerator<'a> {
    template: &'a dyn Template,
}

impl<'a> RouteEnumerator<'a> {
    pub fn new(template: &'a dyn Template) -> Self {
        Self { template }
    }

    /// Enumerates routes in render order
    pub fn enumerate(&self, ctx: &NavContext<'_>) -> Vec<NavItem> {
        let nav = self.template.build_nav(ctx);
        let additional = self.template.additional_routes();
        tracing::debug!(
            template_id = %self.template.id(),
            nav = nav.len(),
            additional = additional.len(),
            "Enumerating routes"
        );

        nav.into_iter()
            .chain(additional)
            .enumerate()
            .map(|(index, mut item)| {
                item.route = self.template.route_item_to_url(&item, index);
                item
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Edition, EditionId, Production, RenderError, TemplateId};
    use crate::template::{HeadContext, RenderContext, TemplateMeta};
    use serde_json::json;

    struct Numbered {
        meta: TemplateMeta,
        nav: usize,
    }

    impl Template for Numbered {
        fn meta(&self) -> &TemplateMeta {
            &self.meta
        }

        fn build_nav(&self, _ctx: &NavContext<'_>) -> Vec<NavItem> {
            (0..self.nav)
                .map(|i| NavItem::new(format!("view-{i}"), "fragment"))
                .collect()
        }

        fn additional_routes(&self) -> Vec<NavItem> {
            vec![NavItem::new("glossary", "glossary")]
        }

        fn route_item_to_url(&self, item: &NavItem, index: usize) -> String {
            format!("/{}/{index}?view={}", item.route_class, item.view_id)
        }

        fn render_head(&self, _ctx: &HeadContext<'_>) -> Result<String, RenderError> {
            Ok(String::new())
        }

        fn render_body(&self, _ctx: &RenderContext<'_>) -> Result<String, RenderError> {
            Ok(String::new())
        }
    }

    fn template(nav: usize) -> Numbered {
        Numbered {
            meta: TemplateMeta::new(TemplateId::new("numbered").unwrap(), "Numbered"),
            nav,
        }
    }

    #[test]
    fn test_nav_then_additional_with_ordinals() {
        let template = template(2);
        let production = Production::default();
        let edition = Edition::new(
            EditionId::new("ed").unwrap(),
            TemplateId::new("numbered").unwrap(),
        );
        let locale = json!({});
        let ctx = NavContext {
            production: &production,
            edition: &edition,
            locale: &locale,
        };

        let routes = RouteEnumerator::new(&template).enumerate(&ctx);
        let urls: Vec<&str> = routes.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "/fragment/0?view=view-0",
                "/fragment/1?view=view-1",
                "/glossary/2?view=glossary",
            ]
        );
        assert_eq!(routes[2].path(), "/glossary/2");
    }

    #[test]
    fn test_no_routes() {
        struct Empty(TemplateMeta);
        impl Template for Empty {
            fn meta(&self) -> &TemplateMeta {
                &self.0
            }
            fn build_nav(&self, _ctx: &NavContext<'_>) -> Vec<NavItem> {
                Vec::new()
            }
            fn route_item_to_url(&self, _item: &NavItem, _index: usize) -> String {
                "/".to_string()
            }
            fn render_head(&self, _ctx: &HeadContext<'_>) -> Result<String, RenderError> {
                Ok(String::new())
            }
            fn render_body(&self, _ctx: &RenderContext<'_>) -> Result<String, RenderError> {
                Ok(String::new())
            }
        }

        let template = Empty(TemplateMeta::new(TemplateId::new("empty").unwrap(), "Empty"));
        let production = Production::default();
        let edition = Edition::new(EditionId::new("ed").unwrap(), TemplateId::new("empty").unwrap());
        let locale = json!({});
        let ctx = NavContext {
            production: &production,
            edition: &edition,
            locale: &locale,
        };
        assert!(RouteEnumerator::new(&template).enumerate(&ctx).is_empty());
    }
}
