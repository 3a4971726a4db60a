//! Navigation item (route) model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One renderable page
///
/// `route` may carry a query suffix (`/path?query`); only the part before `?`
/// decides where the page is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    /// Public route, filled in by the template's URL mapper
    #[serde(default)]
    pub route: String,

    /// View rendered for this route
    #[serde(default)]
    pub view_id: String,

    /// Kind of view (`landing`, `sections`, `glossary`, ...)
    #[serde(default, alias = "viewClass")]
    pub route_class: String,

    /// Parameters passed to the view
    #[serde(default)]
    pub route_params: Map<String, Value>,

    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NavItem {
    /// Creates a nav item for a view
    pub fn new(view_id: impl Into<String>, route_class: impl Into<String>) -> Self {
        Self {
            view_id: view_id.into(),
            route_class: route_class.into(),
            ..Self::default()
        }
    }

    /// Sets the route
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Adds a route parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.route_params.insert(key.into(), value.into());
        self
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The route without its query suffix
    pub fn path(&self) -> &str {
        self.route.split('?').next().unwrap_or_default()
    }

    /// A string route parameter
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.route_params.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_strips_query() {
        let item = NavItem::new("v", "sections").with_route("/sections/s1?notes=true");
        assert_eq!(item.path(), "/sections/s1");
    }

    #[test]
    fn test_path_without_query() {
        let item = NavItem::new("v", "landing").with_route("/");
        assert_eq!(item.path(), "/");
    }

    #[test]
    fn test_view_class_alias() {
        let item: NavItem = serde_json::from_value(json!({
            "route": "/",
            "viewId": "v",
            "viewClass": "landing",
            "routeParams": {}
        }))
        .unwrap();
        assert_eq!(item.route_class, "landing");
    }

    #[test]
    fn test_builder_params() {
        let item = NavItem::new("v", "sections").with_param("sectionId", "s1");
        assert_eq!(item.param_str("sectionId"), Some("s1"));
        assert_eq!(item.param_str("missing"), None);
    }
}
