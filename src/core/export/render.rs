//! Route rendering
//!
//! Each route becomes `<workspace>/<route path>/index.html`. Body render
//! failures (errors or panics) degrade to an empty body; head render failures
//! and write failures abort the export.

use super::html::PageShell;
use super::workspace::JobWorkspace;
use crate::domain::{Edition, FolioError, NavItem, Production, Result};
use crate::template::{HeadContext, RenderContext, Template};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

/// Data shared by every route render
#[derive(Debug, Clone, Copy)]
pub struct RenderInputs<'a> {
    /// Production with externalized asset references
    pub production: &'a Production,
    pub edition: &'a Edition,
    pub locale: &'a Value,
    pub contextualizers: &'a Value,
    pub preprocessed_data: Option<&'a Value>,
}

/// What the render stage produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// `index.html` files written
    pub pages_written: usize,
    /// Routes whose body render failed
    pub degraded_routes: Vec<String>,
    /// Routes whose output was overwritten by a later route
    pub route_collisions: usize,
}

/// Renders routes into a workspace
pub struct RouteRenderer {
    template: Arc<dyn Template>,
    shell: PageShell,
    concurrency: usize,
}

impl RouteRenderer {
    pub fn new(template: Arc<dyn Template>, shell: PageShell, concurrency: usize) -> Self {
        Self {
            template,
            shell,
            concurrency: concurrency.max(1),
        }
    }

    pub fn shell(&self) -> &PageShell {
        &self.shell
    }

    /// Renders one route into a full HTML document
    ///
    /// Returns the document and whether the body render failed.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Render`] if the head render fails.
    pub fn render_route(&self, item: &NavItem, inputs: &RenderInputs<'_>) -> Result<(String, bool)> {
        let ctx = RenderContext {
            view_id: &item.view_id,
            view_class: &item.route_class,
            view_params: &item.route_params,
            location: &item.route,
            url_prefix: &self.shell.url_prefix,
            production: inputs.production,
            edition: inputs.edition,
            locale: inputs.locale,
            contextualizers: inputs.contextualizers,
            preprocessed_data: inputs.preprocessed_data,
            exclude_css: true,
            preview_mode: true,
            static_render: true,
        };

        let (body, degraded) =
            match catch_unwind(AssertUnwindSafe(|| self.template.render_body(&ctx))) {
                Ok(Ok(body)) => (body, false),
                Ok(Err(e)) => {
                    tracing::warn!(route = %item.route, error = %e, "Body render failed, writing empty body");
                    (String::new(), true)
                }
                Err(_) => {
                    tracing::warn!(route = %item.route, "Body render panicked, writing empty body");
                    (String::new(), true)
                }
            };

        let head = self.template.render_head(&HeadContext {
            production: inputs.production,
            edition: inputs.edition,
            item,
        })?;

        Ok((self.shell.document(&head, &body), degraded))
    }

    /// Renders every route and writes the pages
    ///
    /// Routes sharing an output folder are all rendered, but only the last
    /// one's page is written.
    ///
    /// # Errors
    ///
    /// - [`FolioError::Validation`] if a route path has `.` or `..` segments
    /// - [`FolioError::Render`] if a head render fails
    /// - [`FolioError::Io`] on the first failed write
    pub async fn render_all(
        &self,
        workspace: &JobWorkspace,
        items: &[NavItem],
        inputs: &RenderInputs<'_>,
    ) -> Result<RenderReport> {
        let folders = items
            .iter()
            .map(|item| route_folder(item.path()))
            .collect::<Result<Vec<_>>>()?;

        let mut last_writer: HashMap<&PathBuf, usize> = HashMap::new();
        for (index, folder) in folders.iter().enumerate() {
            if let Some(previous) = last_writer.insert(folder, index) {
                tracing::warn!(
                    route = %items[previous].route,
                    overwritten_by = %items[index].route,
                    folder = %folder.display(),
                    "Route output collision, last route wins"
                );
            }
        }

        let mut report = RenderReport {
            route_collisions: items.len() - last_writer.len(),
            ..RenderReport::default()
        };

        let mut pages = Vec::with_capacity(last_writer.len());
        for (index, item) in items.iter().enumerate() {
            let (html, degraded) = self.render_route(item, inputs)?;
            if degraded {
                report.degraded_routes.push(item.route.clone());
            }
            if last_writer.get(&folders[index]) == Some(&index) {
                pages.push((folders[index].join("index.html"), html));
            }
        }

        report.pages_written = stream::iter(pages)
            .map(|(relative, html)| async move {
                workspace.write_file(&relative, html.as_bytes()).await?;
                tracing::debug!(page = %relative.display(), "Wrote page");
                Ok::<_, FolioError>(())
            })
            .buffered(self.concurrency)
            .try_fold(0usize, |written, ()| async move { Ok::<_, FolioError>(written + 1) })
            .await?;

        Ok(report)
    }
}

impl std::fmt::Debug for RouteRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRenderer")
            .field("template", self.template.id())
            .field("shell", &self.shell)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

/// Workspace-relative folder for a route path
///
/// `/` and empty paths map to the workspace root.
///
/// # Errors
///
/// Returns [`FolioError::Validation`] for `.`/`..` segments or backslashes.
pub fn route_folder(path: &str) -> Result<PathBuf> {
    let mut folder = PathBuf::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." || segment.contains(['\\', '\0']) {
            return Err(FolioError::Validation(format!(
                "route '{path}' would be written outside the workspace"
            )));
        }
        folder.push(segment);
    }
    Ok(folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EditionId, RenderError, TemplateId};
    use crate::template::{NavContext, TemplateMeta};
    use serde_json::json;
    use std::path::Path;
    use tempfile::TempDir;
    use test_case::test_case;

    /// Renders the view id; views named `broken` fail, `panic` panics
    struct Echo {
        meta: TemplateMeta,
        head_fails: bool,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                meta: TemplateMeta::new(TemplateId::new("echo").unwrap(), "Echo"),
                head_fails: false,
            }
        }
    }

    impl Template for Echo {
        fn meta(&self) -> &TemplateMeta {
            &self.meta
        }

        fn build_nav(&self, _ctx: &NavContext<'_>) -> Vec<NavItem> {
            Vec::new()
        }

        fn route_item_to_url(&self, item: &NavItem, _index: usize) -> String {
            item.route.clone()
        }

        fn render_head(&self, ctx: &HeadContext<'_>) -> std::result::Result<String, RenderError> {
            if self.head_fails {
                return Err(RenderError::new("no head"));
            }
            Ok(format!("<title>{}</title>", ctx.item.view_id))
        }

        fn render_body(&self, ctx: &RenderContext<'_>) -> std::result::Result<String, RenderError> {
            match ctx.view_id {
                "broken" => Err(RenderError::new("missing section")),
                "panic" => panic!("template bug"),
                view => Ok(format!("<main>{view}</main>")),
            }
        }
    }

    fn item(route: &str, view: &str) -> NavItem {
        NavItem::new(view, "section").with_route(route)
    }

    struct Fixture {
        production: Production,
        edition: Edition,
        locale: Value,
        contextualizers: Value,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                production: Production::default(),
                edition: Edition::new(
                    EditionId::new("ed").unwrap(),
                    TemplateId::new("echo").unwrap(),
                ),
                locale: json!({}),
                contextualizers: json!({}),
            }
        }

        fn inputs(&self) -> RenderInputs<'_> {
            RenderInputs {
                production: &self.production,
                edition: &self.edition,
                locale: &self.locale,
                contextualizers: &self.contextualizers,
                preprocessed_data: None,
            }
        }
    }

    fn renderer(template: Echo) -> RouteRenderer {
        RouteRenderer::new(Arc::new(template), PageShell::default(), 2)
    }

    #[test_case("/", "" ; "root")]
    #[test_case("", "" ; "empty")]
    #[test_case("/sections/s1", "sections/s1" ; "nested")]
    #[test_case("//a///b/", "a/b" ; "redundant slashes")]
    fn test_route_folder(path: &str, expected: &str) {
        assert_eq!(route_folder(path).unwrap(), Path::new(expected));
    }

    #[test_case("/../etc" ; "parent")]
    #[test_case("/a/./b" ; "current")]
    #[test_case("/a\\b" ; "backslash")]
    fn test_route_folder_rejects(path: &str) {
        assert!(matches!(route_folder(path), Err(FolioError::Validation(_))));
    }

    #[tokio::test]
    async fn test_writes_one_page_per_route() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let fixture = Fixture::new();
        let items = vec![item("/", "home"), item("/sections/s1?focus=2", "s1")];

        let report = renderer(Echo::new())
            .render_all(&workspace, &items, &fixture.inputs())
            .await
            .unwrap();

        assert_eq!(report.pages_written, 2);
        assert_eq!(report.route_collisions, 0);
        let home = std::fs::read_to_string(workspace.join("index.html")).unwrap();
        assert!(home.contains("<title>home</title>"));
        assert!(home.contains("<div id=\"mount\"><main>home</main></div>"));
        let s1 = std::fs::read_to_string(workspace.join("sections/s1/index.html")).unwrap();
        assert!(s1.contains("<main>s1</main>"));
    }

    #[tokio::test]
    async fn test_collision_last_write_wins() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let fixture = Fixture::new();
        let items = vec![item("/page?x=1", "first"), item("/page?x=2", "second")];

        let report = renderer(Echo::new())
            .render_all(&workspace, &items, &fixture.inputs())
            .await
            .unwrap();

        assert_eq!(report.pages_written, 1);
        assert_eq!(report.route_collisions, 1);
        let page = std::fs::read_to_string(workspace.join("page/index.html")).unwrap();
        assert!(page.contains("<main>second</main>"));
        assert!(!page.contains("<main>first</main>"));
    }

    #[tokio::test]
    async fn test_body_failures_degrade_to_empty_body() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let fixture = Fixture::new();
        let items = vec![
            item("/a", "broken"),
            item("/b", "panic"),
            item("/c", "fine"),
        ];

        let report = renderer(Echo::new())
            .render_all(&workspace, &items, &fixture.inputs())
            .await
            .unwrap();

        assert_eq!(report.pages_written, 3);
        assert_eq!(report.degraded_routes, vec!["/a".to_string(), "/b".to_string()]);
        let a = std::fs::read_to_string(workspace.join("a/index.html")).unwrap();
        assert!(a.contains("<div id=\"mount\"></div>"));
        assert!(a.contains("<title>broken</title>"));
        let c = std::fs::read_to_string(workspace.join("c/index.html")).unwrap();
        assert!(c.contains("<main>fine</main>"));
    }

    #[tokio::test]
    async fn test_head_failure_is_fatal() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let fixture = Fixture::new();
        let template = Echo {
            head_fails: true,
            ..Echo::new()
        };

        let err = renderer(template)
            .render_all(&workspace, &[item("/", "home")], &fixture.inputs())
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::Render(_)));
    }

    #[tokio::test]
    async fn test_escaping_route_rejected_before_writing() {
        let root = TempDir::new().unwrap();
        let workspace = JobWorkspace::create(root.path()).await.unwrap();
        let fixture = Fixture::new();
        let items = vec![item("/ok", "ok"), item("/../../escape", "bad")];

        let err = renderer(Echo::new())
            .render_all(&workspace, &items, &fixture.inputs())
            .await
            .unwrap_err();
        assert!(matches!(err, FolioError::Validation(_)));
        assert!(!workspace.join("ok/index.html").exists());
    }
}
