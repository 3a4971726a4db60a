//! Built-in `basic` template
//!
//! A small, dependency-free template: a landing page listing the production's
//! sections, one page per section, and a colophon. It lets the `folio` binary
//! export a production without any plugin templates.

use super::traits::{HeadContext, NavContext, RenderContext, Template, TemplateMeta};
use crate::domain::{NavItem, Production, RenderError, TemplateId};
use serde_json::Value;

const BASIC_BUNDLE: &str = r#"(function () {
  window.renderEdition = function (production, editionId, preprocessedData, locale) {
    var mount = document.getElementById('mount');
    if (mount) {
      mount.setAttribute('data-edition', editionId);
      mount.setAttribute('data-ready', 'true');
    }
  };
})();
"#;

const BASIC_STYLESHEET: &str = r#"body {
  font-family: Georgia, 'Times New Roman', serif;
  max-width: 42rem;
  margin: 2rem auto;
  line-height: 1.6;
  color: #222;
}
nav ul { list-style: none; padding: 0; }
nav li { margin: .25rem 0; }
"#;

/// The built-in template
#[derive(Debug, Clone)]
pub struct BasicTemplate {
    meta: TemplateMeta,
}

impl BasicTemplate {
    /// Template id editions use to select it
    pub const ID: &'static str = "basic";

    /// Creates the template
    pub fn new() -> Self {
        let id = TemplateId::new(Self::ID).expect("basic template id is non-empty");
        Self {
            meta: TemplateMeta::new(id, "Basic")
                .with_description("Landing page, one page per section and a colophon"),
        }
    }

    fn section_title<'a>(production: &'a Production, section_id: &str) -> Option<&'a str> {
        production
            .collection("sections")?
            .get(section_id)?
            .pointer("/metadata/title")
            .and_then(Value::as_str)
    }

    fn render_landing(ctx: &RenderContext<'_>) -> String {
        let title = ctx.production.title().unwrap_or("Untitled");
        let mut html = format!("<main class=\"landing\"><h1>{}</h1>", escape_html(title));
        if let Some(sections) = ctx.production.collection("sections") {
            html.push_str("<nav><ul>");
            for section_id in sections.keys() {
                let label = Self::section_title(ctx.production, section_id).unwrap_or(section_id);
                html.push_str(&format!(
                    "<li><a href=\"{}/sections/{}\">{}</a></li>",
                    escape_html(ctx.url_prefix),
                    escape_html(section_id),
                    escape_html(label)
                ));
            }
            html.push_str("</ul></nav>");
        }
        html.push_str("</main>");
        html
    }

    fn render_section(ctx: &RenderContext<'_>) -> Result<String, RenderError> {
        let section_id = ctx
            .view_params
            .get("sectionId")
            .and_then(Value::as_str)
            .ok_or_else(|| RenderError::new("section view without a sectionId parameter"))?;
        let section = ctx
            .production
            .collection("sections")
            .and_then(|sections| sections.get(section_id))
            .ok_or_else(|| RenderError::new(format!("unknown section '{section_id}'")))?;

        let title = section
            .pointer("/metadata/title")
            .and_then(Value::as_str)
            .unwrap_or(section_id);
        let mut html = format!(
            "<article class=\"section\" id=\"{}\"><h1>{}</h1>",
            escape_html(section_id),
            escape_html(title)
        );
        if let Some(summary) = section.pointer("/metadata/abstract").and_then(Value::as_str) {
            html.push_str(&format!("<p class=\"abstract\">{}</p>", escape_html(summary)));
        }
        html.push_str("</article>");
        Ok(html)
    }

    fn render_colophon(ctx: &RenderContext<'_>) -> String {
        let edition_title = ctx.edition.metadata.title.as_deref().unwrap_or("");
        format!(
            "<main class=\"colophon\"><h1>Colophon</h1><p>{}</p><p>{} asset(s)</p></main>",
            escape_html(edition_title),
            ctx.production.assets.len()
        )
    }
}

impl Default for BasicTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl Template for BasicTemplate {
    fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    fn build_nav(&self, ctx: &NavContext<'_>) -> Vec<NavItem> {
        let mut nav = vec![NavItem::new("landing", "landing")
            .with_title(ctx.production.title().unwrap_or("Home"))];
        if let Some(sections) = ctx.production.collection("sections") {
            for section_id in sections.keys() {
                let mut item = NavItem::new("section", "sections")
                    .with_param("sectionId", section_id.as_str());
                if let Some(title) = Self::section_title(ctx.production, section_id) {
                    item = item.with_title(title);
                }
                nav.push(item);
            }
        }
        nav
    }

    fn additional_routes(&self) -> Vec<NavItem> {
        vec![NavItem::new("colophon", "colophon").with_title("Colophon")]
    }

    fn route_item_to_url(&self, item: &NavItem, index: usize) -> String {
        match item.route_class.as_str() {
            "landing" => "/".to_string(),
            "sections" => match item.param_str("sectionId") {
                Some(section_id) => format!("/sections/{section_id}"),
                None => format!("/sections/{index}"),
            },
            "" => format!("/page-{index}"),
            other => format!("/{other}"),
        }
    }

    fn render_head(&self, ctx: &HeadContext<'_>) -> Result<String, RenderError> {
        let production_title = ctx.production.title().unwrap_or("Untitled");
        let title = match &ctx.item.title {
            Some(page) if page != production_title => format!("{page} - {production_title}"),
            _ => production_title.to_string(),
        };
        Ok(format!(
            "<meta charset=\"utf-8\"/><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/><title>{}</title><meta property=\"og:title\" content=\"{}\"/>",
            escape_html(&title),
            escape_html(&title)
        ))
    }

    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
        match ctx.view_class {
            "landing" => Ok(Self::render_landing(ctx)),
            "sections" => Self::render_section(ctx),
            "colophon" => Ok(Self::render_colophon(ctx)),
            other => Err(RenderError::new(format!("unsupported view class '{other}'"))),
        }
    }

    fn client_bundle(&self) -> Option<&[u8]> {
        Some(BASIC_BUNDLE.as_bytes())
    }

    fn stylesheet(&self) -> Option<&str> {
        Some(BASIC_STYLESHEET)
    }
}

/// Escapes text for use in HTML content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
