//! HTML document shell wrapped around every rendered route

use crate::template::escape_html;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

const CSS_VARS_PONYFILL: &str = "https://cdn.jsdelivr.net/npm/css-vars-ponyfill@1";
const ANNOTATION_EMBED: &str = "https://hypothes.is/embed.js";

const LOADER_CSS: &str = r#"#static-loader-container{
  position: fixed;
  left: 0;
  top: 0;
  width: 100%;
  height: 100%;
  display: flex;
  align-items: center;
  justify-content: center;
  background: rgba(0,0,0,0.1);
  opacity: 0;
  transition: .5s ease;
}
.lds-ellipsis {
  display: inline-block;
  position: relative;
  width: 80px;
  height: 80px;
}
.lds-ellipsis div {
  position: absolute;
  top: 33px;
  width: 13px;
  height: 13px;
  border-radius: 50%;
  background: black;
  animation-timing-function: cubic-bezier(0, 1, 1, 0);
}
.lds-ellipsis div:nth-child(1) {
  left: 8px;
  animation: lds-ellipsis1 0.6s infinite;
}
.lds-ellipsis div:nth-child(2) {
  left: 8px;
  animation: lds-ellipsis2 0.6s infinite;
}
.lds-ellipsis div:nth-child(3) {
  left: 32px;
  animation: lds-ellipsis2 0.6s infinite;
}
.lds-ellipsis div:nth-child(4) {
  left: 56px;
  animation: lds-ellipsis3 0.6s infinite;
}
@keyframes lds-ellipsis1 {
  0% { transform: scale(0); }
  100% { transform: scale(1); }
}
@keyframes lds-ellipsis3 {
  0% { transform: scale(1); }
  100% { transform: scale(0); }
}
@keyframes lds-ellipsis2 {
  0% { transform: translate(0, 0); }
  100% { transform: translate(24px, 0); }
}"#;

const CLIENT_LIB: &str = r#"      function loadJSON(url, callback) {
        var xobj = new XMLHttpRequest();
        xobj.overrideMimeType("application/json");
        xobj.open('GET', url, true);
        xobj.onreadystatechange = function () {
          if (xobj.readyState == 4 && xobj.status == 200) {
            callback(JSON.parse(xobj.responseText));
          }
        };
        xobj.send(null);
      }
      function addLoader() {
        var loader = document.createElement('div');
        loader.id = 'static-loader-container';
        loader.innerHTML = '<div class="lds-ellipsis"><div></div><div></div><div></div><div></div></div>';
        document.body.appendChild(loader);
        loader.style.opacity = 1;
      }
      function hideLoader() {
        var loader = document.getElementById('static-loader-container');
        loader.style.opacity = 0;
        loader.style.pointerEvents = 'none';
      }
"#;

/// Per-export settings shared by every page
#[derive(Debug, Clone, Default)]
pub struct PageShell {
    /// Public base path, no trailing `/`
    pub url_prefix: String,
    pub edition_id: String,
    /// Client uses an in-memory router
    pub single_page: bool,
    /// Adds the annotation embed script
    pub allow_annotation: bool,
    /// Whether `styles.css` exists in the archive
    pub has_stylesheet: bool,
    /// Whether `preprocessedData.json` exists in the archive
    pub has_preprocessed_data: bool,
    /// Extra `var NAME = "value";` declarations
    pub client_globals: BTreeMap<String, String>,
}

impl PageShell {
    /// Router base name handed to the client
    pub fn url_base_name(&self) -> String {
        url_base_name(&self.url_prefix)
    }

    /// Builds the complete document for one route
    pub fn document(&self, head: &str, body: &str) -> String {
        let prefix = &self.url_prefix;
        let mut html = String::with_capacity(LOADER_CSS.len() + head.len() + body.len() + 2048);

        html.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
        let _ = writeln!(html, "    {}", head.trim());
        let _ = writeln!(html, "    <script src=\"{CSS_VARS_PONYFILL}\"></script>");
        if self.has_stylesheet {
            let _ = writeln!(
                html,
                "    <link rel=\"stylesheet\" href=\"{}/styles.css\">",
                escape_html(prefix)
            );
        }
        if self.allow_annotation {
            let _ = writeln!(html, "    <script src=\"{ANNOTATION_EMBED}\" async></script>");
        }
        let _ = writeln!(html, "    <style>\n{LOADER_CSS}\n    </style>");
        html.push_str("  </head>\n  <body>\n");
        let _ = writeln!(html, "    <div id=\"mount\">{body}</div>");
        let _ = writeln!(
            html,
            "    <script src=\"{}/bundle.js\" type=\"text/javascript\"></script>",
            escape_html(prefix)
        );
        html.push_str("    <script>\n");
        html.push_str(&self.globals_script());
        html.push_str(CLIENT_LIB);
        html.push_str(&self.boot_script());
        html.push_str("    </script>\n  </body>\n</html>\n");
        html
    }

    fn globals_script(&self) -> String {
        let mut script = String::new();
        let _ = writeln!(
            script,
            "      var __useBrowserRouter = {};",
            !self.single_page
        );
        let _ = writeln!(script, "      var __editionId = {};", js_string(&self.edition_id));
        let _ = writeln!(
            script,
            "      window.__urlBaseName = {};",
            js_string(&self.url_base_name())
        );
        for (name, value) in &self.client_globals {
            let _ = writeln!(script, "      var {name} = {};", js_string(value));
        }
        script
    }

    fn boot_script(&self) -> String {
        let prefix = js_string_body(&self.url_prefix);
        let render = "            renderEdition(production, __editionId, preprocessedData, locale, __useBrowserRouter, true);\n            hideLoader();\n";
        let mut script = String::new();
        script.push_str("      addLoader();\n");
        let _ = writeln!(script, "      loadJSON('{prefix}/locale.json', function (locale) {{");
        if self.has_preprocessed_data {
            let _ = writeln!(
                script,
                "        loadJSON('{prefix}/preprocessedData.json', function (preprocessedData) {{"
            );
        } else {
            script.push_str("        (function (preprocessedData) {\n");
        }
        let _ = writeln!(
            script,
            "          loadJSON('{prefix}/production.json', function (production) {{"
        );
        script.push_str(render);
        script.push_str("          });\n");
        if self.has_preprocessed_data {
            script.push_str("        });\n");
        } else {
            script.push_str("        })(null);\n");
        }
        script.push_str("      });\n");
        script
    }
}

/// Derives the client router base name from a URL prefix
///
/// Strips `http(s)://`, drops the host when a path follows, and ensures
/// leading and trailing `/`. An empty prefix yields an empty base name.
pub fn url_base_name(url_prefix: &str) -> String {
    if url_prefix.is_empty() {
        return String::new();
    }
    let without_protocol = url_prefix
        .strip_prefix("https://")
        .or_else(|| url_prefix.strip_prefix("http://"))
        .unwrap_or(url_prefix);
    let without_domain = match without_protocol.split_once('/') {
        Some((_, path)) => path,
        None => without_protocol,
    };
    if without_domain.ends_with('/') {
        format!("/{without_domain}")
    } else {
        format!("/{without_domain}/")
    }
}

/// Encodes a string as a JavaScript string literal safe inside `<script>`
fn js_string(value: &str) -> String {
    format!("\"{}\"", js_string_body(value))
}

fn js_string_body(value: &str) -> String {
    let encoded = Value::String(value.to_string()).to_string();
    let inner = &encoded[1..encoded.len() - 1];
    inner
        .replace('\'', "\\u0027")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}
