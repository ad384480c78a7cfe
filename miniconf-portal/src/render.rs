//! Page rendering
//!
//! Page builders produce a JSON context per template; a [`PageRenderer`]
//! turns that context into HTML. The built-in [`ShellRenderer`] emits a
//! self-contained document with the context embedded as JSON and a small
//! script that draws it in the browser.

use pulldown_cmark::{html, Options, Parser};
use serde_json::Value;

use miniconf_common::{Error, Result};

const SHELL_HTML: &str = include_str!("../ui/shell.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// Turns a prepared page context into HTML
pub trait PageRenderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// Default renderer: HTML shell + embedded page data + client-side script
#[derive(Debug, Clone)]
pub struct ShellRenderer {
    /// Title used when the site config has no `name`
    pub default_title: String,
}

impl Default for ShellRenderer {
    fn default() -> Self {
        Self {
            default_title: "MiniConf".to_string(),
        }
    }
}

impl PageRenderer for ShellRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        let title = context
            .get("config")
            .and_then(|config| config.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(&self.default_title);

        let data = serde_json::to_string(context).map_err(|e| {
            Error::Export(format!("Failed to encode context for {}: {}", template, e))
        })?;

        Ok(SHELL_HTML
            .replace("{{TITLE}}", &escape_html(title))
            .replace("{{TEMPLATE}}", &escape_html(template))
            .replace("{{SCRIPT}}", APP_JS)
            .replace("{{DATA}}", &escape_script_json(&data)))
    }
}

/// Render Markdown to an HTML fragment
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Escape text for use in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Make serialized JSON safe inside a `<script>` element
///
/// `<` only occurs inside JSON strings, where `\u003c` decodes to the same
/// character, so `</script>` in the data cannot close the element.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}
