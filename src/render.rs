//! Server-side HTML pages.
//!
//! One layout, two bodies: the home page (optionally carrying an error
//! message) and the results page. Element ids and the submit handler come
//! from the gate configuration so the page always matches the gate script.

use crate::analyzer::PageData;
use crate::gate::script::HANDLER_NAME;
use crate::gate::{GateConfig, Visibility};

pub const GATE_SCRIPT_PATH: &str = "/js/gate.js";

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(gate: &GateConfig, url_value: &str, container_body: &str) -> String {
    let form_id = escape_html(&gate.form_id);
    let loader_id = escape_html(&gate.loader_id);
    let container_id = escape_html(&gate.container_id);
    let url_value = escape_html(url_value);
    let hidden = Visibility::Hidden.css_display();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Web Page Analyzer</title>
<link rel="stylesheet" href="/static/css/style.css">
<script src="{GATE_SCRIPT_PATH}"></script>
</head>
<body>
<h1>Web Page Analyzer</h1>
<form id="{form_id}" action="/results" method="post" onsubmit="return {HANDLER_NAME}()">
<input type="url" name="url" placeholder="https://example.com" value="{url_value}" required>
<button type="submit">Analyze</button>
</form>
<div id="{loader_id}" class="loader" style="display: {hidden}">Analyzing page&hellip;</div>
<div id="{container_id}">
{container_body}
</div>
</body>
</html>
"#
    )
}

/// Home page. `error` is shown in the main container when present.
#[must_use]
pub fn home_page(gate: &GateConfig, error: Option<&str>) -> String {
    let body = match error.map(str::trim).filter(|e| !e.is_empty()) {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape_html(message)),
        None => String::from(r#"<p class="hint">Enter a URL to analyze its structure.</p>"#),
    };
    layout(gate, "", &body)
}

/// Results page for a successful analysis.
#[must_use]
pub fn results_page(gate: &GateConfig, page: &PageData) -> String {
    let version = page
        .html_version
        .map_or_else(|| "Not declared".to_owned(), |v| v.to_string());

    let mut rows = format!(
        "<tr><th>URL</th><td>{}</td></tr>\n\
         <tr><th>HTML Version</th><td>{}</td></tr>\n\
         <tr><th>Title</th><td>{}</td></tr>\n",
        escape_html(&page.url),
        escape_html(&version),
        escape_html(&page.title),
    );
    for level in PageData::heading_levels() {
        rows.push_str(&format!(
            "<tr><th>{} Headings</th><td>{}</td></tr>\n",
            level.to_ascii_uppercase(),
            page.heading_count(level)
        ));
    }
    rows.push_str(&format!(
        "<tr><th>Internal Links</th><td>{}</td></tr>\n\
         <tr><th>External Links</th><td>{}</td></tr>\n\
         <tr><th>Login Form</th><td>{}</td></tr>\n",
        page.internal_links,
        page.external_links,
        if page.has_login_form { "Yes" } else { "No" }
    ));

    let body = format!("<h2>Analysis Results</h2>\n<table class=\"results\">\n{rows}</table>");
    layout(gate, &page.url, &body)
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
