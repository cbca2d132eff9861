//! Browser rendition of the submission gate.
//!
//! Rendered from [`GateConfig`] so the ids in the page template, the ids in
//! the script and the delay all come from one place.

use super::{GateConfig, Visibility};

pub const HANDLER_NAME: &str = "showLoader";

/// Render the gate as a browser script defining `showLoader()`.
#[must_use]
pub fn render(config: &GateConfig) -> String {
    let form = js_string(&config.form_id);
    let loader = js_string(&config.loader_id);
    let container = js_string(&config.container_id);
    let hidden = js_string(Visibility::Hidden.css_display());
    let visible = js_string(Visibility::Visible.css_display());
    let delay_ms = config.delay.as_millis();

    format!(
        r"let submissionPending = false;

function {HANDLER_NAME}() {{
    document.getElementById({form}).style.display = {hidden};
    document.getElementById({loader}).style.display = {visible};
    document.getElementById({container}).style.display = {hidden};

    if (!submissionPending) {{
        submissionPending = true;
        setTimeout(() => {{
            document.getElementById({form}).submit();
        }}, {delay_ms});
    }}

    return false;
}}
"
    )
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_owned())
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
