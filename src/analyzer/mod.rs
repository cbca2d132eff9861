//! HTML page analysis.
//!
//! Walks the token stream once and collects the page summary shown on the
//! results page: HTML version, title, heading counts, link counts and
//! whether the page carries a login form.

pub mod tokenizer;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;
use url::Url;

use tokenizer::{Doctype, Token, Tokenizer, attr};

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HtmlVersion {
    #[serde(rename = "HTML5")]
    Html5,
    #[serde(rename = "XHTML")]
    Xhtml,
    #[serde(rename = "HTML 4.01")]
    Html401,
    Unknown,
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Html5 => "HTML5",
            Self::Xhtml => "XHTML",
            Self::Html401 => "HTML 4.01",
            Self::Unknown => "Unknown",
        })
    }
}

/// Analysis result for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageData {
    pub url: String,
    /// `None` when the document declares no DOCTYPE.
    pub html_version: Option<HtmlVersion>,
    pub title: String,
    /// Count per heading level; only levels present in the page appear.
    pub headings: BTreeMap<String, usize>,
    pub internal_links: usize,
    pub external_links: usize,
    pub has_login_form: bool,
}

impl PageData {
    /// Count for a heading level such as `"h2"`, zero when absent.
    #[must_use]
    pub fn heading_count(&self, level: &str) -> usize {
        self.headings.get(level).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn heading_levels() -> &'static [&'static str] {
        &HEADING_TAGS
    }
}

/// Classify a doctype.
#[must_use]
pub fn detect_html_version(doctype: &Doctype) -> HtmlVersion {
    let ids: Vec<String> = [&doctype.public_id, &doctype.system_id]
        .into_iter()
        .flatten()
        .map(|id| id.to_ascii_lowercase())
        .collect();

    if doctype.name.eq_ignore_ascii_case("html") && ids.is_empty() {
        return HtmlVersion::Html5;
    }
    if ids.iter().any(|id| id.contains("xhtml")) {
        return HtmlVersion::Xhtml;
    }
    if ids.iter().any(|id| id.contains("html 4.01")) {
        return HtmlVersion::Html401;
    }
    HtmlVersion::Unknown
}

/// Links that start with neither `http` nor `//` belong to the page's site.
#[must_use]
pub fn is_external_link(href: &str) -> bool {
    href.starts_with("http") || href.starts_with("//")
}

/// Analyze an HTML document. Never fails: unparseable markup is skipped.
///
/// The first `<title>` wins, so `<title>` elements inside inline SVG later
/// in the body do not replace the document title.
#[must_use]
pub fn analyze_html(body: &str, base_url: &Url) -> PageData {
    let mut page = PageData::default();
    let mut in_title = false;
    let mut title_seen = false;

    for token in Tokenizer::new(body) {
        match token {
            Token::Doctype(doctype) => {
                let version = detect_html_version(&doctype);
                debug!(%version, "detected html version");
                page.html_version = Some(version);
            }
            Token::StartTag { name, attrs, .. } => match name.as_str() {
                "title" => in_title = !title_seen,
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    *page.headings.entry(name.clone()).or_insert(0) += 1;
                }
                "a" => {
                    let Some(href) = attr(&attrs, "href") else { continue };
                    if is_external_link(href) {
                        page.external_links += 1;
                    } else {
                        if let Ok(resolved) = base_url.join(href) {
                            debug!(link = %resolved, "internal link");
                        }
                        page.internal_links += 1;
                    }
                }
                "input" => {
                    if attr(&attrs, "type").is_some_and(|t| t.eq_ignore_ascii_case("password")) {
                        debug!("detected login form");
                        page.has_login_form = true;
                    }
                }
                _ => {}
            },
            Token::EndTag { name } if name == "title" => {
                if in_title {
                    title_seen = true;
                }
                in_title = false;
            }
            Token::Text(text) if in_title => {
                page.title = text.trim().to_owned();
                debug!(title = %page.title, "extracted page title");
                in_title = false;
                title_seen = true;
            }
            _ => {}
        }
    }

    page
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
