//! Link preview extraction from raw HTML.
//!
//! Extraction scans the response text with bounded regular expressions
//! instead of building a DOM. Matching is case-insensitive, `.` spans line
//! breaks, and the first match wins for each field. The `content` attribute
//! is located anywhere inside the matched `<meta>` tag, so attribute order
//! does not matter.
//!
//! ### Fields
//! - `title`: `og:title` / `twitter:title`, else the first `<title>` element.
//! - `description`: `og:description` / `twitter:description`.
//! - `image`: `og:image:url` / `og:image` / `twitter:image`, resolved
//!   against the page URL.

pub mod text;

pub use text::{clean, unescape_html};

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::fetch::resolve_reference;

static META_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+(?:property|name)\s*=\s*['"](?:og:title|twitter:title)['"][^>]*>"#).unwrap()
});

static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+(?:property|name)\s*=\s*['"](?:og:description|twitter:description)['"][^>]*>"#)
        .unwrap()
});

static META_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+(?:property|name)\s*=\s*['"](?:og:image:url|og:image|twitter:image)['"][^>]*>"#)
        .unwrap()
});

static CONTENT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)content\s*=\s*['"]([^'"]+)['"]"#).unwrap());

static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Preview metadata for a single page.
///
/// Absent fields are skipped when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkPreview {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Cleaned `content` attribute of the first tag matching `tag_re`.
fn meta_content(html: &str, tag_re: &Regex) -> Option<String> {
    let tag = tag_re.find(html)?;
    let content = CONTENT_ATTR.captures(tag.as_str())?.get(1)?;
    non_empty(clean(content.as_str()))
}

fn title_element(html: &str) -> Option<String> {
    let inner = TITLE_TAG.captures(html)?.get(1)?;
    non_empty(clean(inner.as_str()))
}

/// Extract preview metadata from `html`, fetched from `page_url`.
///
/// `page_url` is echoed verbatim in the result and used as the base for
/// resolving a relative image reference.
pub fn extract_preview(html: &str, page_url: &str) -> LinkPreview {
    let title = meta_content(html, &META_TITLE).or_else(|| title_element(html));
    let description = meta_content(html, &META_DESCRIPTION);
    let image = meta_content(html, &META_IMAGE).map(|reference| resolve_reference(page_url, &reference));

    LinkPreview { url: page_url.to_string(), title, description, image }
}
