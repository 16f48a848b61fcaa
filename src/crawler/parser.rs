//! HTML parser for extracting anchor and image references
//!
//! This module handles parsing HTML content to extract:
//! - Links from `<a href="...">` tags
//! - Image sources from `<img src="...">` tags
//!
//! Both are resolved against the page URL. Duplicates are kept so callers can
//! count occurrences.

use scraper::{Html, Selector};
use url::Url;

/// Extracted references from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// All anchor targets found on the page (absolute URLs)
    pub links: Vec<String>,

    /// All image sources found on the page (absolute URLs)
    pub images: Vec<String>,
}

/// Parses HTML content and extracts anchor and image references
///
/// # Resolution Rules
///
/// **Skipped:**
/// - Empty attributes
/// - Fragment-only references (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` references
/// - Anything that is not HTTP(S) after resolution
///
/// # Example
///
/// ```
/// use gallery_harvester::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a><img src="cat.jpg"></body></html>"#;
/// let base_url = Url::parse("https://example.com/dir/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.links, vec!["https://example.com/page"]);
/// assert_eq!(parsed.images, vec!["https://example.com/dir/cat.jpg"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: extract_attribute(&document, "a[href]", "href", base_url),
        images: extract_attribute(&document, "img[src]", "src", base_url),
    }
}

/// Collects and resolves one attribute from every element matching `selector`
fn extract_attribute(document: &Html, selector: &str, attr: &str, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .filter_map(|value| resolve_reference(value, base_url))
        .collect()
}

/// Resolves a reference to an absolute URL and validates it
fn resolve_reference(reference: &str, base_url: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    if reference.starts_with("javascript:")
        || reference.starts_with("mailto:")
        || reference.starts_with("tel:")
        || reference.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(reference).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
