use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

use crate::evidence::FetchedPage;

/// Response headers keyed by lowercase name.
pub type Headers = BTreeMap<String, String>;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static SCRIPT: Lazy<Selector> = Lazy::new(|| selector("script"));
static STYLESHEET: Lazy<Selector> = Lazy::new(|| selector(r#"link[rel="stylesheet"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static GENERATOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="generator"]"#));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static KEYWORDS: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="keywords"]"#));
static CANONICAL: Lazy<Selector> = Lazy::new(|| selector(r#"link[rel="canonical"]"#));
static OPEN_GRAPH: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property^="og:"]"#));
static TWITTER: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name^="twitter:"]"#));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptElement {
    pub src: Option<String>,
    pub content: Option<String>,
}

/// Everything the analyzers read from the DOM, pulled out in one pass.
///
/// `scraper::Html` is not `Send`, so the tree is dropped right after
/// extraction and never lives across an await point.
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    /// Re-serialized document, the corpus for whole-page signatures.
    pub html: String,
    pub title: String,
    pub generator: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub canonical: Option<String>,
    pub open_graph: BTreeMap<String, String>,
    pub twitter_cards: BTreeMap<String, String>,
    pub scripts: Vec<ScriptElement>,
    pub stylesheets: Vec<String>,
}

impl PageDocument {
    pub fn parse(body: &str) -> Self {
        let document = Html::parse_document(body);

        let mut scripts = Vec::new();
        for el in document.select(&SCRIPT) {
            let src = non_empty(el.value().attr("src"));
            if let Some(ref s) = src {
                tracing::debug!("Script found: {}", s);
            }
            let inner = el.inner_html();
            let content = if inner.is_empty() { None } else { Some(inner) };
            scripts.push(ScriptElement { src, content });
        }

        let mut stylesheets = Vec::new();
        for el in document.select(&STYLESHEET) {
            if let Some(href) = non_empty(el.value().attr("href")) {
                tracing::debug!("Stylesheet found: {}", href);
                stylesheets.push(href);
            }
        }

        let title = document
            .select(&TITLE)
            .map(|el| el.text().collect::<String>())
            .collect::<String>()
            .trim()
            .to_string();

        PageDocument {
            html: document.html(),
            title,
            generator: first_attr(&document, &GENERATOR, "content"),
            meta_description: first_attr(&document, &DESCRIPTION, "content"),
            meta_keywords: first_attr(&document, &KEYWORDS, "content"),
            canonical: first_attr(&document, &CANONICAL, "href"),
            open_graph: prefixed_meta(document.select(&OPEN_GRAPH), "property", "og:"),
            twitter_cards: prefixed_meta(document.select(&TWITTER), "name", "twitter:"),
            scripts,
            stylesheets,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn first_attr(document: &Html, sel: &Selector, attr: &str) -> Option<String> {
    document
        .select(sel)
        .next()
        .and_then(|el| non_empty(el.value().attr(attr)))
}

/// `<meta {key}="{prefix}x" content="..">` → `x => ..`; later tags overwrite earlier ones.
fn prefixed_meta<'a>(
    elements: impl Iterator<Item = ElementRef<'a>>,
    key: &str,
    prefix: &str,
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for el in elements {
        if let Some(name) = el.value().attr(key) {
            let suffix = name.strip_prefix(prefix).unwrap_or(name);
            let content = el.value().attr("content").unwrap_or_default();
            out.insert(suffix.to_string(), content.to_string());
        }
    }
    out
}

/// Immutable record of the single page fetch, shared read-only by all analyzers.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// URL as requested, before redirects.
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub headers: Headers,
    pub body: String,
    pub elapsed_ms: u64,
    pub document: PageDocument,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, page: FetchedPage) -> Self {
        let document = PageDocument::parse(&page.body);
        PageSnapshot {
            url: url.into(),
            final_url: page.final_url,
            status: page.status,
            headers: page.headers,
            body: page.body,
            elapsed_ms: page.elapsed_ms,
            document,
        }
    }

    /// Header value, treating an empty value as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

pub fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<title> Example Shop </title>
<meta name="generator" content="WordPress 6.4">
<meta name="description" content="Best shop">
<meta property="og:title" content="Shop">
<meta property="og:image" content="https://example.com/a.png">
<meta name="twitter:card" content="summary">
<link rel="stylesheet" href="/css/bootstrap.min.css">
<link rel="stylesheet">
<link rel="canonical" href="https://example.com/">
<script src="https://cdn.jsdelivr.net/npm/vue@3"></script>
<script>window.__REDUX_STATE__ = {};</script>
</head><body></body></html>"#;

    #[test]
    fn extracts_dom_facts() {
        let doc = PageDocument::parse(PAGE);
        assert_eq!(doc.title, "Example Shop");
        assert_eq!(doc.generator.as_deref(), Some("WordPress 6.4"));
        assert_eq!(doc.meta_description.as_deref(), Some("Best shop"));
        assert_eq!(doc.meta_keywords, None);
        assert_eq!(doc.canonical.as_deref(), Some("https://example.com/"));
        assert_eq!(doc.open_graph.get("title").map(String::as_str), Some("Shop"));
        assert_eq!(doc.open_graph.len(), 2);
        assert_eq!(doc.twitter_cards.get("card").map(String::as_str), Some("summary"));
        assert_eq!(doc.stylesheets, vec!["/css/bootstrap.min.css"]);
        assert_eq!(doc.scripts.len(), 2);
        assert_eq!(doc.scripts[0].src.as_deref(), Some("https://cdn.jsdelivr.net/npm/vue@3"));
        assert_eq!(doc.scripts[0].content, None);
        assert!(doc.scripts[1].content.as_deref().unwrap_or("").contains("__REDUX_STATE__"));
        assert!(doc.html.contains("bootstrap.min.css"));
    }

    #[test]
    fn empty_body_yields_empty_document() {
        let doc = PageDocument::parse("");
        assert!(doc.title.is_empty());
        assert!(doc.scripts.is_empty());
        assert!(doc.open_graph.is_empty());
    }

    #[test]
    fn empty_header_reads_as_absent() {
        let mut headers = Headers::new();
        headers.insert("server".into(), "".into());
        headers.insert("x-powered-by".into(), "PHP/8.2".into());
        assert_eq!(header_value(&headers, "server"), None);
        assert_eq!(header_value(&headers, "x-powered-by"), Some("PHP/8.2"));
    }
}
