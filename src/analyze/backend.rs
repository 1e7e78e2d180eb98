use serde::Serialize;

use crate::detect::catalog::{BACKEND_FRAMEWORKS, CACHE_HEADERS, CMS, DATABASES};
use crate::detect::Matcher;
use crate::report::{or_sentinel, UNDETERMINED};
use crate::snapshot::PageSnapshot;

/// `X-Powered-By` fragment → language. Later rows override earlier ones.
const LANGUAGE_HINTS: &[(&str, &str)] = &[
    ("PHP", "PHP"),
    ("ASP.NET", "C#"),
    ("Node.js", "JavaScript"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendReport {
    pub server: String,
    pub powered_by: String,
    pub programming_language: String,
    pub detected_frameworks: Vec<String>,
    pub cms: String,
    pub database: String,
    pub cache_system: String,
}

impl BackendReport {
    pub fn analyze(page: &PageSnapshot, matcher: &dyn Matcher) -> Self {
        let html = page.document.html.as_str();
        let powered_by = page.header("x-powered-by");

        let detected_frameworks = BACKEND_FRAMEWORKS
            .iter()
            .filter(|sig| {
                matcher.is_match(html, sig.patterns)
                    || page.headers.keys().any(|name| matcher.is_match(name, sig.patterns))
            })
            .map(|sig| sig.name.to_string())
            .collect();

        BackendReport {
            server: or_sentinel(page.header("server"), UNDETERMINED),
            powered_by: or_sentinel(powered_by, UNDETERMINED),
            programming_language: or_sentinel(powered_by.and_then(language_from_powered_by), UNDETERMINED),
            detected_frameworks,
            cms: or_sentinel(detect_cms(page, matcher), UNDETERMINED),
            database: or_sentinel(matcher.match_category(html, DATABASES).last().copied(), UNDETERMINED),
            cache_system: or_sentinel(detect_cache(page), UNDETERMINED),
        }
    }
}

pub fn language_from_powered_by(powered_by: &str) -> Option<&'static str> {
    LANGUAGE_HINTS
        .iter()
        .filter(|(fragment, _)| powered_by.contains(fragment))
        .map(|(_, language)| *language)
        .last()
}

/// The generator meta tag is authoritative: when it names a CMS the page
/// body is not consulted at all.
fn detect_cms(page: &PageSnapshot, matcher: &dyn Matcher) -> Option<&'static str> {
    if let Some(generator) = page.document.generator.as_deref() {
        if let Some(cms) = matcher.match_category(generator, CMS).last().copied() {
            return Some(cms);
        }
    }
    matcher.match_category(&page.document.html, CMS).last().copied()
}

/// Header-presence rules in declaration order; the last one present wins.
fn detect_cache(page: &PageSnapshot) -> Option<&'static str> {
    CACHE_HEADERS
        .iter()
        .filter(|sig| sig.patterns.iter().any(|h| page.header(h).is_some()))
        .map(|sig| sig.name)
        .last()
}
