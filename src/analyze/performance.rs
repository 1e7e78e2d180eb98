use serde::Serialize;

use crate::report::{or_sentinel, NONE};
use crate::snapshot::PageSnapshot;

/// Placeholder: hints are not inspected, every flag reports `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceHints {
    pub preload: bool,
    pub prefetch: bool,
    pub preconnect: bool,
}

impl Default for ResourceHints {
    fn default() -> Self {
        Self {
            preload: true,
            prefetch: true,
            preconnect: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Milliseconds spent on the page request and body read.
    pub response_time: u64,
    /// Body size in UTF-8 bytes.
    pub page_size: usize,
    pub gzip_enabled: bool,
    pub cache_control: String,
    pub resource_hints: ResourceHints,
}

impl PerformanceReport {
    pub fn analyze(page: &PageSnapshot) -> Self {
        PerformanceReport {
            response_time: page.elapsed_ms,
            page_size: page.body.len(),
            gzip_enabled: page
                .header("content-encoding")
                .map(|v| v.contains("gzip"))
                .unwrap_or(false),
            cache_control: or_sentinel(page.header("cache-control"), NONE),
            resource_hints: ResourceHints::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::test_support::snapshot;

    #[test]
    fn reads_encoding_and_cache_headers() {
        let page = snapshot("<p>héllo</p>", &[("content-encoding", "gzip"), ("cache-control", "no-cache")]);
        let report = PerformanceReport::analyze(&page);
        assert!(report.gzip_enabled);
        assert_eq!(report.cache_control, "no-cache");
        assert_eq!(report.page_size, "<p>héllo</p>".len());
        assert_eq!(report.response_time, page.elapsed_ms);
    }

    #[test]
    fn defaults_without_headers() {
        let report = PerformanceReport::analyze(&snapshot("", &[]));
        assert!(!report.gzip_enabled);
        assert_eq!(report.cache_control, NONE);
        assert_eq!(report.page_size, 0);
        assert_eq!(report.resource_hints, ResourceHints::default());
        assert!(report.resource_hints.preconnect);
    }
}
