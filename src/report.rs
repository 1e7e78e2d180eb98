use serde::Serialize;

use crate::analyze::{
    BackendReport, FrontendReport, PerformanceReport, SecurityReport, SeoReport, ServerReport,
};

/// No evidence for a backend/server fact.
pub const UNDETERMINED: &str = "Belirlenemedi";
/// Header or SEO field not present on the page.
pub const NONE: &str = "Yok";
/// WHOIS field the registry did not return.
pub const UNSPECIFIED: &str = "Belirtilmemiş";

/// Complete fingerprint of one page. Every field is always populated.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub url: String,
    pub status: u16,
    pub backend: BackendReport,
    pub frontend: FrontendReport,
    pub security: SecurityReport,
    pub server: ServerReport,
    pub seo: SeoReport,
    pub performance: PerformanceReport,
}

pub fn or_sentinel(value: Option<&str>, sentinel: &str) -> String {
    value.unwrap_or(sentinel).to_string()
}
