use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use crate::evidence::site_files::site_file_url;
use crate::evidence::{EvidenceProvider, SiteFiles};
use crate::report::{or_sentinel, NONE};
use crate::snapshot::PageSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoReport {
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub canonical_url: String,
    pub robots_txt: bool,
    pub sitemap_xml: bool,
    pub open_graph: BTreeMap<String, String>,
    pub twitter_cards: BTreeMap<String, String>,
}

impl SeoReport {
    pub fn analyze(page: &PageSnapshot, files: SiteFiles) -> Self {
        let doc = &page.document;
        let title = Some(doc.title.as_str()).filter(|t| !t.is_empty());
        SeoReport {
            title: or_sentinel(title, NONE),
            meta_description: or_sentinel(doc.meta_description.as_deref(), NONE),
            meta_keywords: or_sentinel(doc.meta_keywords.as_deref(), NONE),
            canonical_url: doc.canonical.clone().unwrap_or_else(|| page.url.clone()),
            robots_txt: files.robots_txt,
            sitemap_xml: files.sitemap_xml,
            open_graph: doc.open_graph.clone(),
            twitter_cards: doc.twitter_cards.clone(),
        }
    }
}

/// `/robots.txt` and `/sitemap.xml` relative to the analyzed URL, probed concurrently.
pub async fn probe_site_files(provider: &dyn EvidenceProvider, base: &Url, timeout: Duration) -> SiteFiles {
    let probe = |path: &'static str| async move {
        match site_file_url(base, path) {
            Some(url) => provider.resource_exists(&url, timeout).await,
            None => false,
        }
    };
    let (robots_txt, sitemap_xml) = tokio::join!(probe("/robots.txt"), probe("/sitemap.xml"));
    SiteFiles { robots_txt, sitemap_xml }
}
