#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use tech_hunter::evidence::{
    DnsInfo, DnsRecords, Evidence, EvidenceProvider, FetchedPage, MxRecord, SslInfo, WhoisInfo,
};
use tech_hunter::FetchFailure;

pub const WORDPRESS_PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<title>Corner Bakery</title>
<meta name="description" content="Fresh bread daily">
<meta property="og:title" content="Corner Bakery">
<meta name="twitter:card" content="summary">
<link rel="stylesheet" href="/wp-content/themes/bakery/css/bootstrap.min.css">
<script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
<script src="https://code.jquery.com/jquery-migrate-3.4.1.min.js"></script>
<script>window.dataLayer = window.dataLayer || []; function gtag(){dataLayer.push(arguments);}</script>
</head><body><p>Welcome</p></body></html>"#;

/// In-process evidence with canned answers; never touches the network.
pub struct FakeEvidence {
    pub page: Result<FetchedPage, String>,
    pub dns: DnsInfo,
    pub ssl: Evidence<SslInfo>,
    pub whois: Evidence<WhoisInfo>,
    pub existing_files: Vec<&'static str>,
    pub fetches: AtomicUsize,
    /// Latency of each DNS/TLS/WHOIS answer.
    pub delay: Duration,
    /// Timeouts handed to DNS, TLS and WHOIS, in call order.
    pub side_budgets: Mutex<Vec<Duration>>,
}

impl FakeEvidence {
    pub fn healthy() -> Self {
        let headers: BTreeMap<String, String> = [
            ("server", "nginx/1.24.0"),
            ("x-powered-by", "PHP/8.2.12"),
            ("content-encoding", "gzip"),
            ("cache-control", "max-age=600"),
            ("strict-transport-security", "max-age=31536000"),
            ("cf-cache-status", "HIT"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        FakeEvidence {
            page: Ok(FetchedPage {
                final_url: "https://bakery.example/".to_string(),
                status: 200,
                headers,
                body: WORDPRESS_PAGE.to_string(),
                elapsed_ms: 120,
            }),
            dns: DnsInfo {
                addresses: vec!["104.21.3.4".to_string()],
                records: DnsRecords {
                    mx: vec![MxRecord { exchange: "mail.bakery.example".into(), priority: 10 }],
                    txt: vec!["v=spf1 -all".into()],
                    ns: vec!["ada.ns.cloudflare.com".into()],
                },
            },
            ssl: Evidence::Found(SslInfo {
                valid: true,
                issuer: "Let's Encrypt".into(),
                valid_from: "Sep  1 00:00:00 2026 GMT".into(),
                valid_to: "Nov 30 00:00:00 2026 GMT".into(),
                days_remaining: 45,
                valid_for: vec!["bakery.example".into()],
            }),
            whois: Evidence::Found(WhoisInfo {
                registrar: Some("Example Registrar, Inc.".into()),
                creation_date: Some("2015-03-02T10:00:00Z".into()),
                updated_date: None,
                expiration_date: Some("2027-03-02T10:00:00Z".into()),
                name_servers: vec!["ada.ns.cloudflare.com".into()],
                referral_server: None,
            }),
            existing_files: vec!["/robots.txt"],
            fetches: AtomicUsize::new(0),
            delay: Duration::ZERO,
            side_budgets: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(message: &str) -> Self {
        FakeEvidence {
            page: Err(message.to_string()),
            ..Self::healthy()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn budgets(&self) -> Vec<Duration> {
        self.side_budgets.lock().unwrap().clone()
    }

    async fn side_lookup(&self, timeout: Duration) {
        self.side_budgets.lock().unwrap().push(timeout);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl EvidenceProvider for FakeEvidence {
    async fn fetch_page(&self, _url: &Url, _timeout: Duration) -> Result<FetchedPage, FetchFailure> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.page.clone().map_err(FetchFailure::new)
    }

    async fn resolve_dns(&self, _host: &str, timeout: Duration) -> DnsInfo {
        self.side_lookup(timeout).await;
        self.dns.clone()
    }

    async fn inspect_tls(&self, _host: &str, timeout: Duration) -> Evidence<SslInfo> {
        self.side_lookup(timeout).await;
        self.ssl.clone()
    }

    async fn lookup_whois(&self, _host: &str, timeout: Duration) -> Evidence<WhoisInfo> {
        self.side_lookup(timeout).await;
        self.whois.clone()
    }

    async fn resource_exists(&self, url: &Url, _timeout: Duration) -> bool {
        self.existing_files.contains(&url.path())
    }
}
