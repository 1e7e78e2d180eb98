//! Acquisition of everything the analyzers look at.
//!
//! The primary page fetch is the only fallible source. DNS, TLS, WHOIS and
//! the site-file probes convert their own failures into data so that one
//! broken lookup never costs the rest of the report.

pub mod dns;
pub mod page;
pub mod site_files;
pub mod tls;
pub mod whois;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use reqwest::Client;
use serde::Serialize;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::Config;
use crate::error::{AnalysisError, FetchFailure};

pub use dns::{DnsInfo, DnsRecords, MxRecord};
pub use page::FetchedPage;
pub use tls::SslInfo;
pub use whois::{WhoisClient, WhoisInfo};

/// Outcome of a non-fatal evidence source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evidence<T> {
    Found(T),
    Degraded { error: String },
}

impl<T> Evidence<T> {
    pub fn degraded(error: impl Into<String>) -> Self {
        Evidence::Degraded { error: error.into() }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Evidence::Degraded { .. })
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Evidence<T> {
    fn from(res: Result<T, E>) -> Self {
        match res {
            Ok(v) => Evidence::Found(v),
            Err(e) => Evidence::degraded(e.to_string()),
        }
    }
}

/// Side-channel lookups gathered alongside the page fetch.
#[derive(Debug, Clone)]
pub struct EvidenceBundle {
    pub dns: DnsInfo,
    pub ssl: Evidence<SslInfo>,
    pub whois: Evidence<WhoisInfo>,
}

/// Existence of the two well-known SEO files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteFiles {
    pub robots_txt: bool,
    pub sitemap_xml: bool,
}

/// One overall time budget shared by every source of a run. Without a
/// deadline each source keeps its own timeout.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    pub fn new(total: Option<Duration>) -> Self {
        Self {
            expires_at: total.map(|d| Instant::now() + d),
        }
    }

    /// The source's own timeout, capped by what is left of the deadline.
    pub fn budget(&self, own: Duration) -> Duration {
        match self.expires_at {
            Some(at) => own.min(at.saturating_duration_since(Instant::now())),
            None => own,
        }
    }
}

/// Seam between the orchestrator and the network.
#[async_trait]
pub trait EvidenceProvider: Send + Sync {
    async fn fetch_page(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchFailure>;

    async fn resolve_dns(&self, host: &str, timeout: Duration) -> DnsInfo;

    async fn inspect_tls(&self, host: &str, timeout: Duration) -> Evidence<SslInfo>;

    async fn lookup_whois(&self, host: &str, timeout: Duration) -> Evidence<WhoisInfo>;

    /// `true` only for an HTTP 200 answer; every failure reads as absent.
    async fn resource_exists(&self, url: &Url, timeout: Duration) -> bool;
}

/// Live implementation backed by reqwest, hickory, OpenSSL and raw WHOIS.
pub struct NetworkEvidence {
    page_client: Client,
    probe_client: Client,
    resolver: TokioAsyncResolver,
    whois: WhoisClient,
}

impl NetworkEvidence {
    pub fn new(config: &Config) -> Result<Self, AnalysisError> {
        let page_client = crate::http_client::create_page_client(config)
            .map_err(|e| AnalysisError::Client(format!("page client: {}", e)))?;
        let probe_client = crate::http_client::create_probe_client(config)
            .map_err(|e| AnalysisError::Client(format!("probe client: {}", e)))?;
        Ok(Self {
            page_client,
            probe_client,
            resolver: dns::create_resolver(config.dns_timeout()),
            whois: WhoisClient::new(),
        })
    }
}

#[async_trait]
impl EvidenceProvider for NetworkEvidence {
    async fn fetch_page(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchFailure> {
        page::fetch(&self.page_client, url, timeout).await
    }

    async fn resolve_dns(&self, host: &str, timeout: Duration) -> DnsInfo {
        dns::resolve(&self.resolver, host, timeout).await
    }

    async fn inspect_tls(&self, host: &str, timeout: Duration) -> Evidence<SslInfo> {
        tls::inspect(host, timeout).await
    }

    async fn lookup_whois(&self, host: &str, timeout: Duration) -> Evidence<WhoisInfo> {
        self.whois.lookup(host, timeout).await
    }

    async fn resource_exists(&self, url: &Url, timeout: Duration) -> bool {
        site_files::exists(&self.probe_client, url, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_caps_budget() {
        let unbounded = Deadline::new(None);
        assert_eq!(unbounded.budget(Duration::from_secs(10)), Duration::from_secs(10));

        let tight = Deadline::new(Some(Duration::from_secs(2)));
        assert!(tight.budget(Duration::from_secs(10)) <= Duration::from_secs(2));
        assert!(tight.budget(Duration::from_millis(500)) <= Duration::from_millis(500));

        let spent = Deadline::new(Some(Duration::ZERO));
        assert_eq!(spent.budget(Duration::from_secs(10)), Duration::ZERO);
    }

    #[test]
    fn degraded_evidence_serializes_as_error_object() {
        let ev: Evidence<SslInfo> = Evidence::degraded("connection refused");
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v, serde_json::json!({"error": "connection refused"}));
        assert!(ev.is_degraded());
    }

    #[test]
    fn evidence_from_result() {
        let ok: Evidence<u8> = Ok::<u8, String>(3).into();
        assert_eq!(ok, Evidence::Found(3));
        let err: Evidence<u8> = Err::<u8, String>("boom".into()).into();
        assert_eq!(err, Evidence::degraded("boom"));
    }
}
