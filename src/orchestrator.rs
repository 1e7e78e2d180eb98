use std::sync::Arc;
use std::time::Instant;
use url::{Host, Url};

use crate::analyze::seo::probe_site_files;
use crate::analyze::{
    BackendReport, FrontendReport, PerformanceReport, SecurityReport, SeoReport, ServerReport,
};
use crate::config::Config;
use crate::detect::{Matcher, SubstringMatcher};
use crate::error::{AnalysisError, Result};
use crate::evidence::{Deadline, EvidenceBundle, EvidenceProvider, NetworkEvidence};
use crate::report::AnalysisReport;
use crate::snapshot::PageSnapshot;

/// Runs one analysis per call. Holds only read-only state, so a single
/// instance can serve concurrent requests.
pub struct SiteAnalyzer {
    config: Config,
    evidence: Arc<dyn EvidenceProvider>,
    matcher: Arc<dyn Matcher>,
}

impl SiteAnalyzer {
    /// Live analyzer talking to the network.
    pub fn new(config: Config) -> Result<Self> {
        let evidence = NetworkEvidence::new(&config)?;
        Ok(Self::with_provider(config, Arc::new(evidence)))
    }

    pub fn with_provider(config: Config, evidence: Arc<dyn EvidenceProvider>) -> Self {
        Self {
            config,
            evidence,
            matcher: Arc::new(SubstringMatcher),
        }
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn Matcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport> {
        let started = Instant::now();
        let url = url.trim();
        let target = parse_target(url)?;
        let host = lookup_host(&target)?;
        let deadline = Deadline::new(self.config.analysis_deadline());
        let matcher = self.matcher.as_ref();

        tracing::info!(url = %url, "Starting analysis");

        let fetched = match self
            .evidence
            .fetch_page(&target, deadline.budget(self.config.fetch_timeout()))
            .await
        {
            Ok(page) => page,
            Err(failure) => {
                tracing::error!(url = %url, error = %failure, "Analysis failed");
                return Err(AnalysisError::Fetch(failure));
            }
        };

        let page = PageSnapshot::new(url, fetched);
        tracing::debug!(
            scripts = page.document.scripts.len(),
            stylesheets = page.document.stylesheets.len(),
            "Collected scripts and stylesheets"
        );

        tracing::info!("Starting parallel lookups");
        let bundle = self.gather_evidence(&host, &deadline).await;

        let backend = BackendReport::analyze(&page, matcher);
        tracing::info!(frameworks = ?backend.detected_frameworks, "Backend analysis complete");
        let frontend = FrontendReport::analyze(&page, matcher);
        tracing::info!(js = ?frontend.javascript_frameworks, "Frontend analysis complete");

        let security = SecurityReport::analyze(&page.headers, bundle.ssl);
        tracing::info!("Security analysis complete");
        let server = ServerReport::analyze(&page.headers, bundle.dns, bundle.whois, matcher);
        tracing::info!("Server analysis complete");

        let files = probe_site_files(
            self.evidence.as_ref(),
            &target,
            deadline.budget(self.config.probe_timeout()),
        )
        .await;
        let seo = SeoReport::analyze(&page, files);
        tracing::info!("SEO analysis complete");

        let performance = PerformanceReport::analyze(&page);
        tracing::info!("Performance analysis complete");

        tracing::info!(total_ms = started.elapsed().as_millis() as u64, "Analysis finished");
        Ok(AnalysisReport {
            url: page.url.clone(),
            status: page.status,
            backend,
            frontend,
            security,
            server,
            seo,
            performance,
        })
    }

    /// DNS, TLS and WHOIS concurrently; none of them can fail the run.
    async fn gather_evidence(&self, host: &str, deadline: &Deadline) -> EvidenceBundle {
        let cfg = &self.config;
        let (dns, ssl, whois) = tokio::join!(
            self.evidence.resolve_dns(host, deadline.budget(cfg.dns_timeout())),
            self.evidence.inspect_tls(host, deadline.budget(cfg.tls_timeout())),
            self.evidence.lookup_whois(host, deadline.budget(cfg.whois_timeout())),
        );
        tracing::info!(addresses = dns.addresses.len(), "DNS analysis complete");
        tracing::info!(degraded = ssl.is_degraded(), "SSL analysis complete");
        tracing::info!(degraded = whois.is_degraded(), "WHOIS analysis complete");
        EvidenceBundle { dns, ssl, whois }
    }
}

/// Absolute http(s) URL with a host, or `InvalidInput`.
pub fn parse_target(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AnalysisError::InvalidInput("URL parameter is required".into()));
    }
    let url = Url::parse(raw)
        .map_err(|e| AnalysisError::InvalidInput(format!("invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AnalysisError::InvalidInput(format!(
                "unsupported URL scheme '{}', expected http or https",
                other
            )))
        }
    }
    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(AnalysisError::InvalidInput(format!("URL '{}' has no host", raw)));
    }
    Ok(url)
}

/// Host as DNS/TLS/WHOIS expect it: IPv6 literals without brackets.
fn lookup_host(url: &Url) -> Result<String> {
    match url.host() {
        Some(Host::Domain(d)) => Ok(d.to_string()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        None => Err(AnalysisError::InvalidInput(format!("URL '{}' has no host", url))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_target("https://example.com").is_ok());
        assert!(parse_target("  http://example.com/path?q=1 ").is_ok());
    }

    #[test]
    fn rejects_bad_targets() {
        for raw in ["", "example.com", "ftp://example.com", "mailto:a@b.c", "http://"] {
            let err = parse_target(raw).unwrap_err();
            assert!(err.is_client_error(), "{} should be rejected", raw);
        }
    }

    #[test]
    fn ipv6_host_loses_brackets() {
        let url = parse_target("http://[::1]:8080/").unwrap();
        assert_eq!(lookup_host(&url).unwrap(), "::1");
    }
}
