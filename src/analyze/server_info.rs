use serde::Serialize;

use crate::detect::catalog::HOSTING_PROVIDERS;
use crate::detect::Matcher;
use crate::evidence::{DnsInfo, DnsRecords, Evidence, WhoisInfo};
use crate::report::{or_sentinel, UNDETERMINED, UNSPECIFIED};
use crate::snapshot::{header_value, Headers};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhoisSummary {
    pub registrar: String,
    pub creation_date: String,
    pub updated_date: String,
    pub expiration_date: String,
    pub name_servers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WhoisReport {
    Available(WhoisSummary),
    Unavailable { error: String },
}

impl From<Evidence<WhoisInfo>> for WhoisReport {
    fn from(ev: Evidence<WhoisInfo>) -> Self {
        match ev {
            Evidence::Found(info) => {
                let field = |v: Option<String>| v.unwrap_or_else(|| UNSPECIFIED.to_string());
                WhoisReport::Available(WhoisSummary {
                    registrar: field(info.registrar),
                    creation_date: field(info.creation_date),
                    updated_date: field(info.updated_date),
                    expiration_date: field(info.expiration_date),
                    name_servers: info.name_servers,
                })
            }
            Evidence::Degraded { error } => WhoisReport::Unavailable { error },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerReport {
    pub server_type: String,
    pub hosting_provider: String,
    pub ip_addresses: Vec<String>,
    pub dns_records: DnsRecords,
    pub whois: WhoisReport,
    pub headers: Headers,
}

impl ServerReport {
    pub fn analyze(
        headers: &Headers,
        dns: DnsInfo,
        whois: Evidence<WhoisInfo>,
        matcher: &dyn Matcher,
    ) -> Self {
        let hosting_provider = detect_hosting_provider(&dns, matcher);
        ServerReport {
            server_type: or_sentinel(header_value(headers, "server"), UNDETERMINED),
            hosting_provider: or_sentinel(hosting_provider, UNDETERMINED),
            ip_addresses: dns.addresses,
            dns_records: dns.records,
            whois: whois.into(),
            headers: headers.clone(),
        }
    }
}

/// First provider in table order whose pattern appears in the A/NS/TXT answers.
pub fn detect_hosting_provider(dns: &DnsInfo, matcher: &dyn Matcher) -> Option<&'static str> {
    tracing::info!("Detecting hosting provider");
    let haystack = dns.hosting_haystack();
    let provider = matcher.match_category(&haystack, HOSTING_PROVIDERS).first().copied();
    match provider {
        Some(p) => tracing::info!(provider = p, "Hosting provider detected"),
        None => tracing::warn!("Hosting provider could not be determined"),
    }
    provider
}
