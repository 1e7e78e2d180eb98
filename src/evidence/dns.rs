use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use serde::Serialize;
use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MxRecord {
    pub exchange: String,
    pub priority: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DnsRecords {
    pub mx: Vec<MxRecord>,
    pub txt: Vec<String>,
    pub ns: Vec<String>,
}

/// A/MX/TXT/NS answers. A failed record type is simply empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DnsInfo {
    pub addresses: Vec<String>,
    pub records: DnsRecords,
}

impl DnsInfo {
    /// Addresses, name servers and TXT records as one lowercase string, the
    /// haystack for hosting-provider signatures.
    pub fn hosting_haystack(&self) -> String {
        self.addresses
            .iter()
            .chain(self.records.ns.iter())
            .chain(self.records.txt.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// System resolver configuration when readable, public defaults otherwise.
/// One attempt per query: nothing in an analysis run is retried.
pub fn create_resolver(timeout: Duration) -> TokioAsyncResolver {
    let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
        Ok(conf) => conf,
        Err(e) => {
            tracing::debug!("System DNS config unavailable ({}), using defaults", e);
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };
    opts.timeout = timeout;
    opts.attempts = 1;
    TokioAsyncResolver::tokio(config, opts)
}

pub async fn resolve(resolver: &TokioAsyncResolver, host: &str, timeout: Duration) -> DnsInfo {
    tracing::info!(host, "Starting DNS queries");

    let addresses = async {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip.to_string()]);
        }
        resolver
            .ipv4_lookup(host)
            .await
            .map(|lookup| lookup.iter().map(|a| a.to_string()).collect::<Vec<_>>())
    };
    let mx = async {
        resolver.mx_lookup(host).await.map(|lookup| {
            lookup
                .iter()
                .map(|mx| MxRecord {
                    exchange: trim_root(&mx.exchange().to_utf8()),
                    priority: mx.preference(),
                })
                .collect::<Vec<_>>()
        })
    };
    let txt = async {
        resolver.txt_lookup(host).await.map(|lookup| {
            lookup
                .iter()
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
        })
    };
    let ns = async {
        resolver
            .ns_lookup(host)
            .await
            .map(|lookup| lookup.iter().map(|ns| trim_root(&ns.to_string())).collect::<Vec<_>>())
    };

    let (addresses, mx, txt, ns) = tokio::join!(
        degrade("A", timeout, addresses),
        degrade("MX", timeout, mx),
        degrade("TXT", timeout, txt),
        degrade("NS", timeout, ns),
    );

    if !addresses.is_empty() {
        tracing::info!("IP addresses found: {}", addresses.join(", "));
    }

    DnsInfo {
        addresses,
        records: DnsRecords { mx, txt, ns },
    }
}

/// Run one lookup under its own timeout; any failure becomes an empty list.
async fn degrade<T, E, F>(kind: &str, timeout: Duration, lookup: F) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(records)) => records,
        Ok(Err(e)) => {
            tracing::warn!("No {} record found: {}", kind, e);
            Vec::new()
        }
        Err(_) => {
            tracing::warn!("{} lookup timed out after {:?}", kind, timeout);
            Vec::new()
        }
    }
}

fn trim_root(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haystack_joins_addresses_ns_and_txt() {
        let info = DnsInfo {
            addresses: vec!["76.76.21.21".into()],
            records: DnsRecords {
                mx: vec![MxRecord { exchange: "mx.example.com".into(), priority: 10 }],
                txt: vec!["v=spf1 include:_spf.Google.com".into()],
                ns: vec!["NS1.Vercel-DNS.com".into()],
            },
        };
        let hay = info.hosting_haystack();
        assert_eq!(hay, "76.76.21.21 ns1.vercel-dns.com v=spf1 include:_spf.google.com");
        assert!(!hay.contains("mx.example.com"));
    }

    #[test]
    fn empty_info_serializes_with_all_lists() {
        let v = serde_json::to_value(DnsInfo::default()).unwrap();
        assert_eq!(v, serde_json::json!({"addresses": [], "records": {"mx": [], "txt": [], "ns": []}}));
    }

    #[tokio::test]
    async fn failing_lookup_degrades_to_empty() {
        let out: Vec<String> = degrade("A", Duration::from_secs(1), async { Err::<Vec<String>, _>("NXDOMAIN") }).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn slow_lookup_degrades_to_empty() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, String>(vec!["1.2.3.4".to_string()])
        };
        let out = degrade("A", Duration::from_millis(10), slow).await;
        assert!(out.is_empty());
    }
}
