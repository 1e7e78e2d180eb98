/// WHOIS lookup (RFC 3912, TCP port 43)
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::Evidence;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WhoisInfo {
    pub registrar: Option<String>,
    pub creation_date: Option<String>,
    pub updated_date: Option<String>,
    pub expiration_date: Option<String>,
    pub name_servers: Vec<String>,
    #[serde(skip)]
    pub referral_server: Option<String>,
}

pub struct WhoisClient {
    port: u16,
}

impl WhoisClient {
    pub fn new() -> Self {
        Self { port: 43 }
    }

    pub async fn lookup(&self, host: &str, timeout: Duration) -> Evidence<WhoisInfo> {
        if host.parse::<std::net::IpAddr>().is_ok() {
            return Evidence::degraded(format!("WHOIS lookup needs a domain name, got address {}", host));
        }
        let domain = registrable_domain(host);
        tracing::info!(domain = %domain, "Running WHOIS query");
        match tokio::time::timeout(timeout, self.query_with_referral(&domain)).await {
            Ok(Ok(info)) => {
                tracing::info!("WHOIS data received");
                Evidence::Found(info)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "WHOIS query failed");
                Evidence::degraded(e)
            }
            Err(_) => {
                tracing::warn!("WHOIS query timed out");
                Evidence::degraded(format!("WHOIS query timed out after {}s", timeout.as_secs()))
            }
        }
    }

    /// Ask the registry, then the registrar it points to (if any). Fields the
    /// registrar leaves out are kept from the registry answer. TLDs without a
    /// known registry go through IANA first, which only names the registry.
    async fn query_with_referral(&self, domain: &str) -> Result<WhoisInfo, String> {
        let mut server = whois_server(domain).to_string();
        if server.eq_ignore_ascii_case(IANA_SERVER) {
            let answer = parse_response(&self.query(IANA_SERVER, domain).await?);
            server = registry_from_iana(answer, domain)?;
            tracing::debug!(server = %server, "IANA named the TLD registry");
        }
        let registry = parse_response(&self.query(&server, domain).await?);

        let referral = match registry.referral_server.as_deref() {
            Some(r) if !r.eq_ignore_ascii_case(&server) && !r.eq_ignore_ascii_case(IANA_SERVER) => r.to_string(),
            _ => return Ok(registry),
        };

        match self.query(&referral, domain).await {
            Ok(raw) => Ok(merge(parse_response(&raw), registry)),
            Err(e) => {
                tracing::debug!(server = %referral, error = %e, "Registrar WHOIS referral failed");
                Ok(registry)
            }
        }
    }

    async fn query(&self, server: &str, domain: &str) -> Result<String, String> {
        let mut stream = TcpStream::connect((server, self.port))
            .await
            .map_err(|e| format!("Failed to connect to WHOIS server {}: {}", server, e))?;

        stream
            .write_all(format!("{}\r\n", domain).as_bytes())
            .await
            .map_err(|e| format!("Failed to send query: {}", e))?;

        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        let response = String::from_utf8_lossy(&buf).into_owned();
        if response.trim().is_empty() {
            return Err(format!("empty WHOIS response from {}", server));
        }
        Ok(response)
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

const IANA_SERVER: &str = "whois.iana.org";

/// An IANA answer describes the TLD itself, so its dates and name servers say
/// nothing about the domain. Only the registry pointer is kept.
fn registry_from_iana(answer: WhoisInfo, domain: &str) -> Result<String, String> {
    answer
        .referral_server
        .filter(|s| !s.eq_ignore_ascii_case(IANA_SERVER))
        .ok_or_else(|| format!("no WHOIS registry known for {}", domain))
}

/// Registry server by TLD.
pub fn whois_server(domain: &str) -> &'static str {
    let tld = domain.rsplit('.').next().unwrap_or("");

    match tld {
        "com" | "net" => "whois.verisign-grs.com",
        "org" => "whois.pir.org",
        "io" => "whois.nic.io",
        "ai" => "whois.nic.ai",
        "dev" | "app" => "whois.nic.google",
        "tr" => "whois.nic.tr",
        "br" => "whois.registro.br",
        "uk" => "whois.nic.uk",
        "de" => "whois.denic.de",
        "fr" => "whois.nic.fr",
        "jp" => "whois.jprs.jp",
        "cn" => "whois.cnnic.cn",
        "ru" => "whois.tcinet.ru",
        _ => IANA_SERVER,
    }
}

/// Registries only know registered names, so `www.example.com` is asked as
/// `example.com`. Two-level public suffixes such as `co.uk` keep three labels.
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }
    let second = labels[labels.len() - 2];
    let keep = if ["co", "com", "net", "org", "gov", "edu", "ac", "gen", "web"].contains(&second) {
        3
    } else {
        2
    };
    labels[labels.len().saturating_sub(keep)..].join(".")
}

fn value_after_colon(line: &str) -> String {
    line.splitn(2, ':').nth(1).unwrap_or("").trim().to_string()
}

pub fn parse_response(response: &str) -> WhoisInfo {
    let mut info = WhoisInfo::default();

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
            continue;
        }
        let lower = line.to_lowercase();

        if lower.starts_with("registrar whois server:") || lower.starts_with("whois:") {
            let server = value_after_colon(line);
            if !server.is_empty() && info.referral_server.is_none() {
                info.referral_server = Some(server);
            }
            continue;
        }

        if (lower.starts_with("registrar:") || lower.starts_with("sponsoring registrar:"))
            && info.registrar.is_none()
        {
            let v = value_after_colon(line);
            if !v.is_empty() {
                info.registrar = Some(v);
            }
        }

        if (lower.starts_with("creation date:") || lower.starts_with("created:") || lower.starts_with("created on:"))
            && info.creation_date.is_none()
        {
            info.creation_date = Some(value_after_colon(line));
        }

        if (lower.starts_with("updated date:") || lower.starts_with("last updated:") || lower.starts_with("changed:"))
            && info.updated_date.is_none()
        {
            info.updated_date = Some(value_after_colon(line));
        }

        if (lower.starts_with("registry expiry date:")
            || lower.starts_with("registrar registration expiration date:")
            || lower.starts_with("expiry date:")
            || lower.starts_with("expires:"))
            && info.expiration_date.is_none()
        {
            info.expiration_date = Some(value_after_colon(line));
        }

        if lower.starts_with("name server:") || lower.starts_with("nserver:") {
            let ns = value_after_colon(line).to_lowercase();
            if !ns.is_empty() && !info.name_servers.contains(&ns) {
                info.name_servers.push(ns);
            }
        }
    }

    info
}

fn merge(primary: WhoisInfo, fallback: WhoisInfo) -> WhoisInfo {
    WhoisInfo {
        registrar: primary.registrar.or(fallback.registrar),
        creation_date: primary.creation_date.or(fallback.creation_date),
        updated_date: primary.updated_date.or(fallback.updated_date),
        expiration_date: primary.expiration_date.or(fallback.expiration_date),
        name_servers: if primary.name_servers.is_empty() {
            fallback.name_servers
        } else {
            primary.name_servers
        },
        referral_server: primary.referral_server.or(fallback.referral_server),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERISIGN_SAMPLE: &str = "   Domain Name: EXAMPLE.COM
   Registry Domain ID: 2336799_DOMAIN_COM-VRSN
   Registrar WHOIS Server: whois.iana.org
   Updated Date: 2024-08-14T07:01:34Z
   Creation Date: 1995-08-14T04:00:00Z
   Registry Expiry Date: 2025-08-13T04:00:00Z
   Registrar: RESERVED-Internet Assigned Numbers Authority
   Name Server: A.IANA-SERVERS.NET
   Name Server: B.IANA-SERVERS.NET
>>> Last update of whois database: 2024-10-01T00:00:00Z <<<
";

    #[test]
    fn test_whois_server() {
        assert_eq!(whois_server("example.com"), "whois.verisign-grs.com");
        assert_eq!(whois_server("example.org"), "whois.pir.org");
        assert_eq!(whois_server("example.io"), "whois.nic.io");
        assert_eq!(whois_server("example.unknown"), "whois.iana.org");
    }

    #[test]
    fn registrable_domain_strips_subdomains() {
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("shop.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("a.b.example.com.tr"), "example.com.tr");
    }

    #[test]
    fn parses_registry_answer() {
        let info = parse_response(VERISIGN_SAMPLE);
        assert_eq!(info.registrar.as_deref(), Some("RESERVED-Internet Assigned Numbers Authority"));
        assert_eq!(info.creation_date.as_deref(), Some("1995-08-14T04:00:00Z"));
        assert_eq!(info.updated_date.as_deref(), Some("2024-08-14T07:01:34Z"));
        assert_eq!(info.expiration_date.as_deref(), Some("2025-08-13T04:00:00Z"));
        assert_eq!(info.name_servers, vec!["a.iana-servers.net", "b.iana-servers.net"]);
        assert_eq!(info.referral_server.as_deref(), Some("whois.iana.org"));
    }

    const IANA_XYZ_SAMPLE: &str = "% IANA WHOIS server
% for more information on IANA, visit http://www.iana.org

domain:       XYZ

organisation: XYZ.COM LLC
address:      Las Vegas NV 89145
address:      United States of America (the)

nserver:      X.NIC.XYZ 194.169.218.42
nserver:      Y.NIC.XYZ 185.24.64.42
whois:        whois.nic.xyz

status:       ACTIVE
remarks:      Registration information: http://nic.xyz

created:      2014-01-16
changed:      2023-11-08
source:       IANA
";

    #[test]
    fn iana_answer_only_names_the_registry() {
        let answer = parse_response(IANA_XYZ_SAMPLE);
        assert_eq!(
            registry_from_iana(answer, "example.xyz").as_deref(),
            Ok("whois.nic.xyz")
        );
    }

    #[test]
    fn iana_answer_without_registry_is_an_error() {
        let answer = parse_response("% IANA WHOIS server\ndomain: EXAMPLE\ncreated: 1985-01-01\n");
        assert!(registry_from_iana(answer, "foo.example").is_err());
    }

    #[tokio::test]
    async fn address_hosts_are_not_queried() {
        let ev = WhoisClient::new().lookup("192.0.2.1", Duration::from_secs(1)).await;
        assert!(ev.is_degraded());
    }

    #[test]
    fn missing_fields_stay_empty() {
        let info = parse_response("% no match for domain\n");
        assert_eq!(info, WhoisInfo::default());
    }

    #[test]
    fn registrar_answer_wins_over_registry() {
        let registry = parse_response(VERISIGN_SAMPLE);
        let registrar = parse_response("Registrar: Example Registrar, Inc.\n");
        let merged = merge(registrar, registry);
        assert_eq!(merged.registrar.as_deref(), Some("Example Registrar, Inc."));
        assert_eq!(merged.creation_date.as_deref(), Some("1995-08-14T04:00:00Z"));
        assert_eq!(merged.name_servers.len(), 2);
    }
}
