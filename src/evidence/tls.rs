use openssl::asn1::Asn1Time;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use openssl::x509::{X509Ref, X509VerifyResult};
use serde::Serialize;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::Evidence;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SslInfo {
    /// Chain, hostname and validity window all verified.
    pub valid: bool,
    pub issuer: String,
    pub valid_from: String,
    pub valid_to: String,
    pub days_remaining: i64,
    pub valid_for: Vec<String>,
}

pub async fn inspect(host: &str, timeout: Duration) -> Evidence<SslInfo> {
    tracing::info!(host, "Checking SSL certificate");
    let owned = host.to_string();
    let task = tokio::task::spawn_blocking(move || inspect_certificate(&owned, timeout));

    let result = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(res)) => res,
        Ok(Err(join_err)) => Err(format!("certificate task failed: {}", join_err)),
        Err(_) => Err(format!("certificate check timed out after {}s", timeout.as_secs())),
    };

    match result {
        Ok(info) => {
            if info.valid {
                tracing::info!(host, days_remaining = info.days_remaining, "SSL certificate valid");
            } else {
                tracing::warn!(host, "SSL certificate invalid");
            }
            Evidence::Found(info)
        }
        Err(e) => {
            tracing::warn!(host, error = %e, "SSL analysis failed");
            Evidence::degraded(e)
        }
    }
}

/// Connect to host:443 and read the peer certificate.
///
/// The handshake runs without enforcing verification so that expired or
/// mismatched certificates are still reported; the verification verdict is
/// read back afterwards.
pub fn inspect_certificate(host: &str, timeout: Duration) -> Result<SslInfo, String> {
    let addr = format!("{}:443", host);
    let sock = addr
        .to_socket_addrs()
        .map_err(|e| format!("could not resolve {}: {}", host, e))?
        .next()
        .ok_or_else(|| format!("no address for {}", host))?;

    let stream = TcpStream::connect_timeout(&sock, timeout).map_err(|e| e.to_string())?;
    stream.set_read_timeout(Some(timeout)).map_err(|e| e.to_string())?;
    stream.set_write_timeout(Some(timeout)).map_err(|e| e.to_string())?;

    let mut builder = SslConnector::builder(SslMethod::tls()).map_err(|e| e.to_string())?;
    builder.set_verify(SslVerifyMode::NONE);
    let connector = builder.build();

    let ssl_stream = connector.connect(host, stream).map_err(|e| e.to_string())?;
    let ssl = ssl_stream.ssl();
    let cert = ssl
        .peer_certificate()
        .ok_or_else(|| "server presented no certificate".to_string())?;

    let days_remaining = days_until_expiry(&cert)?;
    let chain_ok = ssl.verify_result() == X509VerifyResult::OK;

    Ok(SslInfo {
        valid: chain_ok && days_remaining >= 0,
        issuer: issuer_name(&cert),
        valid_from: cert.not_before().to_string(),
        valid_to: cert.not_after().to_string(),
        days_remaining,
        valid_for: subject_dns_names(&cert),
    })
}

fn days_until_expiry(cert: &X509Ref) -> Result<i64, String> {
    let now = Asn1Time::days_from_now(0).map_err(|e| e.to_string())?;
    let diff = now.diff(cert.not_after()).map_err(|e| e.to_string())?;
    Ok(diff.days as i64)
}

fn issuer_name(cert: &X509Ref) -> String {
    cert.issuer_name()
        .entries()
        .next()
        .and_then(|entry| entry.data().to_string().ok())
        .unwrap_or_default()
}

fn subject_dns_names(cert: &X509Ref) -> Vec<String> {
    cert.subject_alt_names()
        .map(|names| {
            names
                .iter()
                .filter_map(|n| n.dnsname().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
