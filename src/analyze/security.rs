use serde::Serialize;

use crate::evidence::{Evidence, SslInfo};
use crate::report::{or_sentinel, NONE};
use crate::snapshot::{header_value, Headers};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityHeaders {
    #[serde(rename = "Content-Security-Policy")]
    pub content_security_policy: String,
    #[serde(rename = "X-Frame-Options")]
    pub x_frame_options: String,
    #[serde(rename = "X-XSS-Protection")]
    pub x_xss_protection: String,
    #[serde(rename = "X-Content-Type-Options")]
    pub x_content_type_options: String,
    #[serde(rename = "Strict-Transport-Security")]
    pub strict_transport_security: String,
    #[serde(rename = "Referrer-Policy")]
    pub referrer_policy: String,
}

impl SecurityHeaders {
    pub fn analyze(headers: &Headers) -> Self {
        let get = |name: &str| or_sentinel(header_value(headers, name), NONE);
        SecurityHeaders {
            content_security_policy: get("content-security-policy"),
            x_frame_options: get("x-frame-options"),
            x_xss_protection: get("x-xss-protection"),
            x_content_type_options: get("x-content-type-options"),
            strict_transport_security: get("strict-transport-security"),
            referrer_policy: get("referrer-policy"),
        }
    }
}

/// Certificate facts, or `{valid: false, error}` when the handshake never completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SslReport {
    Checked(SslInfo),
    Failed { valid: bool, error: String },
}

impl From<Evidence<SslInfo>> for SslReport {
    fn from(ev: Evidence<SslInfo>) -> Self {
        match ev {
            Evidence::Found(info) => SslReport::Checked(info),
            Evidence::Degraded { error } => SslReport::Failed { valid: false, error },
        }
    }
}

impl SslReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, SslReport::Checked(info) if info.valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityFeatures {
    pub cors_enabled: bool,
    pub csrf_protection: bool,
    pub xss_protection: bool,
    pub clickjacking_protection: bool,
    pub hsts_enabled: bool,
}

impl SecurityFeatures {
    pub fn analyze(headers: &Headers) -> Self {
        SecurityFeatures {
            cors_enabled: header_value(headers, "access-control-allow-origin").is_some(),
            // Placeholder: CSRF defenses live in forms and cookies, not in response headers.
            csrf_protection: false,
            // Only an explicit "0" disables the browser filter.
            xss_protection: headers
                .get("x-xss-protection")
                .map(|v| v != "0")
                .unwrap_or(true),
            clickjacking_protection: header_value(headers, "x-frame-options").is_some(),
            hsts_enabled: header_value(headers, "strict-transport-security").is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    pub headers: SecurityHeaders,
    pub ssl: SslReport,
    pub security_features: SecurityFeatures,
}

impl SecurityReport {
    pub fn analyze(headers: &Headers, ssl: Evidence<SslInfo>) -> Self {
        let report = SecurityReport {
            headers: SecurityHeaders::analyze(headers),
            ssl: ssl.into(),
            security_features: SecurityFeatures::analyze(headers),
        };
        tracing::debug!(
            hsts = report.security_features.hsts_enabled,
            cors = report.security_features.cors_enabled,
            ssl_valid = report.ssl.is_valid(),
            "Security posture evaluated"
        );
        report
    }
}
