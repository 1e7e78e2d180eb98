use std::fs;
use std::path::Path;

use crate::analyze::{SslReport, WhoisReport};
use crate::report::AnalysisReport;

const RULE: &str = "═══════════════════════════════════════════════════════════\n";

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn flag(on: bool) -> &'static str {
    if on {
        "[OK]"
    } else {
        "[--]"
    }
}

/// Print clean CLI output - only the headline facts
pub fn print_summary(report: &AnalysisReport, duration_ms: u64) {
    println!("\n{}", "=".repeat(60));
    println!("              ANALYSIS COMPLETE");
    println!("{}", "=".repeat(60));

    println!("\n[*] Summary:");
    println!("   URL: {}", report.url);
    println!("   Status: {}", report.status);
    println!("   Duration: {}ms", duration_ms);

    let b = &report.backend;
    println!("\n[*] Backend:");
    println!("   Server: {}", b.server);
    println!("   Language: {}", b.programming_language);
    println!("   Frameworks: {}", list(&b.detected_frameworks));
    println!("   CMS: {}", b.cms);

    let f = &report.frontend;
    println!("\n[*] Frontend:");
    println!("   JavaScript: {}", list(&f.javascript_frameworks));
    println!("   CSS: {}", list(&f.css_frameworks));
    println!("   UI: {}", list(&f.ui_libraries));

    let s = &report.security;
    println!("\n[*] Security:");
    println!("   {} SSL", flag(s.ssl.is_valid()));
    println!("   {} CORS", flag(s.security_features.cors_enabled));
    println!("   {} XSS protection", flag(s.security_features.xss_protection));
    println!("   {} HSTS", flag(s.security_features.hsts_enabled));

    let p = &report.performance;
    println!("\n[*] Performance:");
    println!("   Response time: {}ms", p.response_time);
    println!("   Page size: {:.2} KB", p.page_size as f64 / 1024.0);
    println!("   {} GZIP", flag(p.gzip_enabled));
    println!();
}

/// Save the report: pretty JSON for `.json`, plain text otherwise.
pub fn save_report(report: &AnalysisReport, path: &Path) -> anyhow::Result<()> {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("txt");

    match extension {
        "json" => {
            let json = serde_json::to_string_pretty(report)?;
            fs::write(path, json)?;
        }
        _ => {
            fs::write(path, format_text_report(report))?;
        }
    }
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}

pub fn format_text_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push_str("                 WEB TECHNOLOGY REPORT\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("URL: {}\n", report.url));
    out.push_str(&format!("Status: {}\n\n", report.status));

    let b = &report.backend;
    out.push_str("Backend:\n");
    out.push_str(&format!("  - Server: {}\n", b.server));
    out.push_str(&format!("  - Powered by: {}\n", b.powered_by));
    out.push_str(&format!("  - Language: {}\n", b.programming_language));
    out.push_str(&format!("  - Frameworks: {}\n", list(&b.detected_frameworks)));
    out.push_str(&format!("  - CMS: {}\n", b.cms));
    out.push_str(&format!("  - Database: {}\n", b.database));
    out.push_str(&format!("  - Cache: {}\n\n", b.cache_system));

    let f = &report.frontend;
    out.push_str("Frontend:\n");
    out.push_str(&format!("  - JavaScript frameworks: {}\n", list(&f.javascript_frameworks)));
    out.push_str(&format!("  - CSS frameworks: {}\n", list(&f.css_frameworks)));
    out.push_str(&format!("  - UI libraries: {}\n", list(&f.ui_libraries)));
    out.push_str(&format!("  - Build tools: {}\n", list(&f.build_tools)));
    out.push_str(&format!("  - State management: {}\n", list(&f.state_management)));
    out.push_str(&format!("  - Testing: {}\n", list(&f.testing_frameworks)));
    out.push_str(&format!("  - Analytics: {}\n", list(&f.analytics_tools)));
    out.push_str(&format!("  - CDN: {}\n\n", list(&f.cdn_libraries)));

    let s = &report.security;
    out.push_str("Security:\n");
    out.push_str(&format!("  - Content-Security-Policy: {}\n", s.headers.content_security_policy));
    out.push_str(&format!("  - X-Frame-Options: {}\n", s.headers.x_frame_options));
    out.push_str(&format!("  - X-XSS-Protection: {}\n", s.headers.x_xss_protection));
    out.push_str(&format!("  - X-Content-Type-Options: {}\n", s.headers.x_content_type_options));
    out.push_str(&format!("  - Strict-Transport-Security: {}\n", s.headers.strict_transport_security));
    out.push_str(&format!("  - Referrer-Policy: {}\n", s.headers.referrer_policy));
    match &s.ssl {
        SslReport::Checked(info) => out.push_str(&format!(
            "  - SSL: valid={} issuer={} expires={} ({} days)\n\n",
            info.valid, info.issuer, info.valid_to, info.days_remaining
        )),
        SslReport::Failed { error, .. } => out.push_str(&format!("  - SSL: unavailable ({})\n\n", error)),
    }

    let srv = &report.server;
    out.push_str("Server:\n");
    out.push_str(&format!("  - Type: {}\n", srv.server_type));
    out.push_str(&format!("  - Hosting: {}\n", srv.hosting_provider));
    out.push_str(&format!("  - IP addresses: {}\n", list(&srv.ip_addresses)));
    out.push_str(&format!("  - NS: {}\n", list(&srv.dns_records.ns)));
    match &srv.whois {
        WhoisReport::Available(w) => {
            out.push_str(&format!("  - Registrar: {}\n", w.registrar));
            out.push_str(&format!("  - Created: {}\n", w.creation_date));
            out.push_str(&format!("  - Expires: {}\n\n", w.expiration_date));
        }
        WhoisReport::Unavailable { error } => out.push_str(&format!("  - WHOIS: unavailable ({})\n\n", error)),
    }

    let seo = &report.seo;
    out.push_str("SEO:\n");
    out.push_str(&format!("  - Title: {}\n", seo.title));
    out.push_str(&format!("  - Description: {}\n", seo.meta_description));
    out.push_str(&format!("  - Canonical: {}\n", seo.canonical_url));
    out.push_str(&format!("  - robots.txt: {}\n", seo.robots_txt));
    out.push_str(&format!("  - sitemap.xml: {}\n\n", seo.sitemap_xml));

    let p = &report.performance;
    out.push_str("Performance:\n");
    out.push_str(&format!("  - Response time: {}ms\n", p.response_time));
    out.push_str(&format!("  - Page size: {} bytes\n", p.page_size));
    out.push_str(&format!("  - GZIP: {}\n", p.gzip_enabled));
    out.push_str(&format!("  - Cache-Control: {}\n", p.cache_control));

    out.push('\n');
    out.push_str(RULE);
    out.push_str("                      END OF REPORT\n");
    out.push_str(RULE);
    out
}
