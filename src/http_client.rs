use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::config::Config;

/// Client for the primary page fetch.
///
/// Auto-decompression is off so the `Content-Encoding` header reaches the
/// performance analyzer; the body is decoded in `evidence::page`.
pub fn create_page_client(config: &Config) -> reqwest::Result<Client> {
    base_builder(config)
        .timeout(config.fetch_timeout())
        .no_gzip()
        .no_brotli()
        .build()
}

/// Client for the robots.txt / sitemap.xml existence probes.
pub fn create_probe_client(config: &Config) -> reqwest::Result<Client> {
    base_builder(config)
        .timeout(config.probe_timeout())
        .gzip(true)
        .build()
}

fn base_builder(config: &Config) -> ClientBuilder {
    ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)
        .connect_timeout(Duration::from_secs(10))

        .use_rustls_tls()
        .tls_sni(true)
        .https_only(false)

        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .user_agent(config.user_agent.clone())

        // Misconfigured hosts must still yield their content
        .danger_accept_invalid_certs(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = Config::default();
        assert!(create_page_client(&config).is_ok());
        assert!(create_probe_client(&config).is_ok());
    }
}
