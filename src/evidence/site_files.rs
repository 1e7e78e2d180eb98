use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Absolute URL of a root-relative file such as `/robots.txt`.
pub fn site_file_url(base: &Url, path: &str) -> Option<Url> {
    base.join(path).ok()
}

pub async fn exists(client: &Client, url: &Url, timeout: Duration) -> bool {
    tracing::debug!(url = %url, "Checking site file");
    match client.get(url.clone()).timeout(timeout).send().await {
        Ok(resp) => {
            let found = resp.status().as_u16() == 200;
            if found {
                tracing::info!(url = %url, "Site file found");
            } else {
                tracing::warn!(url = %url, status = resp.status().as_u16(), "Site file not found");
            }
            found
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Site file not found");
            false
        }
    }
}
