use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub max_redirects: usize,
    pub dns_timeout_secs: u64,
    pub tls_timeout_secs: u64,
    pub whois_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    /// Overall budget shared by every evidence source of one run.
    pub analysis_deadline_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: 30,
            max_redirects: 5,
            dns_timeout_secs: 5,
            tls_timeout_secs: 10,
            whois_timeout_secs: 10,
            probe_timeout_secs: 10,
            analysis_deadline_secs: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_json::from_str(&data)?;
        Ok(cfg)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    pub fn tls_timeout(&self) -> Duration {
        Duration::from_secs(self.tls_timeout_secs)
    }

    pub fn whois_timeout(&self) -> Duration {
        Duration::from_secs(self.whois_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn analysis_deadline(&self) -> Option<Duration> {
        self.analysis_deadline_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"fetch_timeout_secs": 12, "analysis_deadline_secs": 20}"#).unwrap();
        assert_eq!(cfg.fetch_timeout_secs, 12);
        assert_eq!(cfg.max_redirects, 5);
        assert_eq!(cfg.analysis_deadline(), Some(Duration::from_secs(20)));
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    }
}
