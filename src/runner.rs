use anyhow::Context;
use std::net::SocketAddr;
use std::time::Instant;

use crate::cli::{Cli, Commands};
use tech_hunter::config::Config;
use tech_hunter::orchestrator::SiteAnalyzer;
use tech_hunter::output::{print_summary, save_report};
use tech_hunter::server::{self, AppState};

const DEFAULT_PORT: u16 = 3000;

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Our crate at the requested level; HTTP and DNS internals stay quiet.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!(
        "tech_hunter={crate},reqwest=info,hyper=info,h2=info,hickory_resolver=warn,hickory_proto=warn",
        crate = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();

    let mut config = match cli.config {
        Some(ref path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Analyze { url, json, report, timeout, deadline } => {
            if let Some(secs) = timeout {
                config.fetch_timeout_secs = secs;
            }
            if deadline.is_some() {
                config.analysis_deadline_secs = deadline;
            }

            let analyzer = SiteAnalyzer::new(config).context("failed to set up analyzer")?;
            let started = Instant::now();
            let result = analyzer.analyze(&url).await;
            let result = match result {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("[!] {}", e.user_message());
                    return Err(e).context(format!("analysis of {} failed", url));
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result, started.elapsed().as_millis() as u64);
            }

            if let Some(path) = report {
                save_report(&result, &path)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
                if !json {
                    println!("[=] Report saved to: {}", path.display());
                }
            }
        }
        Commands::Serve { bind, deadline } => {
            if deadline.is_some() {
                config.analysis_deadline_secs = deadline;
            }
            let addr = resolve_bind(bind)?;
            let analyzer = SiteAnalyzer::new(config).context("failed to set up analyzer")?;
            tracing::info!(deadline = ?analyzer.config().analysis_deadline(), "Analyzer ready");
            println!("[>] Listening on http://{}", addr);
            server::serve(addr, AppState::new(analyzer)).await?;
        }
    }
    Ok(())
}

fn resolve_bind(bind: Option<String>) -> anyhow::Result<SocketAddr> {
    let raw = match bind {
        Some(b) => b,
        None => {
            let port = match std::env::var("PORT") {
                Ok(p) => p.parse::<u16>().with_context(|| format!("invalid PORT value '{}'", p))?,
                Err(_) => DEFAULT_PORT,
            };
            format!("0.0.0.0:{}", port)
        }
    };
    raw.parse()
        .with_context(|| format!("invalid bind address '{}'", raw))
}
