use clap::Parser;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed debug logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// JSON configuration file (timeouts, user agent, deadline)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fingerprint a single web page
    Analyze {
        /// Absolute http(s) URL to analyze
        url: String,

        /// Print the full JSON report instead of the summary
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Save the report to file (JSON or TXT format)
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Page fetch timeout in seconds (overrides config)
        #[arg(short = 't', long)]
        timeout: Option<u64>,

        /// Overall analysis deadline in seconds (overrides config)
        #[arg(long)]
        deadline: Option<u64>,
    },

    /// Run the HTTP API (/analyze, /traffic, /health)
    Serve {
        /// Listen address (default: 0.0.0.0:$PORT, PORT defaults to 3000)
        #[arg(short = 'b', long)]
        bind: Option<String>,

        /// Overall analysis deadline in seconds (overrides config)
        #[arg(long)]
        deadline: Option<u64>,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
