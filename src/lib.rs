pub mod analyze;
pub mod config;
pub mod detect;
pub mod error;
pub mod evidence;
pub mod http_client;
pub mod orchestrator;
pub mod output;
pub mod report;
pub mod server;
pub mod snapshot;

pub use crate::config::Config;
pub use crate::error::{AnalysisError, FetchFailure, FetchFailureKind, Result};
pub use crate::orchestrator::SiteAnalyzer;
pub use crate::report::AnalysisReport;
