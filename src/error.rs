use std::error::Error as StdError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that end an analysis run. Side-channel lookups never surface here:
/// they are folded into the report as degraded evidence.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Rejected before any network I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The primary page fetch failed; no report is produced.
    #[error("site analysis failed: {0}")]
    Fetch(#[from] FetchFailure),

    /// HTTP/DNS client setup failed.
    #[error("client setup failed: {0}")]
    Client(String),
}

impl AnalysisError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidInput(_))
    }

    /// Message meant for an end user rather than for logs.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidInput(msg) => msg.clone(),
            AnalysisError::Fetch(failure) => failure.kind.explanation().to_string(),
            AnalysisError::Client(_) => FetchFailureKind::Other.explanation().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    Timeout,
    HostNotFound,
    ConnectionRefused,
    Other,
}

impl FetchFailureKind {
    /// Classify from the rendered error chain.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            FetchFailureKind::Timeout
        } else if lower.contains("dns error")
            || lower.contains("failed to lookup address")
            || lower.contains("name or service not known")
            || lower.contains("no such host")
            || lower.contains("enotfound")
        {
            FetchFailureKind::HostNotFound
        } else if lower.contains("connection refused") || lower.contains("econnrefused") {
            FetchFailureKind::ConnectionRefused
        } else {
            FetchFailureKind::Other
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            FetchFailureKind::Timeout => {
                "The site did not respond in time. It may be too slow for analysis or it may be blocking access. Please try another site."
            }
            FetchFailureKind::HostNotFound => {
                "The site could not be found. Please make sure the URL is correct."
            }
            FetchFailureKind::ConnectionRefused => {
                "Could not connect to the site. It may be unreachable right now or it may be blocking analysis."
            }
            FetchFailureKind::Other => "An error occurred while analyzing the site.",
        }
    }
}

#[derive(Error, Debug)]
#[error("{message}")]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: FetchFailureKind::classify(&message),
            message,
        }
    }

    pub fn timeout(url: &str, secs: u64) -> Self {
        Self {
            kind: FetchFailureKind::Timeout,
            message: format!("timeout of {}s exceeded fetching {}", secs, url),
        }
    }

    /// Build from any error, flattening its source chain so that the
    /// underlying cause (e.g. the resolver message) takes part in classification.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message)
    }
}
