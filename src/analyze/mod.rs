//! The six domain analyzers. Each one is a pure function of the page
//! snapshot and its slice of the side-channel evidence.

pub mod backend;
pub mod frontend;
pub mod performance;
pub mod security;
pub mod seo;
pub mod server_info;

pub use backend::BackendReport;
pub use frontend::FrontendReport;
pub use performance::{PerformanceReport, ResourceHints};
pub use security::{SecurityFeatures, SecurityHeaders, SecurityReport, SslReport};
pub use seo::SeoReport;
pub use server_info::{ServerReport, WhoisReport, WhoisSummary};
