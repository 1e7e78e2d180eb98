pub mod reporter;

pub use reporter::{format_text_report, print_summary, save_report};
