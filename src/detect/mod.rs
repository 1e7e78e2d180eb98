pub mod catalog;
pub mod matcher;

pub use catalog::Signature;
pub use matcher::{extend_unique, Matcher, SubstringMatcher};
