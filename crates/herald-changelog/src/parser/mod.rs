//! Commit classification

mod conventional;
mod types;

pub use conventional::{classify, ConventionalParser};
pub use types::CategoryConfig;
