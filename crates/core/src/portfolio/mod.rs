//! Portfolio module - snapshots, valuation and performance.

pub mod performance;
pub mod snapshot;
pub mod valuation;

use thiserror::Error;

/// Errors raised by portfolio queries.
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("No portfolio snapshot available yet for user {0}")]
    NoSnapshotData(String),
}
