//! Lumenfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the snapshot, performance and account-linking logic.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod accounts;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod portfolio;
pub mod users;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export common types from the portfolio module
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
