use thiserror::Error;

/// User-facing failures of account linking. None of these are retried.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Stellar account {0} is already linked to a user")]
    DuplicateAccount(String),

    #[error("Maximum number of Stellar accounts ({0}) reached")]
    AccountLimitExceeded(usize),

    #[error("Stellar account not found: {0}")]
    NotFound(String),

    #[error("Invalid Stellar public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid account label: {0}")]
    InvalidLabel(String),
}
