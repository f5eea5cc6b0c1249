//! Accounts module - Stellar accounts linked to users.

mod accounts_errors;
mod accounts_model;
mod accounts_service;
mod accounts_traits;



// Re-export the public interface
pub use accounts_errors::AccountError;
pub use accounts_model::{normalize_label, NewStellarAccount, StellarAccount, MAX_LABEL_LENGTH};
pub use accounts_service::AccountService;
pub use accounts_traits::{AccountServiceTrait, StellarAccountRepositoryTrait};
