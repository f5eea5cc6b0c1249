//! Stellar account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::accounts_model::{NewStellarAccount, StellarAccount};
use crate::errors::Result;

/// Trait defining the contract for Stellar account repository operations.
#[async_trait]
pub trait StellarAccountRepositoryTrait: Send + Sync {
    /// Inserts the account and, when the owner has no primary key yet, makes
    /// this account's key the primary. Both writes share one transaction.
    ///
    /// Fails with `AccountError::DuplicateAccount` when the key is already
    /// stored, whichever user owns it, and with
    /// `AccountError::AccountLimitExceeded` when the owner already has the
    /// maximum number of active accounts. Both checks are atomic with the insert.
    async fn create_and_claim_primary(&self, new_account: NewStellarAccount)
        -> Result<StellarAccount>;

    /// Looks up an account owned by `user_id`, active or not.
    fn get_by_id_for_user(&self, user_id: &str, account_id: &str)
        -> Result<Option<StellarAccount>>;

    /// Looks up an account by key across all users, active or not.
    fn find_by_public_key(&self, public_key: &str) -> Result<Option<StellarAccount>>;

    fn count_active(&self, user_id: &str) -> Result<usize>;

    /// Active accounts for the user, newest first.
    fn list_active(&self, user_id: &str) -> Result<Vec<StellarAccount>>;

    async fn update_label(
        &self,
        user_id: &str,
        account_id: &str,
        label: Option<String>,
    ) -> Result<StellarAccount>;

    /// Soft-deletes the account.
    async fn deactivate(&self, user_id: &str, account_id: &str) -> Result<()>;
}

/// Trait defining the contract for account linking operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn link_account(
        &self,
        user_id: &str,
        public_key: &str,
        label: Option<String>,
    ) -> Result<StellarAccount>;

    /// Makes the account's key the user's primary key. Inactive accounts are accepted.
    async fn set_primary_account(&self, user_id: &str, account_id: &str) -> Result<()>;

    fn list_accounts(&self, user_id: &str) -> Result<Vec<StellarAccount>>;

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<StellarAccount>;

    async fn remove_account(&self, user_id: &str, account_id: &str) -> Result<()>;

    async fn update_account_label(
        &self,
        user_id: &str,
        account_id: &str,
        label: Option<String>,
    ) -> Result<StellarAccount>;
}
