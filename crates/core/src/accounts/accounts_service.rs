use log::{debug, info, warn};
use std::sync::Arc;

use super::accounts_model::{normalize_label, validate_label, NewStellarAccount, StellarAccount};
use super::accounts_traits::{AccountServiceTrait, StellarAccountRepositoryTrait};
use super::AccountError;
use crate::constants::MAX_LINKED_ACCOUNTS;
use crate::errors::{Error, Result};
use crate::ledger::LedgerClientTrait;
use crate::users::UserRepositoryTrait;

/// Service for linking Stellar accounts to users
pub struct AccountService {
    repository: Arc<dyn StellarAccountRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    ledger_client: Arc<dyn LedgerClientTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(
        repository: Arc<dyn StellarAccountRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        ledger_client: Arc<dyn LedgerClientTrait>,
    ) -> Self {
        Self {
            repository,
            user_repository,
            ledger_client,
        }
    }

    fn ensure_user_exists(&self, user_id: &str) -> Result<()> {
        if self.user_repository.exists(user_id)? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("User {} not found", user_id)))
        }
    }

    fn owned_account(&self, user_id: &str, account_id: &str) -> Result<StellarAccount> {
        self.repository
            .get_by_id_for_user(user_id, account_id)?
            .ok_or_else(|| AccountError::NotFound(account_id.to_string()).into())
    }

    /// Checks the key on the network. Unfunded or unreachable accounts are
    /// still linked, so nothing here can fail the caller.
    async fn probe_ledger(&self, public_key: &str) {
        match self.ledger_client.account_exists(public_key).await {
            Ok(true) => {}
            Ok(false) => warn!(
                "Linking Stellar account that doesn't exist on network yet: {}",
                public_key
            ),
            Err(e) => debug!(
                "Could not verify account existence for {}: {}",
                public_key, e
            ),
        }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn link_account(
        &self,
        user_id: &str,
        public_key: &str,
        label: Option<String>,
    ) -> Result<StellarAccount> {
        let new_account = NewStellarAccount::new(user_id, public_key, label);
        new_account.validate()?;
        self.ensure_user_exists(user_id)?;

        if self
            .repository
            .find_by_public_key(&new_account.public_key)?
            .is_some()
        {
            return Err(AccountError::DuplicateAccount(new_account.public_key).into());
        }

        let active_count = self.repository.count_active(user_id)?;
        if active_count >= MAX_LINKED_ACCOUNTS {
            return Err(AccountError::AccountLimitExceeded(MAX_LINKED_ACCOUNTS).into());
        }

        self.probe_ledger(&new_account.public_key).await;

        let account = self.repository.create_and_claim_primary(new_account).await?;
        info!(
            "Linked Stellar account {} to user {}",
            account.public_key, user_id
        );
        Ok(account)
    }

    async fn set_primary_account(&self, user_id: &str, account_id: &str) -> Result<()> {
        let account = self.owned_account(user_id, account_id)?;
        self.user_repository
            .set_primary_public_key(user_id, &account.public_key)
            .await?;
        debug!(
            "Primary account for user {} set to {}",
            user_id, account.public_key
        );
        Ok(())
    }

    fn list_accounts(&self, user_id: &str) -> Result<Vec<StellarAccount>> {
        self.repository.list_active(user_id)
    }

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<StellarAccount> {
        self.owned_account(user_id, account_id)
    }

    async fn remove_account(&self, user_id: &str, account_id: &str) -> Result<()> {
        self.owned_account(user_id, account_id)?;
        self.repository.deactivate(user_id, account_id).await
    }

    async fn update_account_label(
        &self,
        user_id: &str,
        account_id: &str,
        label: Option<String>,
    ) -> Result<StellarAccount> {
        let label = normalize_label(label);
        validate_label(label.as_deref())?;
        self.owned_account(user_id, account_id)?;
        self.repository
            .update_label(user_id, account_id, label)
            .await
    }
}
