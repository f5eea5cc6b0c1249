//! Ledger client contract.

use async_trait::async_trait;

use super::RawBalance;
use crate::errors::Result;

/// Read-only view of the ledger network used by snapshotting and linking.
#[async_trait]
pub trait LedgerClientTrait: Send + Sync {
    /// Current balances held by the account, in ledger order.
    async fn get_balances(&self, public_key: &str) -> Result<Vec<RawBalance>>;

    /// Whether the account exists (is funded) on the network.
    async fn account_exists(&self, public_key: &str) -> Result<bool>;
}
