//! Repository and service traits for portfolio snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{BatchSnapshotResult, HistoryPage, PortfolioHistory, PortfolioSnapshot};
use crate::errors::Result;
use crate::ledger::RawBalance;

/// Append-only store of portfolio snapshots.
///
/// Every read is scoped to one user. Reads that return a single snapshot order
/// by `created_at` descending, then `id` descending, so ties resolve the same
/// way on every call.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Persists one snapshot. Either the whole row is written or nothing is.
    async fn append(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot>;

    /// Most recent snapshot for the user.
    fn latest(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>>;

    /// Most recent snapshot taken at or before `cutoff`.
    fn latest_before(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<PortfolioSnapshot>>;

    /// One page of snapshots, newest first, with the user's total count.
    fn page(&self, user_id: &str, page: HistoryPage) -> Result<(Vec<PortfolioSnapshot>, i64)>;
}

/// Snapshot creation and history.
#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Values the given balances and persists the resulting snapshot.
    async fn build_snapshot(
        &self,
        user_id: &str,
        balances: Vec<RawBalance>,
    ) -> Result<PortfolioSnapshot>;

    /// Fetches the user's current balances and snapshots them.
    async fn create_snapshot(&self, user_id: &str) -> Result<PortfolioSnapshot>;

    /// Snapshots every known user. Used by both the scheduler and manual triggers.
    async fn run_for_all_users(&self) -> Result<BatchSnapshotResult>;

    fn get_portfolio_history(&self, user_id: &str, page: HistoryPage) -> Result<PortfolioHistory>;
}
