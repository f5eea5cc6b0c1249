use async_trait::async_trait;
use futures::future::try_join_all;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    AssetBalance, BatchSnapshotResult, HistoryPage, PortfolioHistory, PortfolioSnapshot,
    SnapshotRepositoryTrait, SnapshotServiceTrait,
};
use crate::accounts::StellarAccountRepositoryTrait;
use crate::constants::DEFAULT_SNAPSHOT_CONCURRENCY;
use crate::errors::{Error, Result};
use crate::ledger::{LedgerClientTrait, RawBalance};
use crate::portfolio::valuation::ValuationResolverTrait;
use crate::users::UserRepositoryTrait;
use crate::utils::time_utils::now_truncated;

/// Builds, persists and lists portfolio snapshots.
pub struct SnapshotService {
    repository: Arc<dyn SnapshotRepositoryTrait>,
    valuation_resolver: Arc<dyn ValuationResolverTrait>,
    ledger_client: Arc<dyn LedgerClientTrait>,
    account_repository: Arc<dyn StellarAccountRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    concurrency: usize,
}

impl SnapshotService {
    pub fn new(
        repository: Arc<dyn SnapshotRepositoryTrait>,
        valuation_resolver: Arc<dyn ValuationResolverTrait>,
        ledger_client: Arc<dyn LedgerClientTrait>,
        account_repository: Arc<dyn StellarAccountRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            valuation_resolver,
            ledger_client,
            account_repository,
            user_repository,
            concurrency: DEFAULT_SNAPSHOT_CONCURRENCY,
        }
    }

    /// Sets how many users the batch runner snapshots at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Current balances across the user's active accounts, oldest account first.
    async fn collect_balances(&self, user_id: &str) -> Result<Vec<RawBalance>> {
        let mut accounts = self.account_repository.list_active(user_id)?;
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let per_account = try_join_all(
            accounts
                .iter()
                .map(|account| self.ledger_client.get_balances(&account.public_key)),
        )
        .await?;

        Ok(merge_balances(per_account.into_iter().flatten()))
    }
}

/// Folds balances of the same asset into one line, keeping first-seen order.
pub fn merge_balances<I>(balances: I) -> Vec<RawBalance>
where
    I: IntoIterator<Item = RawBalance>,
{
    let mut merged: Vec<RawBalance> = Vec::new();
    for balance in balances {
        match merged.iter_mut().find(|existing| existing.same_asset(&balance)) {
            Some(existing) => existing.amount += balance.amount,
            None => merged.push(balance),
        }
    }
    merged
}

fn into_store_unavailable(err: Error) -> Error {
    match err {
        Error::StoreUnavailable(_) => err,
        other => Error::StoreUnavailable(other.to_string()),
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn build_snapshot(
        &self,
        user_id: &str,
        balances: Vec<RawBalance>,
    ) -> Result<PortfolioSnapshot> {
        // All valuations must succeed before anything is written.
        let values = try_join_all(balances.iter().map(|raw| {
            self.valuation_resolver
                .resolve(&raw.asset_code, raw.asset_issuer.as_deref(), raw.amount)
        }))
        .await?;

        let asset_balances: Vec<AssetBalance> = balances
            .into_iter()
            .zip(values)
            .map(|(raw, value_usd)| AssetBalance::from_raw(raw, value_usd))
            .collect();

        let snapshot = PortfolioSnapshot::from_balances(
            Uuid::new_v4().to_string(),
            user_id.to_string(),
            now_truncated(),
            asset_balances,
        );

        let saved = self.repository.append(snapshot).await?;
        debug!(
            "Saved snapshot {} for user {} ({} assets, total {} USD)",
            saved.id,
            user_id,
            saved.asset_balances.len(),
            saved.total_value_usd
        );
        Ok(saved)
    }

    async fn create_snapshot(&self, user_id: &str) -> Result<PortfolioSnapshot> {
        if !self.user_repository.exists(user_id)? {
            return Err(Error::NotFound(format!("User {} not found", user_id)));
        }
        let balances = self.collect_balances(user_id).await?;
        self.build_snapshot(user_id, balances).await
    }

    async fn run_for_all_users(&self) -> Result<BatchSnapshotResult> {
        let user_ids = self
            .user_repository
            .list_user_ids()
            .map_err(into_store_unavailable)?;
        info!("Creating portfolio snapshots for {} users", user_ids.len());

        let mut outcomes = stream::iter(user_ids.into_iter().map(|user_id| async move {
            let outcome = self.create_snapshot(&user_id).await;
            (user_id, outcome)
        }))
        .buffer_unordered(self.concurrency);

        let mut result = BatchSnapshotResult::default();
        while let Some((user_id, outcome)) = outcomes.next().await {
            match outcome {
                Ok(_) => result.record_success(),
                Err(e) if e.is_store_unavailable() => {
                    error!(
                        "Aborting snapshot run at user {}: store unavailable: {}",
                        user_id, e
                    );
                    return Err(into_store_unavailable(e));
                }
                Err(e) => {
                    warn!("Failed to create snapshot for user {}: {}", user_id, e);
                    result.record_failure(&user_id, e.to_string());
                }
            }
        }

        info!(
            "Snapshot run completed: {} succeeded, {} failed",
            result.success, result.failed
        );
        Ok(result)
    }

    fn get_portfolio_history(&self, user_id: &str, page: HistoryPage) -> Result<PortfolioHistory> {
        page.validate()?;
        let (snapshots, total) = self.repository.page(user_id, page)?;
        Ok(PortfolioHistory::new(snapshots, total, page))
    }
}
