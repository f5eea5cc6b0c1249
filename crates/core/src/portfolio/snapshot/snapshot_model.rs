use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_HISTORY_PAGE_SIZE;
use crate::errors::{Result, ValidationError};
use crate::ledger::RawBalance;
use crate::utils::decimal_utils::sum_usd;

/// One valued asset line inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    pub asset_code: String,
    pub asset_issuer: Option<String>,
    /// Ledger-native amount, kept exact and serialized as a string.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Unrounded USD value as returned by the valuation resolver.
    pub value_usd: Decimal,
}

impl AssetBalance {
    pub fn from_raw(raw: RawBalance, value_usd: Decimal) -> Self {
        Self {
            asset_code: raw.asset_code,
            asset_issuer: raw.asset_issuer,
            amount: raw.amount,
            value_usd,
        }
    }
}

/// Point-in-time valuation of everything a user holds.
///
/// Snapshots are immutable: a later snapshot supersedes an earlier one, nothing
/// updates a stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub asset_balances: Vec<AssetBalance>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value_usd: Decimal,
}

impl PortfolioSnapshot {
    /// Builds a snapshot, deriving the total from the balances.
    pub fn from_balances(
        id: String,
        user_id: String,
        created_at: DateTime<Utc>,
        asset_balances: Vec<AssetBalance>,
    ) -> Self {
        let total_value_usd = Self::total_of(&asset_balances);
        Self {
            id,
            user_id,
            created_at,
            asset_balances,
            total_value_usd,
        }
    }

    /// Sum of the balance values, rounded once.
    pub fn total_of(balances: &[AssetBalance]) -> Decimal {
        sum_usd(balances.iter().map(|b| b.value_usd))
    }

    /// Whether `total_value_usd` agrees with the balances it was built from.
    pub fn is_total_consistent(&self) -> bool {
        self.total_value_usd == Self::total_of(&self.asset_balances)
    }
}

/// Validated paging parameters for the history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub page: i64,
    pub limit: i64,
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl HistoryPage {
    pub fn new(page: i64, limit: i64) -> Result<Self> {
        let candidate = Self { page, limit };
        candidate.validate()?;
        Ok(candidate)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(ValidationError::InvalidInput(format!(
                "page must be at least 1, got {}",
                self.page
            ))
            .into());
        }
        if self.limit < 1 || self.limit > MAX_HISTORY_PAGE_SIZE {
            return Err(ValidationError::InvalidInput(format!(
                "limit must be between 1 and {}, got {}",
                MAX_HISTORY_PAGE_SIZE, self.limit
            ))
            .into());
        }
        if (self.page - 1).checked_mul(self.limit).is_none() {
            return Err(ValidationError::InvalidInput(format!(
                "page {} is out of range",
                self.page
            ))
            .into());
        }
        Ok(())
    }

    /// Number of rows to skip. Saturates for pages that were never validated.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.limit.max(0))
    }
}

/// One page of a user's snapshot history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHistory {
    pub snapshots: Vec<PortfolioSnapshot>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PortfolioHistory {
    pub fn new(snapshots: Vec<PortfolioSnapshot>, total: i64, page: HistoryPage) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page.limit - 1) / page.limit
        };
        Self {
            snapshots,
            total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }
}

/// A user whose snapshot could not be built during a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFailure {
    pub user_id: String,
    pub reason: String,
}

/// Outcome of a batch snapshot run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSnapshotResult {
    pub success: usize,
    pub failed: usize,
    #[serde(default)]
    pub failures: Vec<SnapshotFailure>,
}

impl BatchSnapshotResult {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, user_id: &str, reason: String) {
        self.failed += 1;
        self.failures.push(SnapshotFailure {
            user_id: user_id.to_string(),
            reason,
        });
    }
}
