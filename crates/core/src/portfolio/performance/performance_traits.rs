use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::PortfolioPerformance;
use crate::errors::Result;

/// Computes rolling performance for one user from stored snapshots.
#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Performance as of the current time.
    async fn get_portfolio_performance(&self, user_id: &str) -> Result<PortfolioPerformance>;

    /// Performance as of `now`. Repeated calls with the same `now` and the same
    /// stored snapshots return identical results.
    async fn calculate_performance_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PortfolioPerformance>;
}
