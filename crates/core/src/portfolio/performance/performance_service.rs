use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use std::sync::Arc;

use super::{PerformanceServiceTrait, PerformanceWindow, PortfolioPerformance, TimeWindow};
use crate::errors::Result;
use crate::portfolio::snapshot::SnapshotRepositoryTrait;
use crate::portfolio::PortfolioError;
use crate::utils::time_utils::cutoff_before;

pub struct PerformanceService {
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl PerformanceService {
    pub fn new(snapshot_repository: Arc<dyn SnapshotRepositoryTrait>) -> Self {
        Self {
            snapshot_repository,
        }
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    async fn get_portfolio_performance(&self, user_id: &str) -> Result<PortfolioPerformance> {
        self.calculate_performance_at(user_id, Utc::now()).await
    }

    async fn calculate_performance_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PortfolioPerformance> {
        let current = self
            .snapshot_repository
            .latest(user_id)?
            .ok_or_else(|| PortfolioError::NoSnapshotData(user_id.to_string()))?;
        let current_value_usd = current.total_value_usd;

        let mut windows = Vec::with_capacity(TimeWindow::ALL.len());
        for window in TimeWindow::ALL {
            let cutoff = cutoff_before(now, window.duration());
            let baseline = self.snapshot_repository.latest_before(user_id, cutoff)?;
            if baseline.is_none() {
                debug!(
                    "No baseline for user {} in window {} (cutoff {})",
                    user_id, window, cutoff
                );
            }
            windows.push(PerformanceWindow::from_baseline(
                window,
                current_value_usd,
                baseline.as_ref(),
            ));
        }

        Ok(PortfolioPerformance {
            user_id: user_id.to_string(),
            current_value_usd,
            calculated_at: now,
            windows,
        })
    }
}
