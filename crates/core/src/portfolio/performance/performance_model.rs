use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::super::snapshot::PortfolioSnapshot;
use crate::utils::decimal_utils::{percentage_of, round_usd};

/// Fixed lookback over which profit and loss is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeWindow {
    /// Every window, shortest first. Performance results follow this order.
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Day, TimeWindow::Week, TimeWindow::Month];

    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::Day => Duration::hours(24),
            TimeWindow::Week => Duration::days(7),
            TimeWindow::Month => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "24h",
            TimeWindow::Week => "7d",
            TimeWindow::Month => "30d",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profit and loss for one window.
///
/// When no baseline exists (`has_data == false`) every optional field is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceWindow {
    pub window: TimeWindow,
    pub has_data: bool,
    pub absolute_pnl: Option<Decimal>,
    /// `None` when the baseline value is zero.
    pub percentage_change: Option<Decimal>,
    pub current_value_usd: Decimal,
    pub baseline_value_usd: Option<Decimal>,
    pub baseline_date: Option<DateTime<Utc>>,
}

impl PerformanceWindow {
    /// Derives the window metrics from the current total and an optional baseline.
    pub fn from_baseline(
        window: TimeWindow,
        current_value_usd: Decimal,
        baseline: Option<&PortfolioSnapshot>,
    ) -> Self {
        let Some(baseline) = baseline else {
            return Self {
                window,
                has_data: false,
                absolute_pnl: None,
                percentage_change: None,
                current_value_usd,
                baseline_value_usd: None,
                baseline_date: None,
            };
        };

        let base = baseline.total_value_usd;
        let delta = current_value_usd - base;

        Self {
            window,
            has_data: true,
            absolute_pnl: Some(round_usd(delta)),
            percentage_change: percentage_of(delta, base),
            current_value_usd,
            baseline_value_usd: Some(base),
            baseline_date: Some(baseline.created_at),
        }
    }
}

/// Rolling performance of a user's portfolio, one entry per [`TimeWindow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPerformance {
    pub user_id: String,
    pub current_value_usd: Decimal,
    pub calculated_at: DateTime<Utc>,
    pub windows: Vec<PerformanceWindow>,
}

impl PortfolioPerformance {
    pub fn window(&self, window: TimeWindow) -> Option<&PerformanceWindow> {
        self.windows.iter().find(|w| w.window == window)
    }
}
