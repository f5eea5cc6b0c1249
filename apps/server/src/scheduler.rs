//! Background scheduler for recurring portfolio snapshots.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use crate::main_lib::AppState;

/// Starts the snapshot scheduler. After `initial_delay` the first run happens
/// immediately, then once per `every`.
pub fn start_snapshot_scheduler(
    state: Arc<AppState>,
    initial_delay: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Snapshot scheduler started ({}s interval)", every.as_secs());

        tokio::time::sleep(initial_delay).await;

        let mut snapshot_interval = interval(every);
        snapshot_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            snapshot_interval.tick().await;
            run_scheduled_snapshots(&state).await;
        }
    })
}

/// Runs a single batch over all users.
pub async fn run_scheduled_snapshots(state: &Arc<AppState>) {
    info!("Running scheduled portfolio snapshots...");

    match state.snapshot_service.run_for_all_users().await {
        Ok(result) => {
            info!(
                "Scheduled snapshots completed: {} succeeded, {} failed",
                result.success, result.failed
            );
        }
        Err(e) => {
            error!("Scheduled snapshot run aborted: {}", e);
        }
    }
}
