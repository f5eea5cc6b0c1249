use lumenfolio_server::config::Config;
use lumenfolio_server::{build_state, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    let scheduler = scheduler::start_snapshot_scheduler(
        state.clone(),
        config.snapshot_initial_delay,
        config.snapshot_interval,
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    scheduler.abort();
    Ok(())
}
