use std::sync::Arc;

use lumenfolio_core::{
    accounts::{AccountService, AccountServiceTrait},
    ledger::LedgerClientTrait,
    portfolio::{
        performance::{PerformanceService, PerformanceServiceTrait},
        snapshot::{SnapshotService, SnapshotServiceTrait},
        valuation::PriceTableResolver,
    },
    users::UserRepositoryTrait,
};
use lumenfolio_storage_sqlite::{
    db, SnapshotRepository, StellarAccountRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, horizon::HorizonLedgerClient};

pub struct AppState {
    pub snapshot_service: Arc<dyn SnapshotServiceTrait + Send + Sync>,
    pub performance_service: Arc<dyn PerformanceServiceTrait + Send + Sync>,
    pub account_service: Arc<dyn AccountServiceTrait + Send + Sync>,
    pub user_repository: Arc<dyn UserRepositoryTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("LF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let (pool, writer) = db::open(&config.db_path)?;
    tracing::info!("Database ready at {}", config.db_path);

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let account_repository = Arc::new(StellarAccountRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool, writer));

    let ledger_client: Arc<dyn LedgerClientTrait> = Arc::new(HorizonLedgerClient::new(
        &config.horizon_url,
        config.request_timeout,
    )?);
    let valuation_resolver = Arc::new(PriceTableResolver::parse(&config.usd_prices)?);

    let snapshot_service = Arc::new(
        SnapshotService::new(
            snapshot_repository.clone(),
            valuation_resolver,
            ledger_client.clone(),
            account_repository.clone(),
            user_repository.clone(),
        )
        .with_concurrency(config.snapshot_concurrency),
    );
    let performance_service = Arc::new(PerformanceService::new(snapshot_repository));
    let account_service = Arc::new(AccountService::new(
        account_repository,
        user_repository.clone(),
        ledger_client,
    ));

    Ok(Arc::new(AppState {
        snapshot_service,
        performance_service,
        account_service,
        user_repository,
    }))
}
