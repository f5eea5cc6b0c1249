use std::time::Duration;

use lumenfolio_core::constants::DEFAULT_SNAPSHOT_CONCURRENCY;

pub const DEFAULT_DB_PATH: &str = "./db/app.db";
pub const DEFAULT_HORIZON_URL: &str = "https://horizon.stellar.org";
pub const DEFAULT_USD_PRICES: &str = "XLM=0.10,USDC=1";

pub struct Config {
    pub db_path: String,
    pub horizon_url: String,
    pub snapshot_interval: Duration,
    pub snapshot_initial_delay: Duration,
    pub snapshot_concurrency: usize,
    /// `CODE[:ISSUER]=PRICE` entries, comma separated.
    pub usd_prices: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparsable numbers fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let db_path = lookup("LF_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let horizon_url = lookup("LF_HORIZON_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_HORIZON_URL.into());
        let usd_prices = lookup("LF_USD_PRICES").unwrap_or_else(|| DEFAULT_USD_PRICES.into());

        Self {
            db_path,
            horizon_url,
            snapshot_interval: Duration::from_secs(number("LF_SNAPSHOT_INTERVAL_SECS", 3600).max(1)),
            snapshot_initial_delay: Duration::from_secs(number("LF_SNAPSHOT_INITIAL_DELAY_SECS", 30)),
            snapshot_concurrency: number(
                "LF_SNAPSHOT_CONCURRENCY",
                DEFAULT_SNAPSHOT_CONCURRENCY as u64,
            )
            .max(1) as usize,
            usd_prices,
            request_timeout: Duration::from_millis(number("LF_REQUEST_TIMEOUT_MS", 30000)),
        }
    }
}
