/// Decimal places kept for USD totals and PnL
pub const USD_DECIMAL_PRECISION: u32 = 2;

/// Decimal places kept for percentage changes
pub const PERCENT_DECIMAL_PRECISION: u32 = 2;

/// Maximum number of active Stellar accounts per user
pub const MAX_LINKED_ACCOUNTS: usize = 10;

/// Default number of users snapshotted in parallel by the batch runner
pub const DEFAULT_SNAPSHOT_CONCURRENCY: usize = 4;

/// Largest page size accepted by the history query
pub const MAX_HISTORY_PAGE_SIZE: i64 = 100;

/// Asset code used for the native lumen balance
pub const NATIVE_ASSET_CODE: &str = "XLM";
