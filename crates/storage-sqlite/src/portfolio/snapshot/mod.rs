//! SQLite storage implementation for portfolio snapshots.

mod model;
mod repository;

pub use model::{AssetBalanceDB, PortfolioSnapshotDB};
pub use repository::SnapshotRepository;
