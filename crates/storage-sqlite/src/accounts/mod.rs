//! SQLite storage implementation for linked Stellar accounts.

mod model;
mod repository;

pub use model::StellarAccountDB;
pub use repository::StellarAccountRepository;
