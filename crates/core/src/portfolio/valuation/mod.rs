//! Valuation module - pricing ledger balances in USD.

mod price_table;
mod valuation_errors;
mod valuation_traits;

pub use price_table::{AssetKey, PriceTableResolver};
pub use valuation_errors::ValuationError;
pub use valuation_traits::ValuationResolverTrait;
