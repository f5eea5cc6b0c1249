//! Ledger module - balances and account probes on the Stellar network.

mod ledger_errors;
mod ledger_model;
mod ledger_traits;

pub use ledger_errors::LedgerError;
pub use ledger_model::{is_valid_public_key, RawBalance, PUBLIC_KEY_LENGTH};
pub use ledger_traits::LedgerClientTrait;
