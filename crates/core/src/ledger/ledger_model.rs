use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::NATIVE_ASSET_CODE;

/// Encoded length of an account public key.
pub const PUBLIC_KEY_LENGTH: usize = 56;

/// A balance line as reported by the ledger, before valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBalance {
    pub asset_code: String,
    pub asset_issuer: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl RawBalance {
    pub fn native(amount: Decimal) -> Self {
        Self {
            asset_code: NATIVE_ASSET_CODE.to_string(),
            asset_issuer: None,
            amount,
        }
    }

    pub fn issued(asset_code: &str, asset_issuer: &str, amount: Decimal) -> Self {
        Self {
            asset_code: asset_code.to_string(),
            asset_issuer: Some(asset_issuer.to_string()),
            amount,
        }
    }

    /// True when both balances refer to the same asset.
    pub fn same_asset(&self, other: &RawBalance) -> bool {
        self.asset_code == other.asset_code && self.asset_issuer == other.asset_issuer
    }
}

/// Structural check for an account public key: `G` prefix, 56 characters,
/// RFC 4648 base32 alphabet. Checksum verification is left to the network.
pub fn is_valid_public_key(key: &str) -> bool {
    key.len() == PUBLIC_KEY_LENGTH
        && key.starts_with('G')
        && key
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}
