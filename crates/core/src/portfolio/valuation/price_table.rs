//! Fixed USD price table.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use super::{ValuationError, ValuationResolverTrait};
use crate::errors::{Result, ValidationError};

/// Asset identity used for price lookups. A `None` issuer matches the asset
/// code from any issuer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub asset_code: String,
    pub asset_issuer: Option<String>,
}

impl AssetKey {
    pub fn new(asset_code: &str, asset_issuer: Option<&str>) -> Self {
        Self {
            asset_code: asset_code.to_uppercase(),
            asset_issuer: asset_issuer.map(str::to_string),
        }
    }
}

/// Resolves values from a static table of unit prices.
#[derive(Debug, Clone, Default)]
pub struct PriceTableResolver {
    prices: HashMap<AssetKey, Decimal>,
}

impl PriceTableResolver {
    /// Parses `CODE[:ISSUER]=PRICE` entries separated by commas,
    /// e.g. `XLM=0.11,USDC:GA5Z...=1`.
    pub fn parse(entries: &str) -> Result<Self> {
        let mut prices = HashMap::new();
        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (asset, price) = entry.split_once('=').ok_or_else(|| {
                ValidationError::InvalidInput(format!("Price entry '{}' is missing '='", entry))
            })?;
            let price = Decimal::from_str(price.trim())?;
            if price.is_sign_negative() {
                return Err(ValidationError::InvalidInput(format!(
                    "Price for '{}' cannot be negative",
                    asset
                ))
                .into());
            }
            let key = match asset.trim().split_once(':') {
                Some((code, issuer)) => AssetKey::new(code.trim(), Some(issuer.trim())),
                None => AssetKey::new(asset.trim(), None),
            };
            prices.insert(key, price);
        }
        Ok(Self { prices })
    }

    pub fn with_price(mut self, asset_code: &str, asset_issuer: Option<&str>, price: Decimal) -> Self {
        self.prices.insert(AssetKey::new(asset_code, asset_issuer), price);
        self
    }

    fn unit_price(&self, asset_code: &str, asset_issuer: Option<&str>) -> Option<Decimal> {
        self.prices
            .get(&AssetKey::new(asset_code, asset_issuer))
            .or_else(|| self.prices.get(&AssetKey::new(asset_code, None)))
            .copied()
    }
}

#[async_trait]
impl ValuationResolverTrait for PriceTableResolver {
    async fn resolve(
        &self,
        asset_code: &str,
        asset_issuer: Option<&str>,
        amount: Decimal,
    ) -> Result<Decimal> {
        let price = self.unit_price(asset_code, asset_issuer).ok_or_else(|| {
            ValuationError::unavailable(asset_code, asset_issuer, "no price configured")
        })?;
        Ok(amount * price)
    }
}
