//! Valuation resolver contract.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

/// Prices a single asset balance in USD.
///
/// Implementations return `Error::Valuation(ValuationError::Unavailable { .. })`
/// when the asset cannot be priced. The returned value is not rounded.
#[async_trait]
pub trait ValuationResolverTrait: Send + Sync {
    async fn resolve(
        &self,
        asset_code: &str,
        asset_issuer: Option<&str>,
        amount: Decimal,
    ) -> Result<Decimal>;
}
