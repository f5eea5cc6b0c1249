use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("No USD valuation available for {asset}: {reason}")]
    Unavailable { asset: String, reason: String },
}

impl ValuationError {
    pub fn unavailable(asset_code: &str, asset_issuer: Option<&str>, reason: impl Into<String>) -> Self {
        let asset = match asset_issuer {
            Some(issuer) => format!("{}:{}", asset_code, issuer),
            None => asset_code.to_string(),
        };
        ValuationError::Unavailable {
            asset,
            reason: reason.into(),
        }
    }
}
