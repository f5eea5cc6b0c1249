//! Ledger client backed by the Horizon REST API.
//!
//! Only the account endpoint is used: `GET {base}/accounts/{public_key}`.
//! Horizon answers 404 for accounts that were never funded.

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use lumenfolio_core::errors::Result;
use lumenfolio_core::ledger::{LedgerClientTrait, LedgerError, RawBalance};

const NATIVE_ASSET_TYPE: &str = "native";
const LIQUIDITY_POOL_ASSET_TYPE: &str = "liquidity_pool_shares";

#[derive(Debug, Deserialize)]
struct HorizonAccount {
    #[serde(default)]
    balances: Vec<HorizonBalance>,
}

#[derive(Debug, Deserialize)]
struct HorizonBalance {
    balance: String,
    asset_type: String,
    asset_code: Option<String>,
    asset_issuer: Option<String>,
}

pub struct HorizonLedgerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HorizonLedgerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn account_url(&self, public_key: &str) -> String {
        format!("{}/accounts/{}", self.base_url, public_key)
    }

    /// Loads the account record, `None` when Horizon does not know it.
    async fn fetch_account(&self, public_key: &str) -> Result<Option<HorizonAccount>> {
        let resp = self
            .client
            .get(self.account_url(public_key))
            .send()
            .await
            .map_err(|e| LedgerError::Request(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(LedgerError::Request(format!(
                "Horizon returned {} for account {}",
                resp.status(),
                public_key
            ))
            .into());
        }

        let text = resp
            .text()
            .await
            .map_err(|e| LedgerError::Request(e.to_string()))?;
        let account = serde_json::from_str::<HorizonAccount>(&text)
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
        Ok(Some(account))
    }
}

/// Maps Horizon balance lines to raw balances, keeping ledger order.
/// Liquidity pool shares are not priced and are skipped.
fn to_raw_balances(account: HorizonAccount) -> Result<Vec<RawBalance>> {
    let mut balances = Vec::with_capacity(account.balances.len());
    for line in account.balances {
        if line.asset_type == LIQUIDITY_POOL_ASSET_TYPE {
            continue;
        }

        let amount = Decimal::from_str(&line.balance).map_err(|e| {
            LedgerError::InvalidResponse(format!("balance '{}': {}", line.balance, e))
        })?;

        if line.asset_type == NATIVE_ASSET_TYPE {
            balances.push(RawBalance::native(amount));
            continue;
        }

        match (line.asset_code, line.asset_issuer) {
            (Some(code), Some(issuer)) => balances.push(RawBalance::issued(&code, &issuer, amount)),
            _ => {
                return Err(LedgerError::InvalidResponse(format!(
                    "{} balance without asset code or issuer",
                    line.asset_type
                ))
                .into())
            }
        }
    }
    Ok(balances)
}

#[async_trait]
impl LedgerClientTrait for HorizonLedgerClient {
    async fn get_balances(&self, public_key: &str) -> Result<Vec<RawBalance>> {
        match self.fetch_account(public_key).await? {
            Some(account) => to_raw_balances(account),
            None => {
                debug!("Account {} is not funded, no balances", public_key);
                Ok(Vec::new())
            }
        }
    }

    async fn account_exists(&self, public_key: &str) -> Result<bool> {
        Ok(self.fetch_account(public_key).await?.is_some())
    }
}
