//! Database model for portfolio snapshots.

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::StorageError;
use lumenfolio_core::errors::{Error, Result};
use lumenfolio_core::portfolio::snapshot::{AssetBalance, PortfolioSnapshot};
use lumenfolio_core::utils::time_utils::{parse_storage_timestamp, to_storage_timestamp};

/// Database model for portfolio snapshots.
///
/// `created_at` is fixed-width UTC text so lexical order matches time order;
/// `asset_balances` is a JSON array of [`AssetBalanceDB`].
#[derive(Debug, Clone, Queryable, Selectable, Insertable, PartialEq)]
#[diesel(table_name = crate::schema::portfolio_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioSnapshotDB {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub asset_balances: String,
    pub total_value_usd: String,
}

/// Stored form of one balance line. Every number is a decimal string, so
/// values survive the round trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalanceDB {
    pub asset_code: String,
    pub asset_issuer: Option<String>,
    pub amount: String,
    pub value_usd: String,
}

impl From<&AssetBalance> for AssetBalanceDB {
    fn from(balance: &AssetBalance) -> Self {
        Self {
            asset_code: balance.asset_code.clone(),
            asset_issuer: balance.asset_issuer.clone(),
            amount: balance.amount.to_string(),
            value_usd: balance.value_usd.to_string(),
        }
    }
}

impl TryFrom<AssetBalanceDB> for AssetBalance {
    type Error = Error;

    fn try_from(db: AssetBalanceDB) -> Result<Self> {
        Ok(Self {
            asset_code: db.asset_code,
            asset_issuer: db.asset_issuer,
            amount: Decimal::from_str(&db.amount)?,
            value_usd: Decimal::from_str(&db.value_usd)?,
        })
    }
}

impl TryFrom<&PortfolioSnapshot> for PortfolioSnapshotDB {
    type Error = Error;

    fn try_from(domain: &PortfolioSnapshot) -> Result<Self> {
        let balances: Vec<AssetBalanceDB> =
            domain.asset_balances.iter().map(AssetBalanceDB::from).collect();
        let asset_balances = serde_json::to_string(&balances).map_err(StorageError::from)?;

        Ok(Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            created_at: to_storage_timestamp(domain.created_at),
            asset_balances,
            total_value_usd: domain.total_value_usd.to_string(),
        })
    }
}

impl TryFrom<PortfolioSnapshotDB> for PortfolioSnapshot {
    type Error = Error;

    fn try_from(db: PortfolioSnapshotDB) -> Result<Self> {
        let stored: Vec<AssetBalanceDB> =
            serde_json::from_str(&db.asset_balances).map_err(StorageError::from)?;
        let asset_balances = stored
            .into_iter()
            .map(AssetBalance::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            created_at: parse_storage_timestamp(&db.created_at)?,
            asset_balances,
            total_value_usd: Decimal::from_str(&db.total_value_usd)?,
        })
    }
}
