//! Database model for linked Stellar accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use lumenfolio_core::accounts::{NewStellarAccount, StellarAccount};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::stellar_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StellarAccountDB {
    pub id: String,
    pub user_id: String,
    pub public_key: String,
    pub label: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StellarAccountDB {
    /// Row for a freshly linked account, active and stamped `now`.
    pub fn from_new(new_account: NewStellarAccount, now: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_account.user_id,
            public_key: new_account.public_key,
            label: new_account.label,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<StellarAccountDB> for StellarAccount {
    fn from(db: StellarAccountDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            public_key: db.public_key,
            label: db.label,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
