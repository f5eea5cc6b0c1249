use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::StellarAccountDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore};
use crate::schema::{stellar_accounts, users};
use lumenfolio_core::accounts::{
    AccountError, NewStellarAccount, StellarAccount, StellarAccountRepositoryTrait,
};
use lumenfolio_core::constants::MAX_LINKED_ACCOUNTS;
use lumenfolio_core::errors::Result;

/// Repository for linked Stellar accounts.
///
/// Writes go through the single writer, so the limit check and the insert in
/// `create_and_claim_primary` cannot interleave with another link.
pub struct StellarAccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl StellarAccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn count_active_on(conn: &mut SqliteConnection, owner: &str) -> Result<usize> {
    let count = stellar_accounts::table
        .filter(stellar_accounts::user_id.eq(owner))
        .filter(stellar_accounts::is_active.eq(true))
        .count()
        .get_result::<i64>(conn)
        .into_core()?;
    Ok(count as usize)
}

fn load_owned(
    conn: &mut SqliteConnection,
    owner: &str,
    account_id: &str,
) -> Result<Option<StellarAccountDB>> {
    stellar_accounts::table
        .filter(stellar_accounts::id.eq(account_id))
        .filter(stellar_accounts::user_id.eq(owner))
        .select(StellarAccountDB::as_select())
        .first::<StellarAccountDB>(conn)
        .optional()
        .into_core()
}

#[async_trait]
impl StellarAccountRepositoryTrait for StellarAccountRepository {
    async fn create_and_claim_primary(
        &self,
        new_account: NewStellarAccount,
    ) -> Result<StellarAccount> {
        self.writer
            .exec(move |conn| {
                if count_active_on(conn, &new_account.user_id)? >= MAX_LINKED_ACCOUNTS {
                    return Err(AccountError::AccountLimitExceeded(MAX_LINKED_ACCOUNTS).into());
                }

                let now = Utc::now().naive_utc();
                let row = StellarAccountDB::from_new(new_account, now);

                let inserted = diesel::insert_into(stellar_accounts::table)
                    .values(&row)
                    .execute(conn);
                match inserted {
                    Err(e) if is_unique_violation(&e) => {
                        return Err(AccountError::DuplicateAccount(row.public_key).into());
                    }
                    other => {
                        other.into_core()?;
                    }
                }

                let claimed = diesel::update(
                    users::table
                        .filter(users::id.eq(&row.user_id))
                        .filter(users::stellar_public_key.is_null()),
                )
                .set((
                    users::stellar_public_key.eq(Some(row.public_key.clone())),
                    users::updated_at.eq(now),
                ))
                .execute(conn)
                .into_core()?;
                if claimed > 0 {
                    debug!("Account {} is now primary for user {}", row.id, row.user_id);
                }

                Ok(row.into())
            })
            .await
    }

    fn get_by_id_for_user(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<Option<StellarAccount>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_owned(&mut conn, user_id, account_id)?.map(StellarAccount::from))
    }

    fn find_by_public_key(&self, public_key: &str) -> Result<Option<StellarAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let row = stellar_accounts::table
            .filter(stellar_accounts::public_key.eq(public_key))
            .select(StellarAccountDB::as_select())
            .first::<StellarAccountDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(StellarAccount::from))
    }

    fn count_active(&self, user_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        count_active_on(&mut conn, user_id)
    }

    fn list_active(&self, user_id: &str) -> Result<Vec<StellarAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = stellar_accounts::table
            .filter(stellar_accounts::user_id.eq(user_id))
            .filter(stellar_accounts::is_active.eq(true))
            .order((
                stellar_accounts::created_at.desc(),
                stellar_accounts::id.desc(),
            ))
            .select(StellarAccountDB::as_select())
            .load::<StellarAccountDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(StellarAccount::from).collect())
    }

    async fn update_label(
        &self,
        user_id: &str,
        account_id: &str,
        label: Option<String>,
    ) -> Result<StellarAccount> {
        let owner = user_id.to_string();
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let updated = diesel::update(
                    stellar_accounts::table
                        .filter(stellar_accounts::id.eq(&account_id))
                        .filter(stellar_accounts::user_id.eq(&owner)),
                )
                .set((
                    stellar_accounts::label.eq(label),
                    stellar_accounts::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;
                if updated == 0 {
                    return Err(AccountError::NotFound(account_id).into());
                }

                load_owned(conn, &owner, &account_id)?
                    .map(StellarAccount::from)
                    .ok_or_else(|| AccountError::NotFound(account_id).into())
            })
            .await
    }

    async fn deactivate(&self, user_id: &str, account_id: &str) -> Result<()> {
        let owner = user_id.to_string();
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let updated = diesel::update(
                    stellar_accounts::table
                        .filter(stellar_accounts::id.eq(&account_id))
                        .filter(stellar_accounts::user_id.eq(&owner)),
                )
                .set((
                    stellar_accounts::is_active.eq(false),
                    stellar_accounts::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;
                if updated == 0 {
                    return Err(AccountError::NotFound(account_id).into());
                }
                Ok(())
            })
            .await
    }
}
