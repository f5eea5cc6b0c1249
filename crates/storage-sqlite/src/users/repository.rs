use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::users;
use lumenfolio_core::errors::{Error, Result};
use lumenfolio_core::users::{NewUser, User, UserRepositoryTrait};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn user_not_found(user_id: &str) -> Error {
    Error::NotFound(format!("User {} not found", user_id))
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let now = Utc::now().naive_utc();
        let row = UserDB {
            id: new_user
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            email: new_user.email,
            stellar_public_key: None,
            created_at: now,
            updated_at: now,
        };

        self.writer
            .exec(move |conn| {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    fn list_user_ids(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .select(users::id)
            .order((users::created_at.asc(), users::id.asc()))
            .load::<String>(&mut conn)
            .into_core()
    }

    fn exists(&self, user_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(diesel::dsl::exists(
            users::table.filter(users::id.eq(user_id)),
        ))
        .get_result::<bool>(&mut conn)
        .into_core()
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(User::from)
            .ok_or_else(|| user_not_found(user_id))
    }

    async fn set_primary_public_key(&self, user_id: &str, public_key: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let public_key = public_key.to_string();
        self.writer
            .exec(move |conn| {
                let updated = diesel::update(users::table.find(&user_id))
                    .set((
                        users::stellar_public_key.eq(Some(public_key)),
                        users::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                if updated == 0 {
                    return Err(user_not_found(&user_id));
                }
                Ok(())
            })
            .await
    }
}
