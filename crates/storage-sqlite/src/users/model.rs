//! Database model for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use lumenfolio_core::users::User;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub email: Option<String>,
    pub stellar_public_key: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            stellar_public_key: db.stellar_public_key,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
