//! Temp-file database setup shared by the repository tests.

use diesel::RunQueryDsl;
use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};

/// Fresh migrated database. Keep the `TempDir` alive for the test's duration.
pub(crate) fn test_db() -> (Arc<DbPool>, WriteHandle, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();

    init(&db_path).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    (pool, writer, temp_dir)
}

/// Inserts a bare user row to satisfy foreign keys.
pub(crate) fn insert_user(pool: &DbPool, user_id: &str) {
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::sql_query(format!(
        "INSERT INTO users (id, created_at, updated_at) VALUES ('{}', datetime('now'), datetime('now'))",
        user_id
    ))
    .execute(&mut conn)
    .expect("Failed to create test user");
}
