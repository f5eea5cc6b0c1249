use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::PortfolioSnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::portfolio_snapshots;
use lumenfolio_core::errors::Result;
use lumenfolio_core::portfolio::snapshot::{
    HistoryPage, PortfolioSnapshot, SnapshotRepositoryTrait,
};
use lumenfolio_core::utils::time_utils::to_storage_timestamp;

/// Append-only snapshot store. Single-row reads order by `created_at DESC, id DESC`.
pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_domain(rows: Vec<PortfolioSnapshotDB>) -> Result<Vec<PortfolioSnapshot>> {
    rows.into_iter().map(PortfolioSnapshot::try_from).collect()
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn append(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        let row = PortfolioSnapshotDB::try_from(&snapshot)?;
        self.writer
            .exec(move |conn| {
                diesel::insert_into(portfolio_snapshots::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;
        debug!(
            "Stored snapshot {} for user {}",
            snapshot.id, snapshot.user_id
        );
        Ok(snapshot)
    }

    fn latest(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        portfolio_snapshots::table
            .filter(portfolio_snapshots::user_id.eq(user_id))
            .order((
                portfolio_snapshots::created_at.desc(),
                portfolio_snapshots::id.desc(),
            ))
            .select(PortfolioSnapshotDB::as_select())
            .first::<PortfolioSnapshotDB>(&mut conn)
            .optional()
            .into_core()?
            .map(PortfolioSnapshot::try_from)
            .transpose()
    }

    fn latest_before(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        portfolio_snapshots::table
            .filter(portfolio_snapshots::user_id.eq(user_id))
            .filter(portfolio_snapshots::created_at.le(to_storage_timestamp(cutoff)))
            .order((
                portfolio_snapshots::created_at.desc(),
                portfolio_snapshots::id.desc(),
            ))
            .select(PortfolioSnapshotDB::as_select())
            .first::<PortfolioSnapshotDB>(&mut conn)
            .optional()
            .into_core()?
            .map(PortfolioSnapshot::try_from)
            .transpose()
    }

    fn page(&self, user_id: &str, page: HistoryPage) -> Result<(Vec<PortfolioSnapshot>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let total = portfolio_snapshots::table
            .filter(portfolio_snapshots::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;

        let rows = portfolio_snapshots::table
            .filter(portfolio_snapshots::user_id.eq(user_id))
            .order((
                portfolio_snapshots::created_at.desc(),
                portfolio_snapshots::id.desc(),
            ))
            .limit(page.limit)
            .offset(page.offset())
            .select(PortfolioSnapshotDB::as_select())
            .load::<PortfolioSnapshotDB>(&mut conn)
            .into_core()?;

        Ok((to_domain(rows)?, total))
    }
}
