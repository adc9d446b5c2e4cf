use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mediadesk_model::{Collection, CollectionId, Page, PageRequest, Work, WorkId};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::database::ports::works::{
    ActionAudit, ActionLogEntry, WorksReadPort, WorksWritePort,
};
use crate::error::{MediaError, Result};
use crate::search::{SearchField, WorkSearch};

const LIKE_ESCAPE: &str = " ESCAPE E'\\\\'";

/// Ids decode verbatim through their `sqlx(transparent)` impls; stored values
/// belong to ingestion and are not re-validated here.
#[derive(Debug, sqlx::FromRow)]
struct WorkRow {
    id: WorkId,
    title: String,
    host_id: Option<String>,
    allowed_network: String,
    index_time: Option<DateTime<Utc>>,
}

impl WorkRow {
    fn into_work(self, collections: Vec<Collection>) -> Work {
        let mut work = Work::new(self.id, self.title)
            .with_allowed_network(self.allowed_network)
            .with_collections(collections);
        work.host_id = self.host_id;
        work.index_time = self.index_time;
        work
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActionLogRow {
    id: i64,
    action: String,
    work_ids: Vec<String>,
    parameters: Value,
    performed_by: Option<String>,
    performed_at: DateTime<Utc>,
    affected: i64,
}

impl From<ActionLogRow> for ActionLogEntry {
    fn from(row: ActionLogRow) -> Self {
        Self {
            id: row.id,
            action: row.action,
            work_ids: row.work_ids,
            parameters: row.parameters,
            performed_by: row.performed_by,
            performed_at: row.performed_at,
            affected: row.affected,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresWorksRepository {
    pool: PgPool,
}

impl PostgresWorksRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Appends ` AND (...)` for the search, if any. Callers start from
    /// `WHERE 1=1` and alias `works` as `w`.
    fn push_search_filter(builder: &mut QueryBuilder<'_, Postgres>, search: Option<&WorkSearch>) {
        let Some(search) = search else {
            return;
        };
        let pattern = search.like_pattern();

        builder.push(" AND (");
        match search.field() {
            SearchField::Any => {
                builder.push("w.id ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(LIKE_ESCAPE);
                builder.push(" OR w.title ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(LIKE_ESCAPE);
                builder.push(
                    " OR EXISTS (SELECT 1 FROM work_collections wc \
                     WHERE wc.work_id = w.id AND wc.collection_id ILIKE ",
                );
                builder.push_bind(pattern);
                builder.push(LIKE_ESCAPE);
                builder.push(")");
            }
            SearchField::Id => {
                builder.push("w.id ILIKE ");
                builder.push_bind(pattern);
                builder.push(LIKE_ESCAPE);
            }
            SearchField::Title => {
                builder.push("w.title ILIKE ");
                builder.push_bind(pattern);
                builder.push(LIKE_ESCAPE);
            }
            SearchField::HostId => {
                builder.push("w.host_id ILIKE ");
                builder.push_bind(pattern);
                builder.push(LIKE_ESCAPE);
            }
            SearchField::Collection => {
                builder.push(
                    "EXISTS (SELECT 1 FROM work_collections wc \
                     WHERE wc.work_id = w.id AND wc.collection_id ILIKE ",
                );
                builder.push_bind(pattern);
                builder.push(LIKE_ESCAPE);
                builder.push(")");
            }
        }
        builder.push(")");
    }

    async fn load_collections(
        &self,
        work_ids: &[String],
    ) -> Result<HashMap<WorkId, Vec<Collection>>> {
        if work_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(WorkId, CollectionId)> = sqlx::query_as(
            r#"
            SELECT work_id, collection_id
            FROM work_collections
            WHERE work_id = ANY($1)
            ORDER BY work_id, collection_id
            "#,
        )
        .bind(work_ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| MediaError::Internal(format!("Failed to load work collections: {e}")))?;

        let mut by_work: HashMap<WorkId, Vec<Collection>> = HashMap::new();
        for (work_id, collection_id) in rows {
            by_work
                .entry(work_id)
                .or_default()
                .push(Collection::new(collection_id));
        }
        Ok(by_work)
    }

    async fn hydrate(&self, rows: Vec<WorkRow>) -> Result<Vec<Work>> {
        let ids: Vec<String> = rows.iter().map(|row| row.id.as_str().to_string()).collect();
        let mut collections = self.load_collections(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let members = collections.remove(&row.id).unwrap_or_default();
                row.into_work(members)
            })
            .collect())
    }
}

#[async_trait]
impl WorksReadPort for PostgresWorksRepository {
    async fn get_by_id(&self, id: &WorkId) -> Result<Option<Work>> {
        let row = sqlx::query_as::<_, WorkRow>(
            r#"
            SELECT id, title, host_id, allowed_network, index_time
            FROM works
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| MediaError::Internal(format!("Failed to load work {id}: {e}")))?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn search(
        &self,
        search: Option<&WorkSearch>,
        page: PageRequest,
    ) -> Result<Page<Work>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM works w WHERE 1=1");
        Self::push_search_filter(&mut count, search);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to count works: {e}")))?;

        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT w.id, w.title, w.host_id, w.allowed_network, w.index_time
            FROM works w
            WHERE 1=1
            "#,
        );
        Self::push_search_filter(&mut builder, search);
        builder.push(" ORDER BY w.id LIMIT ");
        builder.push_bind(page.limit() as i64);
        builder.push(" OFFSET ");
        builder.push_bind(page.offset() as i64);

        let rows = builder
            .build_query_as::<WorkRow>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to search works: {e}")))?;

        debug!(
            search = ?search.map(ToString::to_string),
            total,
            returned = rows.len(),
            "work search"
        );

        let content = self.hydrate(rows).await?;
        Ok(Page::new(content, page, total.max(0) as u64))
    }

    async fn count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM works")
            .fetch_one(self.pool())
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to count works: {e}")))?;
        Ok(total.max(0) as u64)
    }

    async fn recent_actions(&self, limit: u32) -> Result<Vec<ActionLogEntry>> {
        let rows = sqlx::query_as::<_, ActionLogRow>(
            r#"
            SELECT id, action, work_ids, parameters, performed_by, performed_at, affected
            FROM work_action_log
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| MediaError::Internal(format!("Failed to load action log: {e}")))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl WorksWritePort for PostgresWorksRepository {
    async fn save(&self, work: &Work) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO works (id, title, host_id, allowed_network, index_time)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                host_id = EXCLUDED.host_id,
                allowed_network = EXCLUDED.allowed_network,
                index_time = EXCLUDED.index_time
            "#,
        )
        .bind(work.id.as_str())
        .bind(&work.title)
        .bind(work.host_id.as_deref())
        .bind(&work.allowed_network)
        .bind(work.index_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| MediaError::Internal(format!("Failed to upsert work {}: {e}", work.id)))?;

        let collection_ids: Vec<String> =
            work.collection_ids().map(str::to_string).collect();

        sqlx::query(
            r#"
            INSERT INTO collections (id)
            SELECT UNNEST($1::text[])
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&collection_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| MediaError::Internal(format!("Failed to upsert collections: {e}")))?;

        sqlx::query("DELETE FROM work_collections WHERE work_id = $1")
            .bind(work.id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                MediaError::Internal(format!("Failed to clear collections of {}: {e}", work.id))
            })?;

        sqlx::query(
            r#"
            INSERT INTO work_collections (work_id, collection_id)
            SELECT $1, UNNEST($2::text[])
            "#,
        )
        .bind(work.id.as_str())
        .bind(&collection_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            MediaError::Internal(format!("Failed to link collections of {}: {e}", work.id))
        })?;

        tx.commit()
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to commit work {}: {e}", work.id)))?;

        Ok(())
    }

    async fn set_allowed_network(
        &self,
        work_ids: &[WorkId],
        network: &str,
        audit: &ActionAudit,
    ) -> Result<u64> {
        let ids: Vec<String> = work_ids.iter().map(|id| id.as_str().to_string()).collect();

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to begin transaction: {e}")))?;

        let affected = sqlx::query("UPDATE works SET allowed_network = $1 WHERE id = ANY($2)")
            .bind(network)
            .bind(&ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to update allowed network: {e}")))?
            .rows_affected();

        sqlx::query(
            r#"
            INSERT INTO work_action_log (action, work_ids, parameters, performed_by, affected)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&audit.action)
        .bind(&ids)
        .bind(&audit.parameters)
        .bind(audit.performed_by.as_deref())
        .bind(affected as i64)
        .execute(&mut *tx)
        .await
        .map_err(|e| MediaError::Internal(format!("Failed to record action log: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| MediaError::Internal(format!("Failed to commit network change: {e}")))?;

        Ok(affected)
    }
}
