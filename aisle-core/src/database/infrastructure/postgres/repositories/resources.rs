use std::marker::PhantomData;
use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;

use super::tables::PostgresTable;
use crate::database::ports::ResourceRepository;
use crate::error::{CatalogError, Result};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed repository for any [`PostgresTable`].
///
/// Queries are assembled from the table descriptor and checked at runtime;
/// foreign key cascades are left to the schema.
pub struct PostgresResourceRepository<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for PostgresResourceRepository<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<R> fmt::Debug for PostgresResourceRepository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresResourceRepository")
            .field("resource", &std::any::type_name::<R>())
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl<R> PostgresResourceRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn select_columns<R: PostgresTable>() -> String {
    std::iter::once("id")
        .chain(R::WRITE_COLUMNS.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

fn map_write_error(err: sqlx::Error, resource: &str) -> CatalogError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            CatalogError::Conflict(format!("{resource} already exists"))
        }
        _ => CatalogError::Database(err),
    }
}

#[async_trait]
impl<R: PostgresTable> ResourceRepository<R> for PostgresResourceRepository<R> {
    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>> {
        let columns = R::filter_columns(filter);
        let mut sql = format!("SELECT {} FROM {}", select_columns::<R>(), R::TABLE);
        for (position, (column, _)) in columns.iter().enumerate() {
            let keyword = if position == 0 { "WHERE" } else { "AND" };
            sql.push_str(&format!(" {keyword} {column} = ${}", position + 1));
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, R>(&sql);
        for (_, value) in columns {
            query = query.bind(value);
        }
        Ok(query.fetch_all(self.pool()).await?)
    }

    async fn get(&self, id: i64) -> Result<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            select_columns::<R>(),
            R::TABLE
        );
        Ok(sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ANY($1)",
            select_columns::<R>(),
            R::TABLE
        );
        let rows = sqlx::query_as::<_, R>(&sql)
            .bind(ids.to_vec())
            .fetch_all(self.pool())
            .await?;

        Ok(ids
            .iter()
            .filter_map(|id| rows.iter().find(|row| row.id() == *id).cloned())
            .collect())
    }

    async fn insert(&self, draft: R::ForCreation) -> Result<R> {
        let placeholders = (1..=R::WRITE_COLUMNS.len())
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            R::TABLE,
            R::WRITE_COLUMNS.join(", "),
            placeholders,
            select_columns::<R>()
        );

        R::bind_creation(sqlx::query_as::<_, R>(&sql), draft)
            .fetch_one(self.pool())
            .await
            .map_err(|err| map_write_error(err, R::NAME))
    }

    async fn update(&self, entity: &R) -> Result<bool> {
        let assignments = R::WRITE_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ${}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${}",
            R::TABLE,
            assignments,
            R::WRITE_COLUMNS.len() + 1
        );

        let result = R::bind_update(sqlx::query(&sql), entity)
            .bind(entity.id())
            .execute(self.pool())
            .await
            .map_err(|err| map_write_error(err, R::NAME))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", R::TABLE);
        Ok(sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(self.pool())
            .await?)
    }
}
