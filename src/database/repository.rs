use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::FromRow;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_query, Changeset};

pub const USERS: &str = "users";
pub const TASKS: &str = "tasks";
pub const ENTRIES: &str = "timesheet_entries";

/// Id-keyed access to a single table
pub struct Repository<'p, T> {
    table_name: &'static str,
    pool: &'p SqlitePool,
    _phantom: std::marker::PhantomData<T>,
}

impl<'p, T> Repository<'p, T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: &'p SqlitePool) -> Self {
        Self {
            table_name,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", self.table_name);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i64, what: &str) -> Result<T, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", what)))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", self.table_name);
        let count: (i64,) = sqlx::query_as(&sql).bind(id).fetch_one(self.pool).await?;
        Ok(count.0 > 0)
    }

    /// Apply a partial update; returns the number of rows written
    pub async fn update(&self, id: i64, changes: &Changeset) -> Result<u64, DatabaseError> {
        if changes.is_empty() {
            return Err(DatabaseError::QueryError("empty changeset".to_string()));
        }
        let sql = changes.update_sql(self.table_name);
        let mut q = sqlx::query(&sql);
        for p in changes.params() {
            q = bind_query(q, p);
        }
        let result = q.bind(id).execute(self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Returns the number of rows removed
    pub async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.table_name);
        let result = sqlx::query(&sql).bind(id).execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}
