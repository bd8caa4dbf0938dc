use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::auth::Principal;
use crate::database::models::{DateHours, Summary, TaskHours, UserHours};
use crate::database::query_builder::bind_query_as;
use crate::database::Conditions;
use crate::error::ApiError;
use crate::services::scope::Scope;

/// All four roll-ups over the same scope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub summary: Summary,
    pub hours_by_task: Vec<TaskHours>,
    pub hours_by_date: Vec<DateHours>,
    pub hours_by_user: Vec<UserHours>,
}

pub struct AnalyticsService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch<T>(&self, sql: &str, conditions: &Conditions) -> Result<Vec<T>, ApiError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(sql);
        for p in conditions.params() {
            q = bind_query_as(q, p);
        }
        Ok(q.fetch_all(self.pool).await?)
    }

    pub async fn hours_by_task(&self, scope: &Scope) -> Result<Vec<TaskHours>, ApiError> {
        let conditions = scope.conditions("te.user_id", "te.entry_date");
        let sql = format!(
            r#"
            SELECT t.id AS task_id, t.task_name,
                   COALESCE(SUM(te.hours_spent), 0.0) AS total_hours,
                   COUNT(te.id) AS entry_count
            FROM timesheet_entries te
            JOIN tasks t ON te.task_id = t.id
            {}
            GROUP BY t.id, t.task_name
            ORDER BY total_hours DESC, t.id ASC
            "#,
            conditions.where_sql()
        );
        self.fetch(&sql, &conditions).await
    }

    pub async fn hours_by_date(&self, scope: &Scope) -> Result<Vec<DateHours>, ApiError> {
        let conditions = scope.conditions("te.user_id", "te.entry_date");
        let sql = format!(
            r#"
            SELECT te.entry_date, COALESCE(SUM(te.hours_spent), 0.0) AS total_hours
            FROM timesheet_entries te
            {}
            GROUP BY te.entry_date
            ORDER BY te.entry_date ASC
            "#,
            conditions.where_sql()
        );
        self.fetch(&sql, &conditions).await
    }

    /// Every employee over the date range, zero rows included. Ignores the user filter.
    pub async fn hours_by_user(&self, scope: &Scope) -> Result<Vec<UserHours>, ApiError> {
        let conditions = scope.date_conditions("te.entry_date");
        let sql = format!(
            r#"
            SELECT u.id AS user_id, u.full_name, u.username,
                   COALESCE(SUM(te.hours_spent), 0.0) AS total_hours,
                   COUNT(DISTINCT te.entry_date) AS days_worked,
                   COUNT(te.id) AS entry_count
            FROM users u
            LEFT JOIN timesheet_entries te ON te.user_id = u.id{}
            WHERE u.role = 'employee'
            GROUP BY u.id, u.full_name, u.username
            ORDER BY total_hours DESC, u.id ASC
            "#,
            conditions.and_sql()
        );
        self.fetch(&sql, &conditions).await
    }

    pub async fn summary(&self, scope: &Scope) -> Result<Summary, ApiError> {
        let conditions = scope.conditions("te.user_id", "te.entry_date");
        let sql = format!(
            r#"
            SELECT COALESCE(SUM(te.hours_spent), 0.0) AS total_hours,
                   COUNT(te.id) AS total_entries,
                   COUNT(DISTINCT te.entry_date) AS days_logged,
                   COUNT(DISTINCT te.task_id) AS tasks_worked
            FROM timesheet_entries te
            {}
            "#,
            conditions.where_sql()
        );
        let rows: Vec<Summary> = self.fetch(&sql, &conditions).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Run every roll-up concurrently. Any failure fails the report.
    pub async fn report(&self, principal: &Principal, scope: &Scope) -> Result<AnalyticsReport, ApiError> {
        let by_user = async {
            if principal.is_admin() {
                self.hours_by_user(scope).await
            } else {
                Ok(Vec::new())
            }
        };

        let (summary, hours_by_task, hours_by_date, hours_by_user) = tokio::try_join!(
            self.summary(scope),
            self.hours_by_task(scope),
            self.hours_by_date(scope),
            by_user
        )?;

        debug!(
            "Analytics for user {}: {} entries across {} tasks",
            principal.id, summary.total_entries, summary.tasks_worked
        );
        Ok(AnalyticsReport {
            summary,
            hours_by_task,
            hours_by_date,
            hours_by_user,
        })
    }
}
