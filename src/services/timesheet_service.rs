use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::Principal;
use crate::database::models::{EntryDetails, TimesheetEntry};
use crate::database::query_builder::bind_query_as;
use crate::database::repository::ENTRIES;
use crate::database::{Changeset, Repository};
use crate::error::ApiError;
use crate::services::scope::{parse_date, Scope};
use crate::services::task_service::TaskService;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub task_id: Option<i64>,
    pub hours_spent: Option<f64>,
    pub entry_date: Option<String>,
    pub notes: Option<String>,
}

/// Partial entry update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    pub task_id: Option<i64>,
    pub hours_spent: Option<f64>,
    pub entry_date: Option<String>,
    pub notes: Option<String>,
}

/// Hours must lie in (0, 24]
pub fn check_hours(hours: f64) -> Result<f64, ApiError> {
    if hours > 0.0 && hours <= 24.0 {
        Ok(hours)
    } else {
        Err(ApiError::field("hoursSpent", "Hours must be between 0 and 24"))
    }
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Edit,
    Delete,
}

pub struct TimesheetService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TimesheetService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> Repository<'a, TimesheetEntry> {
        Repository::new(ENTRIES, self.pool)
    }

    async fn require_task(&self, task_id: i64) -> Result<(), ApiError> {
        if TaskService::new(self.pool).exists(task_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found("Task not found"))
        }
    }

    /// Load an entry the caller may mutate: its owner or any admin
    async fn owned_entry(&self, principal: &Principal, id: i64, mutation: Mutation) -> Result<TimesheetEntry, ApiError> {
        let entry = self
            .repository()
            .select_one(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Entry not found"))?;

        if !principal.is_admin() && entry.user_id != principal.id {
            warn!(
                "User {} attempted to {:?} entry {} owned by user {}",
                principal.id, mutation, id, entry.user_id
            );
            return Err(match mutation {
                Mutation::Edit => ApiError::forbidden("Cannot edit other users entries"),
                Mutation::Delete => ApiError::forbidden("Cannot delete other users entries"),
            });
        }
        Ok(entry)
    }

    /// Entries in scope joined with owner and task names, latest day first
    pub async fn list(&self, scope: &Scope) -> Result<Vec<EntryDetails>, ApiError> {
        let conditions = scope.conditions("te.user_id", "te.entry_date");
        let sql = format!(
            r#"
            SELECT
                te.id, te.user_id, te.task_id, te.hours_spent, te.entry_date, te.notes, te.created_at,
                u.username, u.full_name, t.task_name
            FROM timesheet_entries te
            JOIN users u ON te.user_id = u.id
            JOIN tasks t ON te.task_id = t.id
            {}
            ORDER BY te.entry_date DESC, te.created_at DESC, te.id DESC
            "#,
            conditions.where_sql()
        );

        let mut q = sqlx::query_as::<_, EntryDetails>(&sql);
        for p in conditions.params() {
            q = bind_query_as(q, p);
        }
        Ok(q.fetch_all(self.pool).await?)
    }

    /// Record hours for the caller. The owner is always the session user.
    pub async fn create(&self, principal: &Principal, input: NewEntry) -> Result<i64, ApiError> {
        let (task_id, hours_spent, entry_date) = match (input.task_id, input.hours_spent, input.entry_date) {
            (Some(task_id), Some(hours), Some(date)) if !date.is_empty() => (task_id, hours, date),
            _ => return Err(ApiError::validation("Task, hours, and date required")),
        };
        let hours_spent = check_hours(hours_spent)?;
        let entry_date = parse_date("entryDate", Some(&entry_date))?
            .ok_or_else(|| ApiError::validation("Task, hours, and date required"))?;
        self.require_task(task_id).await?;

        let id = sqlx::query(
            "INSERT INTO timesheet_entries (user_id, task_id, hours_spent, entry_date, notes) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(principal.id)
        .bind(task_id)
        .bind(hours_spent)
        .bind(entry_date)
        .bind(input.notes.unwrap_or_default())
        .execute(self.pool)
        .await?
        .last_insert_rowid();

        info!("User {} logged {}h on task {} for {}", principal.id, hours_spent, task_id, entry_date);
        Ok(id)
    }

    pub async fn update(&self, principal: &Principal, id: i64, patch: EntryPatch) -> Result<(), ApiError> {
        self.owned_entry(principal, id, Mutation::Edit).await?;

        if let Some(task_id) = patch.task_id {
            self.require_task(task_id).await?;
        }
        let hours_spent = patch.hours_spent.map(check_hours).transpose()?;
        let entry_date = parse_date("entryDate", patch.entry_date.as_deref())?;

        let changes = Changeset::new()
            .set_opt("task_id", patch.task_id)
            .set_opt("hours_spent", hours_spent)
            .set_opt("entry_date", entry_date)
            .set_opt("notes", patch.notes);
        if changes.is_empty() {
            return Err(ApiError::validation("No fields to update"));
        }

        self.repository().update(id, &changes).await?;
        info!("User {} updated entry {} ({})", principal.id, id, changes.columns().join(", "));
        Ok(())
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ApiError> {
        self.owned_entry(principal, id, Mutation::Delete).await?;
        self.repository().delete(id).await?;
        info!("User {} deleted entry {}", principal.id, id);
        Ok(())
    }
}
