use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::{Task, TaskStatus};
use crate::database::repository::TASKS;
use crate::database::{Changeset, Repository};
use crate::error::ApiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub status: Option<String>,
}

/// Partial task update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTask {
    pub id: i64,
    pub task_name: String,
    pub description: String,
    pub estimated_hours: f64,
    pub status: TaskStatus,
    pub message: &'static str,
}

fn check_estimate(hours: f64) -> Result<f64, ApiError> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(hours)
    } else {
        Err(ApiError::field("estimatedHours", "Estimated hours must be zero or more"))
    }
}

impl TaskPatch {
    /// Empty names and unknown statuses are dropped, matching how the
    /// registry has always treated them.
    pub fn into_changeset(self) -> Result<Changeset, ApiError> {
        let estimated_hours = self.estimated_hours.map(check_estimate).transpose()?;
        let status = self.status.and_then(|s| s.parse::<TaskStatus>().ok());

        Ok(Changeset::new()
            .set_opt("task_name", self.task_name.filter(|n| !n.is_empty()))
            .set_opt("description", self.description)
            .set_opt("estimated_hours", estimated_hours)
            .set_opt("status", status.map(|s| s.as_str())))
    }
}

pub struct TaskService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> Repository<'a, Task> {
        Repository::new(TASKS, self.pool)
    }

    /// Newest first
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")
            .fetch_all(self.pool)
            .await?;
        Ok(tasks)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, ApiError> {
        Ok(self.repository().exists(id).await?)
    }

    pub async fn create(&self, input: NewTask) -> Result<CreatedTask, ApiError> {
        let task_name = input
            .task_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::field("taskName", "Task name required"))?;
        let description = input.description.unwrap_or_default();
        let estimated_hours = check_estimate(input.estimated_hours.unwrap_or(0.0))?;
        let status = match input.status.as_deref() {
            None | Some("") => TaskStatus::default(),
            Some(s) => s
                .parse::<TaskStatus>()
                .map_err(|e| ApiError::field("status", e.to_string()))?,
        };

        let id = sqlx::query(
            "INSERT INTO tasks (task_name, description, estimated_hours, status) VALUES (?, ?, ?, ?)",
        )
        .bind(&task_name)
        .bind(&description)
        .bind(estimated_hours)
        .bind(status)
        .execute(self.pool)
        .await?
        .last_insert_rowid();

        info!("Created task {} '{}'", id, task_name);
        Ok(CreatedTask {
            id,
            task_name,
            description,
            estimated_hours,
            status,
            message: "Task created successfully",
        })
    }

    pub async fn update(&self, id: i64, patch: TaskPatch) -> Result<(), ApiError> {
        let repo = self.repository();
        if !repo.exists(id).await? {
            return Err(ApiError::not_found("Task not found"));
        }

        let changes = patch.into_changeset()?;
        if changes.is_empty() {
            return Err(ApiError::validation("No fields to update"));
        }

        repo.update(id, &changes).await?;
        info!("Updated task {} ({})", id, changes.columns().join(", "));
        Ok(())
    }

    /// Entries that reference the task are left in place
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if self.repository().delete(id).await? == 0 {
            return Err(ApiError::not_found("Task not found"));
        }
        info!("Deleted task {}", id);
        Ok(())
    }
}
