use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

/// Bare `timesheet_entries` row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TimesheetEntry {
    pub id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub hours_spent: f64,
    pub entry_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

/// Entry joined with its owner's and task's display fields
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EntryDetails {
    pub id: i64,
    pub user_id: i64,
    pub task_id: i64,
    pub hours_spent: f64,
    pub entry_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub full_name: String,
    pub task_name: String,
}
