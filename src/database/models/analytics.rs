use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaskHours {
    pub task_id: i64,
    pub task_name: String,
    pub total_hours: f64,
    pub entry_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DateHours {
    pub entry_date: NaiveDate,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserHours {
    pub user_id: i64,
    pub full_name: String,
    pub username: String,
    pub total_hours: f64,
    pub days_worked: i64,
    pub entry_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct Summary {
    pub total_hours: f64,
    pub total_entries: i64,
    pub days_logged: i64,
    pub tasks_worked: i64,
}
