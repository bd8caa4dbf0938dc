pub mod analytics;
pub mod auth;
pub mod tasks;
pub mod timesheet;
