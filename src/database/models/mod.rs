pub mod analytics;
pub mod entry;
pub mod task;
pub mod user;

pub use analytics::{DateHours, Summary, TaskHours, UserHours};
pub use entry::{EntryDetails, TimesheetEntry};
pub use task::{Task, TaskStatus};
pub use user::{Role, UserRecord, UserSummary};
