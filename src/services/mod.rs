pub mod analytics_service;
pub mod auth_service;
pub mod scope;
pub mod task_service;
pub mod timesheet_service;
pub mod user_service;

pub use analytics_service::{AnalyticsReport, AnalyticsService};
pub use auth_service::{AuthService, LoginRequest};
pub use scope::{Scope, ScopeQuery};
pub use task_service::{CreatedTask, NewTask, TaskPatch, TaskService};
pub use timesheet_service::{EntryPatch, NewEntry, TimesheetService};
pub use user_service::{CreatedUser, NewUser, UserPatch, UserService};
