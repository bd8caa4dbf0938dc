pub mod tasks;
pub mod users;
