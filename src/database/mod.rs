pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{Changeset, Conditions, SqlParam};
pub use repository::Repository;
