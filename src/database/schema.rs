//! Table definitions applied at startup.
//!
//! Entries carry plain integer `user_id`/`task_id` columns without `REFERENCES`
//! clauses: deleting a task or user leaves its entries in place, and the
//! joined listings and analytics drop them through inner joins.

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        full_name TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('admin', 'employee')),
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        estimated_hours REAL NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS timesheet_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        task_id INTEGER NOT NULL,
        hours_spent REAL NOT NULL CHECK (hours_spent > 0 AND hours_spent <= 24),
        entry_date DATE NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_entries_user_date ON timesheet_entries (user_id, entry_date)",
    "CREATE INDEX IF NOT EXISTS idx_entries_date ON timesheet_entries (entry_date)",
];
