use chrono::NaiveDate;
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

/// A positional statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Integer(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Real(v)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        SqlParam::Date(v)
    }
}

/// AND-joined predicates with their positional parameters, in bind order
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate with exactly one `?` placeholder
    pub fn push(&mut self, clause: impl Into<String>, param: impl Into<SqlParam>) -> &mut Self {
        self.clauses.push(clause.into());
        self.params.push(param.into());
        self
    }

    pub fn push_opt<T: Into<SqlParam>>(&mut self, clause: &str, param: Option<T>) -> &mut Self {
        if let Some(param) = param {
            self.push(clause, param);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// `" AND a = ? AND b >= ?"`, for appending to an existing WHERE or ON clause
    pub fn and_sql(&self) -> String {
        self.clauses.iter().map(|c| format!(" AND {}", c)).collect()
    }

    /// `"WHERE a = ? AND b >= ?"`, or an empty string when there is nothing to filter
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

/// Column assignments for a partial UPDATE. Only the columns that were set are written.
#[derive(Debug, Default)]
pub struct Changeset {
    assignments: Vec<(&'static str, SqlParam)>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<SqlParam>) -> Self {
        self.assignments.push((column, value.into()));
        self
    }

    pub fn set_opt<T: Into<SqlParam>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(c, _)| *c).collect()
    }

    /// `UPDATE table SET a = ?, b = ? WHERE id = ?`; the id is bound last by the caller
    pub fn update_sql(&self, table: &str) -> String {
        let sets: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect();
        format!("UPDATE {} SET {} WHERE id = ?", table, sets.join(", "))
    }

    pub fn params(&self) -> impl Iterator<Item = &SqlParam> {
        self.assignments.iter().map(|(_, v)| v)
    }
}

pub fn bind_query<'q>(
    q: Query<'q, Sqlite, SqliteArguments<'q>>,
    v: &'q SqlParam,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match v {
        SqlParam::Integer(i) => q.bind(*i),
        SqlParam::Real(f) => q.bind(*f),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Date(d) => q.bind(*d),
    }
}

pub fn bind_query_as<'q, O>(
    q: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    v: &'q SqlParam,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>>
where
    O: for<'r> FromRow<'r, SqliteRow>,
{
    match v {
        SqlParam::Integer(i) => q.bind(*i),
        SqlParam::Real(f) => q.bind(*f),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Date(d) => q.bind(*d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_conditions_render_nothing() {
        let conditions = Conditions::new();
        assert!(conditions.is_empty());
        assert_eq!(conditions.where_sql(), "");
        assert_eq!(conditions.and_sql(), "");
    }

    #[test]
    fn conditions_keep_params_in_clause_order() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut conditions = Conditions::new();
        conditions
            .push("te.user_id = ?", 7i64)
            .push_opt("te.entry_date >= ?", Some(start))
            .push_opt::<NaiveDate>("te.entry_date <= ?", None);

        assert_eq!(conditions.where_sql(), "WHERE te.user_id = ? AND te.entry_date >= ?");
        assert_eq!(conditions.and_sql(), " AND te.user_id = ? AND te.entry_date >= ?");
        assert_eq!(
            conditions.params(),
            &[SqlParam::Integer(7), SqlParam::Date(start)]
        );
    }

    #[test]
    fn changeset_renders_only_present_columns() {
        let changes = Changeset::new()
            .set_opt("task_name", Some("Review"))
            .set_opt::<f64>("estimated_hours", None)
            .set("status", "inactive");

        assert!(!changes.is_empty());
        assert_eq!(changes.columns(), vec!["task_name", "status"]);
        assert_eq!(
            changes.update_sql("tasks"),
            "UPDATE tasks SET task_name = ?, status = ? WHERE id = ?"
        );
    }

    #[test]
    fn changeset_without_fields_is_empty() {
        let changes = Changeset::new().set_opt::<String>("notes", None);
        assert!(changes.is_empty());
    }
}
