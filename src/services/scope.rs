use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::Principal;
use crate::database::Conditions;
use crate::error::ApiError;

/// Raw `?startDate&endDate&userId` query string. Empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<String>,
}

/// Effective (user, date range) restriction applied to ledger and analytics queries.
/// Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub user_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Scope {
    /// A non-admin is always pinned to their own id; a `userId` they send is
    /// ignored rather than rejected. Admins may narrow to any user.
    pub fn resolve(principal: &Principal, query: &ScopeQuery) -> Result<Self, ApiError> {
        let user_id = if principal.is_admin() {
            parse_id("userId", query.user_id.as_deref())?
        } else {
            Some(principal.id)
        };

        Ok(Self {
            user_id,
            start_date: parse_date("startDate", query.start_date.as_deref())?,
            end_date: parse_date("endDate", query.end_date.as_deref())?,
        })
    }

    /// User and date predicates against the given columns
    pub fn conditions(&self, user_column: &str, date_column: &str) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.push_opt(&format!("{} = ?", user_column), self.user_id);
        conditions.push_opt(&format!("{} >= ?", date_column), self.start_date);
        conditions.push_opt(&format!("{} <= ?", date_column), self.end_date);
        conditions
    }

    /// Date predicates only, for roll-ups that span every user
    pub fn date_conditions(&self, date_column: &str) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.push_opt(&format!("{} >= ?", date_column), self.start_date);
        conditions.push_opt(&format!("{} <= ?", date_column), self.end_date);
        conditions
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::field(field, format!("Invalid date '{}', expected YYYY-MM-DD", v))),
    }
}

fn parse_id(field: &str, value: Option<&str>) -> Result<Option<i64>, ApiError> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::field(field, format!("Invalid id '{}'", v))),
    }
}
