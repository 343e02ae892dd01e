use std::sync::LazyLock;

use common::models::{CATEGORY_PREFIX, CATEGORY_STATUS};
use regex::Regex;

use crate::Param;

static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

static YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid month pattern"));

/// Optional row filters shared by the listing and aggregate queries.
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusFilter {
    pub status: Option<String>,
    pub like: Option<String>,
    pub day: Option<String>,
}

impl StatusFilter {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub fn day(day: impl Into<String>) -> Self {
        Self {
            day: Some(day.into()),
            ..Self::default()
        }
    }

    pub fn with_like(mut self, like: impl Into<String>) -> Self {
        self.like = Some(like.into());
        self
    }

    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayFilter {
    Date(String),
    Month(String),
}

impl DayFilter {
    /// Accepts `YYYY-MM-DD` or `YYYY-MM`; anything else is `None`.
    pub fn parse(day: &str) -> Option<Self> {
        let day = day.trim();
        if FULL_DATE.is_match(day) {
            Some(DayFilter::Date(day.to_string()))
        } else if YEAR_MONTH.is_match(day) {
            Some(DayFilter::Month(day.to_string()))
        } else {
            None
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn has_where(query: &str) -> bool {
    query.to_ascii_uppercase().contains(" WHERE ")
}

/// Appends the active filters of `filter` to `query`, extending `params` with
/// one value per placeholder. The first condition opens a `WHERE` clause
/// (unless the query already has one) and the rest are joined with `AND`.
/// A `day` that is neither a date nor a month is ignored.
pub fn add_status(
    query: impl Into<String>,
    params: impl IntoIterator<Item = Param>,
    filter: &StatusFilter,
) -> (String, Vec<Param>) {
    let mut query = query.into();
    let mut params: Vec<Param> = params.into_iter().collect();
    let mut conditions: Vec<String> = Vec::new();

    match non_empty(&filter.status) {
        Some(CATEGORY_STATUS) => {
            conditions.push(format!("response_status like '{}%'", CATEGORY_PREFIX));
        }
        Some(status) => {
            conditions.push("response_status = ?".to_string());
            params.push(Param::from(status));
        }
        None => {}
    }

    // Whitespace is part of a LIKE pattern, so it is only checked, not trimmed.
    if let Some(like) = filter.like.as_deref().filter(|v| !v.trim().is_empty()) {
        conditions.push("response_status like ?".to_string());
        params.push(Param::from(like));
    }

    match non_empty(&filter.day).and_then(DayFilter::parse) {
        Some(DayFilter::Date(day)) => {
            conditions.push("date_only = ?".to_string());
            params.push(Param::Text(day));
        }
        Some(DayFilter::Month(month)) => {
            conditions.push("strftime('%Y-%m', date_only) = ?".to_string());
            params.push(Param::Text(month));
        }
        None => {}
    }

    let mut joined = has_where(&query);
    for condition in conditions {
        query.push_str(if joined { " AND " } else { " WHERE " });
        query.push_str(&condition);
        joined = true;
    }

    (query, params)
}
