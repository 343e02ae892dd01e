use serde::{Deserialize, Serialize};

/// Status stored when the resolver produced no label.
pub const NO_RESULT: &str = "no_result";

/// Filter value that selects every category-labelled status.
pub const CATEGORY_STATUS: &str = "Category";

/// Arabic word for "category"; resolved labels start with it.
pub const CATEGORY_PREFIX: &str = "تصنيف";

/// Endpoint path of the batch lookup; its requests go to `list_logs`.
pub const LIST_ENDPOINT: &str = "/api/list";

/// Endpoint path recorded for single-title lookups.
pub const TITLE_ENDPOINT: &str = "/api/{title}";

/// Database file used when a request does not pick a known one.
pub const DEFAULT_DB: &str = "new_logs.db";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub endpoint: String,
    pub request_data: String,
    pub response_status: String,
    pub response_time: Option<f64>,
    pub response_count: i64,
    pub timestamp: Option<String>,
    pub date_only: Option<String>,
}

/// One (day, status bucket) row of the daily aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DayGroup {
    pub date_only: String,
    pub status_group: String,
    pub title_count: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTable {
    #[default]
    Logs,
    ListLogs,
}

impl LogTable {
    pub const ALL: [LogTable; 2] = [LogTable::Logs, LogTable::ListLogs];

    pub fn as_str(self) -> &'static str {
        match self {
            LogTable::Logs => "logs",
            LogTable::ListLogs => "list_logs",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Unknown or missing table names fall back to `logs`.
    pub fn from_param(name: Option<&str>) -> Self {
        name.and_then(Self::parse).unwrap_or_default()
    }

    pub fn for_endpoint(endpoint: &str) -> Self {
        if endpoint == LIST_ENDPOINT {
            LogTable::ListLogs
        } else {
            LogTable::Logs
        }
    }
}

impl std::fmt::Display for LogTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// `asc`/`desc` in any case; everything else is `DESC`.
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Columns a log listing may be sorted by. These are interpolated into SQL,
/// so nothing outside this list can reach a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    Id,
    Endpoint,
    RequestData,
    ResponseStatus,
    ResponseTime,
    #[default]
    ResponseCount,
    Timestamp,
    DateOnly,
}

impl OrderBy {
    pub const ALL: [OrderBy; 8] = [
        OrderBy::Id,
        OrderBy::Endpoint,
        OrderBy::RequestData,
        OrderBy::ResponseStatus,
        OrderBy::ResponseTime,
        OrderBy::ResponseCount,
        OrderBy::Timestamp,
        OrderBy::DateOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Id => "id",
            OrderBy::Endpoint => "endpoint",
            OrderBy::RequestData => "request_data",
            OrderBy::ResponseStatus => "response_status",
            OrderBy::ResponseTime => "response_time",
            OrderBy::ResponseCount => "response_count",
            OrderBy::Timestamp => "timestamp",
            OrderBy::DateOnly => "date_only",
        }
    }

    /// Unknown column names fall back to `timestamp`.
    pub fn from_param(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .unwrap_or(OrderBy::Timestamp)
    }
}

/// Collapses every category label into the single `Category` bucket.
pub fn status_bucket(status: &str) -> &str {
    if status.starts_with(CATEGORY_PREFIX) {
        CATEGORY_STATUS
    } else {
        status
    }
}
