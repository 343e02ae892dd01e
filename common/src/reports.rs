//! Shapes returned by the report endpoints and rendered by the HTML pages.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{DayGroup, LogEntry, LogTable, OrderBy, SortOrder};

/// Paginated log listing.
#[derive(Debug, Clone, Serialize)]
pub struct LogsView {
    pub logs: Vec<LogEntry>,
    pub tab: LogsTab,
    pub status_table: Vec<String>,
    pub dbs: Vec<String>,
}

/// Pagination, sorting and filter state of a [`LogsView`].
#[derive(Debug, Clone, Serialize)]
pub struct LogsTab {
    pub sum_all: i64,
    pub sum_response_count: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    /// 1-based positions of the first and last row on this page, 0 when
    /// the page is empty.
    pub start_log: i64,
    pub end_log: i64,
    pub order: SortOrder,
    pub order_by: OrderBy,
    pub status: String,
    pub like: String,
    pub day: String,
    pub table_name: LogTable,
    pub db_path: String,
    pub order_by_types: Vec<OrderBy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub title_count: i64,
    pub count: i64,
}

/// All status buckets of one day merged together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day: String,
    pub title_count: i64,
    pub total: i64,
    pub by_status: BTreeMap<String, BucketCounts>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayTab {
    pub table_name: LogTable,
    pub db_path: String,
    pub days: usize,
    pub sum_titles: i64,
    pub sum_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsByDate {
    pub logs: Vec<DaySummary>,
    pub tab: DayTab,
    pub status_table: Vec<String>,
    pub logs_data: Vec<DayGroup>,
    pub dbs: Vec<String>,
}

/// Title counts for the en2ar dump, serialized as decimal strings.
#[derive(Debug, Clone, Serialize)]
pub struct EnToArTab {
    pub sum_all: String,
    pub sum_data_result: String,
    pub sum_no_result: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnToAr {
    pub tab: EnToArTab,
    pub no_result: Vec<String>,
    pub data_result: BTreeMap<String, String>,
}
