use std::collections::BTreeMap;

use common::models::{
    DayGroup, LogEntry, LogTable, OrderBy, SortOrder, CATEGORY_PREFIX, CATEGORY_STATUS,
};
use serde_json::Value;
use sqlx::sqlite::SqlitePool;

use crate::{add_status, fetch_all, fetch_as, fetch_one, Param, StatusFilter};

/// Statuses seen this many times or fewer are left out of the status list.
const STATUS_NOISE_THRESHOLD: i64 = 2;

fn status_only(status: Option<&str>) -> StatusFilter {
    StatusFilter {
        status: status.map(str::to_string),
        ..StatusFilter::default()
    }
}

async fn scalar(pool: &SqlitePool, query: &str, params: &[Param], column: &str) -> i64 {
    fetch_one(pool, query, params)
        .await
        .and_then(|row| row.get(column).and_then(Value::as_i64))
        .unwrap_or(0)
}

/// Number of rows, optionally restricted to one status.
pub async fn count_all(pool: &SqlitePool, table: LogTable, status: Option<&str>) -> i64 {
    count_filtered(pool, table, &status_only(status)).await
}

pub async fn count_filtered(pool: &SqlitePool, table: LogTable, filter: &StatusFilter) -> i64 {
    let (query, params) = add_status(
        format!("SELECT COUNT(*) AS count FROM {table}"),
        Vec::new(),
        filter,
    );
    scalar(pool, &query, &params, "count").await
}

/// Total of `response_count`, optionally restricted to one status.
pub async fn sum_response_count(pool: &SqlitePool, table: LogTable, status: Option<&str>) -> i64 {
    sum_filtered(pool, table, &status_only(status)).await
}

pub async fn sum_filtered(pool: &SqlitePool, table: LogTable, filter: &StatusFilter) -> i64 {
    let (query, params) = add_status(
        format!("SELECT COALESCE(SUM(response_count), 0) AS total FROM {table}"),
        Vec::new(),
        filter,
    );
    scalar(pool, &query, &params, "total").await
}

/// Statuses recorded more than twice in `logs`, sorted.
pub async fn get_response_status(pool: &SqlitePool) -> Vec<String> {
    fetch_all(
        pool,
        "SELECT response_status, COUNT(*) AS count FROM logs \
         GROUP BY response_status HAVING COUNT(*) > ? ORDER BY response_status",
        &[Param::Int(STATUS_NOISE_THRESHOLD)],
    )
    .await
    .into_iter()
    .filter_map(|row| {
        row.get("response_status")
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .collect()
}

/// One page of a log listing.
#[derive(Debug, Clone)]
pub struct LogQuery {
    pub per_page: i64,
    pub offset: i64,
    pub order: SortOrder,
    pub order_by: OrderBy,
    pub table: LogTable,
    pub filter: StatusFilter,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            per_page: 10,
            offset: 0,
            order: SortOrder::default(),
            order_by: OrderBy::default(),
            table: LogTable::default(),
            filter: StatusFilter::default(),
        }
    }
}

pub async fn get_logs(pool: &SqlitePool, q: &LogQuery) -> Vec<LogEntry> {
    let (mut query, mut params) = add_status(
        format!(
            "SELECT id, endpoint, request_data, response_status, response_time, \
             response_count, timestamp, date_only FROM {}",
            q.table
        ),
        Vec::new(),
        &q.filter,
    );
    query.push_str(&format!(
        " ORDER BY {} {} LIMIT ? OFFSET ?",
        q.order_by.as_str(),
        q.order.as_sql()
    ));
    params.push(Param::Int(q.per_page));
    params.push(Param::Int(q.offset));
    fetch_as::<LogEntry>(pool, &query, &params).await
}

/// Rows grouped by day and status bucket, where every category label shares
/// the `Category` bucket.
pub async fn fetch_logs_by_date(pool: &SqlitePool, table: LogTable) -> Vec<DayGroup> {
    let query = format!(
        "SELECT date_only, \
         CASE WHEN response_status LIKE '{prefix}%' THEN '{bucket}' ELSE response_status END AS status_group, \
         COUNT(*) AS title_count, COALESCE(SUM(response_count), 0) AS count \
         FROM {table} GROUP BY date_only, status_group ORDER BY date_only, status_group",
        prefix = CATEGORY_PREFIX,
        bucket = CATEGORY_STATUS,
    );
    fetch_as::<DayGroup>(pool, &query, &[]).await
}

/// Title to status for every row of `logs`, optionally limited to a day or
/// month. Later rows overwrite earlier ones.
pub async fn all_logs_en2ar(pool: &SqlitePool, day: Option<&str>) -> BTreeMap<String, String> {
    let filter = StatusFilter {
        day: day.map(str::to_string),
        ..StatusFilter::default()
    };
    let (mut query, params) = add_status(
        "SELECT request_data, response_status FROM logs",
        Vec::new(),
        &filter,
    );
    query.push_str(" ORDER BY id");

    fetch_all(pool, &query, &params)
        .await
        .into_iter()
        .filter_map(|row| {
            let title = row.get("request_data")?.as_str()?.to_string();
            let status = row.get("response_status")?.as_str()?.to_string();
            Some((title, status))
        })
        .collect()
}
