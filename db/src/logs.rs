use common::models::LogTable;
use sqlx::sqlite::SqlitePool;

use crate::{db_commit, Param};

/// Seconds rounded to whole milliseconds.
pub fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

fn upsert_query(table: LogTable) -> String {
    format!(
        "INSERT INTO {table} (endpoint, request_data, response_status, response_time, response_count, timestamp, date_only) \
         VALUES (?, ?, ?, ?, 1, CURRENT_TIMESTAMP, DATE('now')) \
         ON CONFLICT(request_data, response_status, date_only) DO UPDATE SET \
         response_count = response_count + 1, timestamp = CURRENT_TIMESTAMP"
    )
}

/// Records one request outcome. Batch requests land in `list_logs`, all
/// others in `logs`; a repeat of the same (request, status) on the same day
/// bumps `response_count` instead of adding a row.
pub async fn log_request(
    pool: &SqlitePool,
    endpoint: &str,
    request_data: &str,
    response_status: impl ToString,
    elapsed_secs: f64,
) -> Result<u64, sqlx::Error> {
    let table = LogTable::for_endpoint(endpoint);
    let params = [
        Param::from(endpoint),
        Param::from(request_data),
        Param::Text(response_status.to_string()),
        Param::Real(round_millis(elapsed_secs)),
    ];
    db_commit(pool, &upsert_query(table), &params).await
}
