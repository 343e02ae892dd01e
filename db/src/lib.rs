mod logs;
mod query;
mod registry;
mod stats;

pub use logs::*;
pub use query::*;
pub use registry::*;
pub use stats::*;

use serde_json::{Map, Value};
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, FromRow, Row as _, TypeInfo, ValueRef};

/// A fetched row keyed by column name.
pub type Row = Map<String, Value>;

/// A positional `?` parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Int(i64),
    Real(f64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Real(value)
    }
}

pub async fn init_pool(db_path: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Creates `logs` and `list_logs` if missing. Safe to run repeatedly.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for stmt in include_str!("../../migrations/001_init.sql").split(';') {
        let stmt = stmt.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt).execute(pool).await?;
        }
    }
    Ok(())
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Param],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Param::Text(s) => query.bind(s.as_str()),
            Param::Int(i) => query.bind(*i),
            Param::Real(f) => query.bind(*f),
        };
    }
    query
}

fn bind_params_as<'q, T>(
    mut query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    params: &'q [Param],
) -> QueryAs<'q, Sqlite, T, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Param::Text(s) => query.bind(s.as_str()),
            Param::Int(i) => query.bind(*i),
            Param::Real(f) => query.bind(*f),
        };
    }
    query
}

fn column_value(row: &SqliteRow, index: usize) -> Value {
    let Ok(raw) = row.try_get_raw(index) else {
        return Value::Null;
    };
    if raw.is_null() {
        return Value::Null;
    }
    let type_name = raw.type_info().name().to_string();
    match type_name.as_str() {
        "INTEGER" => row.try_get::<i64, _>(index).map(Value::from),
        "REAL" => row.try_get::<f64, _>(index).map(Value::from),
        _ => row.try_get::<String, _>(index).map(Value::from),
    }
    .unwrap_or(Value::Null)
}

fn row_to_map(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), column_value(row, col.ordinal())))
        .collect()
}

fn is_missing_table(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().contains("no such table"),
        _ => false,
    }
}

async fn recover_fetch_error(pool: &SqlitePool, query: &str, err: &sqlx::Error) {
    log::warn!("query failed: {} ({})", err, query);
    if is_missing_table(err) {
        if let Err(e) = init_schema(pool).await {
            log::warn!("schema initialization failed: {}", e);
        }
    }
}

/// Runs a read query. Failures are logged and come back as an empty result;
/// a missing table also triggers schema creation.
pub async fn fetch_all(pool: &SqlitePool, query: &str, params: &[Param]) -> Vec<Row> {
    match bind_params(sqlx::query(query), params).fetch_all(pool).await {
        Ok(rows) => rows.iter().map(row_to_map).collect(),
        Err(e) => {
            recover_fetch_error(pool, query, &e).await;
            Vec::new()
        }
    }
}

/// Single-row form of [`fetch_all`].
pub async fn fetch_one(pool: &SqlitePool, query: &str, params: &[Param]) -> Option<Row> {
    match bind_params(sqlx::query(query), params)
        .fetch_optional(pool)
        .await
    {
        Ok(row) => row.as_ref().map(row_to_map),
        Err(e) => {
            recover_fetch_error(pool, query, &e).await;
            None
        }
    }
}

/// Typed form of [`fetch_all`] with the same failure handling.
pub async fn fetch_as<T>(pool: &SqlitePool, query: &str, params: &[Param]) -> Vec<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    match bind_params_as(sqlx::query_as::<_, T>(query), params)
        .fetch_all(pool)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            recover_fetch_error(pool, query, &e).await;
            Vec::new()
        }
    }
}

/// Runs a write query in its own transaction and returns the affected row
/// count. Errors are handed back to the caller, never logged here.
pub async fn db_commit(pool: &SqlitePool, query: &str, params: &[Param]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let result = bind_params(sqlx::query(query), params)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePool;
    use tempfile::TempDir;

    /// A fresh database file with the schema applied. Keep the `TempDir`
    /// alive for as long as the pool is used.
    pub async fn temp_pool() -> (SqlitePool, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_logs.db");
        let pool = crate::init_pool(path.to_str().unwrap()).await.unwrap();
        (pool, dir)
    }

    pub async fn insert_row(
        pool: &SqlitePool,
        request_data: &str,
        status: &str,
        response_count: i64,
        date_only: &str,
    ) {
        sqlx::query(
            "INSERT INTO logs (endpoint, request_data, response_status, response_time, response_count, date_only) \
             VALUES ('/api/test', ?, ?, 0.1, ?, ?)",
        )
        .bind(request_data)
        .bind(status)
        .bind(response_count)
        .bind(date_only)
        .execute(pool)
        .await
        .unwrap();
    }
}
