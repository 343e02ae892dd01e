use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use common::models::{LIST_ENDPOINT, NO_RESULT, TITLE_ENDPOINT};
use db::DbRegistry;
use resolver::LabelResolver;
use serde_json::{json, Value};

use super::json_response;
use crate::error::AppError;
use crate::reports;

const UA_MISSING_STATUS: &str = "User-Agent missing";
const UA_REQUIRED: &str = "User-Agent header is required";
const RESOLVER_UNAVAILABLE: &str = "حدث خطأ أثناء تحميل المكتبة";
const INVALID_PAYLOAD: &str = "بيانات غير صالحة";
const ERROR_STATUS: &str = "error";

fn has_user_agent(req: &HttpRequest) -> bool {
    req.headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty())
}

fn ua_rejection() -> HttpResponse {
    json_response(StatusCode::BAD_REQUEST, &json!({ "error": UA_REQUIRED }))
}

fn error_json(status: StatusCode, message: &str) -> HttpResponse {
    json_response(status, &json!({ "error": message }))
}

/// Records the outcome and hands back the commit result as JSON: `true` on
/// success, otherwise the error text.
async fn record(
    registry: &DbRegistry,
    endpoint: &str,
    request_data: &str,
    status: &str,
    started: Instant,
) -> Value {
    let pool = match registry.default_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            log::warn!("cannot open log database: {:#}", e);
            return Value::String(e.to_string());
        }
    };
    match db::log_request(&pool, endpoint, request_data, status, started.elapsed().as_secs_f64()).await {
        Ok(_) => Value::Bool(true),
        Err(e) => {
            log::warn!("logging {} {:?} failed: {}", endpoint, request_data, e);
            Value::String(e.to_string())
        }
    }
}

pub async fn resolve_title(
    req: HttpRequest,
    path: web::Path<String>,
    registry: web::Data<DbRegistry>,
    resolver: Option<web::Data<dyn LabelResolver>>,
) -> HttpResponse {
    let started = Instant::now();
    let title = path.into_inner();

    if !has_user_agent(&req) {
        record(&registry, TITLE_ENDPOINT, &title, UA_MISSING_STATUS, started).await;
        return ua_rejection();
    }

    let Some(resolver) = resolver else {
        record(&registry, TITLE_ENDPOINT, &title, ERROR_STATUS, started).await;
        return error_json(StatusCode::INTERNAL_SERVER_ERROR, RESOLVER_UNAVAILABLE);
    };

    let label = match resolver.resolve(&title).await {
        Ok(label) => label,
        Err(e) => {
            log::warn!("resolving {:?} failed: {:#}", title, e);
            record(&registry, TITLE_ENDPOINT, &title, ERROR_STATUS, started).await;
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, RESOLVER_UNAVAILABLE);
        }
    };

    let status = label.as_deref().unwrap_or(NO_RESULT);
    let sql = record(&registry, TITLE_ENDPOINT, &title, status, started).await;
    json_response(StatusCode::OK, &json!({ "result": label, "sql": sql }))
}

/// `titles` from a batch body. `None` when the body is not JSON or the field
/// is not a list; a missing field is an empty list.
fn batch_titles(body: &[u8]) -> Option<Vec<String>> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    match payload.as_object()?.get("titles") {
        None => Some(Vec::new()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Some(_) => None,
    }
}

/// Drops repeated titles, keeping the first occurrence of each.
fn dedup_titles(titles: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn titles_json(titles: &[String]) -> String {
    serde_json::to_string(titles).unwrap_or_default()
}

pub async fn resolve_list(
    req: HttpRequest,
    body: web::Bytes,
    registry: web::Data<DbRegistry>,
    resolver: Option<web::Data<dyn LabelResolver>>,
) -> HttpResponse {
    let started = Instant::now();
    let titles = batch_titles(&body);

    if !has_user_agent(&req) {
        let data = titles.as_deref().map(titles_json).unwrap_or_default();
        record(&registry, LIST_ENDPOINT, &data, UA_MISSING_STATUS, started).await;
        return ua_rejection();
    }

    let Some(titles) = titles else {
        let raw = String::from_utf8_lossy(&body);
        record(&registry, LIST_ENDPOINT, &raw, ERROR_STATUS, started).await;
        return error_json(StatusCode::BAD_REQUEST, INVALID_PAYLOAD);
    };

    let requested = titles.len();
    let titles = dedup_titles(titles);
    let duplicates = requested - titles.len();
    let request_data = titles_json(&titles);

    let Some(resolver) = resolver else {
        record(&registry, LIST_ENDPOINT, &request_data, ERROR_STATUS, started).await;
        return error_json(StatusCode::INTERNAL_SERVER_ERROR, RESOLVER_UNAVAILABLE);
    };

    let resolution = match resolver.batch_resolve(&titles).await {
        Ok(r) => r,
        Err(e) => {
            log::warn!("batch resolve of {} titles failed: {:#}", titles.len(), e);
            record(&registry, LIST_ENDPOINT, &request_data, ERROR_STATUS, started).await;
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, RESOLVER_UNAVAILABLE);
        }
    };

    let with_labs = resolution.labels.len();
    let no_labs = resolution.no_labels.len();
    let mut results: BTreeMap<String, String> = resolution.labels;
    for title in resolution.no_labels {
        results.entry(title).or_default();
    }

    let elapsed = started.elapsed().as_secs_f64();
    let status = if with_labs > 0 { "success" } else { NO_RESULT };
    record(&registry, LIST_ENDPOINT, &request_data, status, started).await;

    json_response(
        StatusCode::OK,
        &json!({
            "results": results,
            "no_labs": no_labs,
            "with_labs": with_labs,
            "duplicates": duplicates,
            "time": elapsed,
        }),
    )
}

pub async fn logs_by_day_api(
    req: HttpRequest,
    registry: web::Data<DbRegistry>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    if !has_user_agent(&req) {
        return Ok(ua_rejection());
    }
    let report = reports::retrieve_logs_by_date(&registry, &query).await?;
    Ok(json_response(StatusCode::OK, &report.logs))
}

/// Which parts of the title to label dump an endpoint returns.
#[derive(Clone, Copy)]
enum DumpPart {
    All,
    Labels,
    Unresolved,
}

async fn en_to_ar(
    req: &HttpRequest,
    registry: &DbRegistry,
    day: Option<String>,
    part: DumpPart,
) -> Result<HttpResponse, AppError> {
    if !has_user_agent(req) {
        return Ok(ua_rejection());
    }
    let report = reports::retrieve_logs_en_to_ar(registry, day.as_deref()).await?;
    let mut value = serde_json::to_value(&report)?;
    if let Some(map) = value.as_object_mut() {
        match part {
            DumpPart::All => {}
            DumpPart::Labels => {
                map.remove("no_result");
            }
            DumpPart::Unresolved => {
                map.remove("data_result");
            }
        }
    }
    Ok(json_response(StatusCode::OK, &value))
}

fn day_param(path: Option<web::Path<String>>) -> Option<String> {
    path.map(|p| p.into_inner())
}

pub async fn all_api(
    req: HttpRequest,
    registry: web::Data<DbRegistry>,
    day: Option<web::Path<String>>,
) -> Result<HttpResponse, AppError> {
    en_to_ar(&req, &registry, day_param(day), DumpPart::All).await
}

pub async fn category_api(
    req: HttpRequest,
    registry: web::Data<DbRegistry>,
    day: Option<web::Path<String>>,
) -> Result<HttpResponse, AppError> {
    en_to_ar(&req, &registry, day_param(day), DumpPart::Labels).await
}

pub async fn no_result_api(
    req: HttpRequest,
    registry: web::Data<DbRegistry>,
    day: Option<web::Path<String>>,
) -> Result<HttpResponse, AppError> {
    en_to_ar(&req, &registry, day_param(day), DumpPart::Unresolved).await
}

pub async fn status_api(
    req: HttpRequest,
    registry: web::Data<DbRegistry>,
) -> Result<HttpResponse, AppError> {
    if !has_user_agent(&req) {
        return Ok(ua_rejection());
    }
    let pool = registry.default_pool().await?;
    let statuses = db::get_response_status(&pool).await;
    Ok(json_response(StatusCode::OK, &statuses))
}

pub async fn logs_api(
    req: HttpRequest,
    registry: web::Data<DbRegistry>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    if !has_user_agent(&req) {
        return Ok(ua_rejection());
    }
    let view = reports::view_logs(&registry, &query).await?;
    Ok(json_response(StatusCode::OK, &view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_titles_shapes() {
        assert_eq!(
            batch_titles(br#"{"titles": ["a", "b"]}"#),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(batch_titles(br#"{}"#), Some(vec![]));
        assert_eq!(batch_titles(br#"{"titles": "not a list"}"#), None);
        assert_eq!(batch_titles(br#"{"titles": {"a": 1}}"#), None);
        assert_eq!(batch_titles(b"not json"), None);
        assert_eq!(batch_titles(br#"["a"]"#), None);
        assert_eq!(batch_titles(br#"{"titles": [1, "x"]}"#), Some(vec!["1".to_string(), "x".to_string()]));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let titles = ["b", "a", "b", "c", "a"].map(String::from).to_vec();
        assert_eq!(dedup_titles(titles), ["b", "a", "c"].map(String::from).to_vec());
    }

    #[test]
    fn titles_json_is_array_text() {
        assert_eq!(titles_json(&["A".to_string(), "B".to_string()]), r#"["A","B"]"#);
    }
}
