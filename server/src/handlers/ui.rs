use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use db::DbRegistry;

use super::html_response;
use crate::error::AppError;
use crate::reports;

pub async fn index_page() -> HttpResponse {
    html_response(pages::index::render_index_view())
}

pub async fn list_page() -> HttpResponse {
    html_response(pages::index::render_list_view())
}

pub async fn logs_page(
    registry: web::Data<DbRegistry>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let view = reports::view_logs(&registry, &query).await?;
    Ok(html_response(pages::logs::render_logs_view(&view)))
}

pub async fn no_result_page(
    registry: web::Data<DbRegistry>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let day = query
        .get("day")
        .map(|d| d.trim())
        .filter(|d| !d.is_empty());
    let report = reports::retrieve_logs_en_to_ar(&registry, day).await?;
    Ok(html_response(pages::no_result::render_no_result_view(
        &report,
        day.unwrap_or_default(),
    )))
}

pub async fn logs_by_day_page(
    registry: web::Data<DbRegistry>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let report = reports::retrieve_logs_by_date(&registry, &query).await?;
    Ok(html_response(pages::logs_by_day::render_logs_by_day_view(&report)))
}

pub async fn chart_page(
    registry: web::Data<DbRegistry>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let report = reports::retrieve_logs_by_date(&registry, &query).await?;
    Ok(html_response(pages::charts::render_daily_chart(&report)))
}

pub async fn status_chart_page(
    registry: web::Data<DbRegistry>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let report = reports::retrieve_logs_by_date(&registry, &query).await?;
    Ok(html_response(pages::charts::render_status_chart(&report)))
}
