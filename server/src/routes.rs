use actix_web::web;

use crate::handlers;

/// Registers every route. Fixed `/api/...` paths come before
/// `/api/{title}` so they are not taken for titles. `/api/list` is a plain
/// resource so other methods get 405 instead of falling through.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index_page))
        .route("/list", web::get().to(handlers::list_page))
        .route("/logs", web::get().to(handlers::logs_page))
        .route("/no_result", web::get().to(handlers::no_result_page))
        .route("/logs_by_day", web::get().to(handlers::logs_by_day_page))
        .route("/chart", web::get().to(handlers::chart_page))
        .route("/chart2", web::get().to(handlers::status_chart_page))
        .route("/api/logs_by_day", web::get().to(handlers::logs_by_day_api))
        .route("/api/all", web::get().to(handlers::all_api))
        .route("/api/all/{day}", web::get().to(handlers::all_api))
        .route("/api/category", web::get().to(handlers::category_api))
        .route("/api/category/{day}", web::get().to(handlers::category_api))
        .route("/api/no_result", web::get().to(handlers::no_result_api))
        .route("/api/no_result/{day}", web::get().to(handlers::no_result_api))
        .route("/api/status", web::get().to(handlers::status_api))
        .route("/api/logs", web::get().to(handlers::logs_api))
        .service(web::resource("/api/list").route(web::post().to(handlers::resolve_list)))
        .route("/api/{title}", web::get().to(handlers::resolve_title));
}
