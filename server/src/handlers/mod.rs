mod api;
mod ui;

pub use api::*;
pub use ui::*;

use actix_web::{http::StatusCode, HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Pretty JSON with four-space indentation; non-ASCII text is written as is.
pub(crate) fn json_response(status: StatusCode, data: &impl Serialize) -> HttpResponse {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    match data.serialize(&mut ser) {
        Ok(()) => HttpResponseBuilder::new(status)
            .content_type("application/json; charset=utf-8")
            .body(buf),
        Err(e) => {
            log::error!("serializing response: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub(crate) fn html_response(html: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    let html = pages::error::render_error_page("invalid_url", req.path());
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_web::web;
    use db::DbRegistry;
    use resolver::{LabelResolver, TableResolver};
    use tempfile::TempDir;

    pub fn registry() -> (web::Data<DbRegistry>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let registry = web::Data::new(DbRegistry::new(dir.path(), "new_logs.db"));
        (registry, dir)
    }

    pub fn resolver() -> web::Data<dyn LabelResolver> {
        let table: Arc<dyn LabelResolver> = Arc::new(TableResolver::from_pairs([
            ("Category:Science", "تصنيف:علوم"),
            ("Category:Art", "تصنيف:فنون"),
        ]));
        web::Data::from(table)
    }
}
