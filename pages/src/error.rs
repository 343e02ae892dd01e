use leptos::prelude::*;
use templates::{Breadcrumb, Page};

use crate::HOME;

/// Heading for an error kind; unknown kinds fall back to the generic one.
fn heading(kind: &str) -> &'static str {
    match kind {
        "invalid_url" => "Page not found",
        _ => "Unexpected error",
    }
}

/// Error page for `kind` (`invalid_url` or `unexpected_error`) with an
/// optional detail message.
pub fn render_error_page(kind: &str, detail: &str) -> String {
    let heading = heading(kind);
    let detail = detail.to_string();
    let kind = kind.to_string();

    let content = view! {
        <h2 class="error">{heading}</h2>
        <p><code>{kind}</code></p>
        {(!detail.is_empty()).then(|| view! { <pre>{detail}</pre> })}
        <p><a href="/">"Back to lookup"</a></p>
    };

    Page {
        title: format!("Category labels - {}", heading),
        breadcrumbs: vec![Breadcrumb::link(HOME, "/"), Breadcrumb::current("Error")],
        nav_links: vec![],
        info_rows: vec![],
        content,
    }
    .render()
}
