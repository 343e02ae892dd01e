use common::reports::EnToAr;
use leptos::{either::Either, prelude::*};
use templates::{Breadcrumb, InfoRow, NavLink, Page};

use crate::HOME;

/// Titles that were looked up without getting a label, optionally limited
/// to a day (`YYYY-MM-DD`) or month (`YYYY-MM`).
pub fn render_no_result_view(report: &EnToAr, day: &str) -> String {
    let titles = report.no_result.clone();
    let day_value = day.to_string();

    let content = view! {
        <form class="filters" method="GET" action="/no_result">
            <label>"Day " <input type="text" name="day" value={day_value} placeholder="YYYY-MM[-DD]" size="10"/></label>
            <button type="submit">"Show"</button>
        </form>
        {if titles.is_empty() {
            Either::Left(view! { <p>"Every title has a label."</p> })
        } else {
            Either::Right(view! {
                <ol>
                    {titles.into_iter().map(|t| view! { <li>{t}</li> }).collect::<Vec<_>>()}
                </ol>
            })
        }}
    };

    let json_href = if day.is_empty() {
        "/api/no_result".to_string()
    } else {
        format!("/api/no_result/{}", day)
    };

    Page {
        title: "Category labels - No result".to_string(),
        breadcrumbs: vec![Breadcrumb::link(HOME, "/"), Breadcrumb::current("No result")],
        nav_links: vec![NavLink::new("JSON", json_href)],
        info_rows: vec![
            InfoRow::new("Titles", &report.tab.sum_all),
            InfoRow::new("With label", &report.tab.sum_data_result),
            InfoRow::new("Without label", &report.tab.sum_no_result),
        ],
        content,
    }
    .render()
}
