use common::models::LogTable;
use common::reports::LogsByDate;
use leptos::{either::Either, prelude::*};
use templates::{select_field, url_with_params, Breadcrumb, InfoRow, NavLink, Page};

use crate::HOME;

/// Form selecting which database and table the daily views read.
pub(crate) fn source_form(action: &str, dbs: &[String], db_path: &str, table: LogTable) -> AnyView {
    let dbs = dbs.iter().map(|d| (d.clone(), d.clone())).collect();
    let tables = LogTable::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), t.as_str().to_string()))
        .collect();
    let action = action.to_string();
    view! {
        <form class="filters" method="GET" action={action}>
            <label>"Database " {select_field("db_path", dbs, db_path)}</label>
            <label>"Table " {select_field("table_name", tables, table.as_str())}</label>
            <button type="submit">"Show"</button>
        </form>
    }
    .into_any()
}

/// One row per day with per-bucket title and request counts.
pub fn render_logs_by_day_view(report: &LogsByDate) -> String {
    let tab = &report.tab;
    let form = source_form("/logs_by_day", &report.dbs, &tab.db_path, tab.table_name);
    let buckets = report.status_table.clone();
    let header_buckets = buckets.clone();
    let days = report.logs.clone();

    let content = view! {
        {form}
        {if days.is_empty() {
            Either::Left(view! { <p>"No log entries."</p> })
        } else {
            Either::Right(view! {
                <table>
                    <tr>
                        <th>"Day"</th>
                        <th>"Titles"</th>
                        <th>"Requests"</th>
                        {header_buckets.into_iter().map(|b| view! { <th dir="auto">{b}</th> }).collect::<Vec<_>>()}
                    </tr>
                    {days.into_iter().map(|day| {
                        let cells = buckets.iter().map(|b| {
                            let text = day
                                .by_status
                                .get(b)
                                .map(|c| format!("{} / {}", c.title_count, c.count))
                                .unwrap_or_else(|| "-".to_string());
                            view! { <td>{text}</td> }
                        }).collect::<Vec<_>>();
                        view! {
                            <tr>
                                <td>{day.day}</td>
                                <td>{day.title_count}</td>
                                <td>{day.total}</td>
                                {cells}
                            </tr>
                        }
                    }).collect::<Vec<_>>()}
                </table>
                <p>"Bucket cells show titles / requests."</p>
            })
        }}
    };

    let json_href = url_with_params(
        "/api/logs_by_day",
        &[
            ("db_path".to_string(), tab.db_path.clone()),
            ("table_name".to_string(), tab.table_name.as_str().to_string()),
        ],
    );

    Page {
        title: format!("Category labels - Logs by day ({})", tab.table_name),
        breadcrumbs: vec![Breadcrumb::link(HOME, "/"), Breadcrumb::current("Logs by day")],
        nav_links: vec![NavLink::new("JSON", json_href)],
        info_rows: vec![
            InfoRow::new("Days", tab.days),
            InfoRow::new("Titles", tab.sum_titles),
            InfoRow::new("Requests", tab.sum_total),
        ],
        content,
    }
    .render()
}
