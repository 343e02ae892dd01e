use common::models::{LogTable, SortOrder, CATEGORY_STATUS};
use common::reports::{LogsTab, LogsView};
use leptos::{either::Either, prelude::*};
use templates::{
    collapsible_block, pagination_nav, select_field, url_with_params, Breadcrumb, InfoRow,
    NavLink, Page, Pagination,
};

use crate::HOME;

fn pairs<I, S>(items: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| (s.as_ref().to_string(), s.as_ref().to_string()))
        .collect()
}

/// Query parameters that reproduce the current listing, without `page`.
pub fn listing_params(tab: &LogsTab) -> Vec<(String, String)> {
    vec![
        ("per_page".to_string(), tab.per_page.to_string()),
        ("order".to_string(), tab.order.as_sql().to_string()),
        ("order_by".to_string(), tab.order_by.as_str().to_string()),
        ("status".to_string(), tab.status.clone()),
        ("like".to_string(), tab.like.clone()),
        ("day".to_string(), tab.day.clone()),
        ("table_name".to_string(), tab.table_name.as_str().to_string()),
        ("db_path".to_string(), tab.db_path.clone()),
    ]
}

fn filter_form(listing: &LogsView) -> AnyView {
    let tab = &listing.tab;

    let mut statuses = vec![(String::new(), "All".to_string())];
    statuses.push((CATEGORY_STATUS.to_string(), CATEGORY_STATUS.to_string()));
    statuses.extend(pairs(&listing.status_table));

    let order_by = tab
        .order_by_types
        .iter()
        .map(|o| (o.as_str().to_string(), o.as_str().to_string()))
        .collect();
    let orders = pairs([SortOrder::Desc.as_sql(), SortOrder::Asc.as_sql()]);
    let tables = pairs(LogTable::ALL.iter().map(|t| t.as_str()));

    view! {
        <form class="filters" method="GET" action="/logs">
            <label>"Database " {select_field("db_path", pairs(&listing.dbs), &tab.db_path)}</label>
            <label>"Table " {select_field("table_name", tables, tab.table_name.as_str())}</label>
            <label>"Status " {select_field("status", statuses, &tab.status)}</label>
            <label>"Like " <input type="text" name="like" value={tab.like.clone()} size="12"/></label>
            <label>"Day " <input type="text" name="day" value={tab.day.clone()} placeholder="YYYY-MM[-DD]" size="10"/></label>
            <label>"Order by " {select_field("order_by", order_by, tab.order_by.as_str())}</label>
            {select_field("order", orders, tab.order.as_sql())}
            <label>" Per page " <input type="number" name="per_page" value={tab.per_page.to_string()} min="1" size="4"/></label>
            <button type="submit">"Apply"</button>
        </form>
    }
    .into_any()
}

/// Paginated log table with its filter form.
pub fn render_logs_view(listing: &LogsView) -> String {
    let tab = &listing.tab;
    let pagination = Pagination::new(tab.page, tab.total_pages, "/logs", listing_params(tab));
    let nav_top = pagination_nav(&pagination);
    let nav_bottom = pagination_nav(&pagination);
    let form = filter_form(listing);
    let show_endpoint = tab.table_name == LogTable::ListLogs;
    let logs = listing.logs.clone();

    let content = view! {
        {form}
        {nav_top}
        {if logs.is_empty() {
            Either::Left(view! { <p>"No log entries."</p> })
        } else {
            Either::Right(view! {
                <table>
                    <tr>
                        <th>"ID"</th>
                        {show_endpoint.then(|| view! { <th>"Endpoint"</th> })}
                        <th>"Request"</th>
                        <th>"Status"</th>
                        <th>"Time (s)"</th>
                        <th>"Count"</th>
                        <th>"Last seen"</th>
                        <th>"Day"</th>
                    </tr>
                    {logs.into_iter().map(|log| {
                        let time = log.response_time.map(|t| format!("{:.3}", t)).unwrap_or_default();
                        view! {
                            <tr>
                                <td>{log.id}</td>
                                {show_endpoint.then(|| view! { <td>{log.endpoint.clone()}</td> })}
                                <td>{collapsible_block(&log.request_data, "request")}</td>
                                <td dir="auto">{log.response_status}</td>
                                <td>{time}</td>
                                <td>{log.response_count}</td>
                                <td>{log.timestamp.unwrap_or_default()}</td>
                                <td>{log.date_only.unwrap_or_default()}</td>
                            </tr>
                        }
                    }).collect::<Vec<_>>()}
                </table>
            })
        }}
        {nav_bottom}
    };

    let json_href = url_with_params("/api/logs", &{
        let mut params = listing_params(tab);
        params.insert(0, ("page".to_string(), tab.page.to_string()));
        params
    });

    Page {
        title: format!("Category labels - Logs ({})", tab.table_name),
        breadcrumbs: vec![Breadcrumb::link(HOME, "/"), Breadcrumb::current("Logs")],
        nav_links: vec![NavLink::new("JSON", json_href)],
        info_rows: vec![
            InfoRow::new("Rows", tab.sum_all),
            InfoRow::new("Requests", tab.sum_response_count),
            InfoRow::new(
                "Showing",
                format!("{}-{} of {}", tab.start_log, tab.end_log, tab.sum_all),
            ),
        ],
        content,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{LogEntry, OrderBy};

    fn tab() -> LogsTab {
        LogsTab {
            sum_all: 25,
            sum_response_count: 40,
            page: 2,
            per_page: 10,
            total_pages: 3,
            start_log: 11,
            end_log: 20,
            order: SortOrder::Desc,
            order_by: OrderBy::ResponseCount,
            status: "no_result".to_string(),
            like: String::new(),
            day: "2025-01".to_string(),
            table_name: LogTable::Logs,
            db_path: "new_logs.db".to_string(),
            order_by_types: OrderBy::ALL.to_vec(),
        }
    }

    fn entry(id: i64, request_data: &str, status: &str) -> LogEntry {
        LogEntry {
            id,
            endpoint: "/api/{title}".to_string(),
            request_data: request_data.to_string(),
            response_status: status.to_string(),
            response_time: Some(0.1234),
            response_count: 3,
            timestamp: Some("2025-01-27 10:00:00".to_string()),
            date_only: Some("2025-01-27".to_string()),
        }
    }

    fn logs_view(logs: Vec<LogEntry>) -> LogsView {
        LogsView {
            logs,
            tab: tab(),
            status_table: vec!["no_result".to_string(), "success".to_string()],
            dbs: vec!["new_logs.db".to_string(), "old.db".to_string()],
        }
    }

    #[test]
    fn renders_rows_and_summary() {
        let html = render_logs_view(&logs_view(vec![
            entry(1, "Category:Science", "تصنيف:علوم"),
            entry(2, "Category:<b>", "no_result"),
        ]));
        assert!(html.contains("Category:Science"));
        assert!(html.contains("تصنيف:علوم"));
        assert!(html.contains("0.123"));
        assert!(html.contains("Category:&lt;b&gt;"));
        assert!(html.contains("11-20 of 25"));
        assert!(!html.contains("<th>Endpoint</th>"));
    }

    #[test]
    fn pagination_keeps_filters() {
        let html = render_logs_view(&logs_view(vec![entry(1, "A", "no_result")]));
        assert!(html.contains("Page 2 of 3"));
        assert!(html.contains("/logs?page=3"));
        for param in ["per_page=10", "order=DESC", "status=no_result", "day=2025-01", "db_path=new_logs.db"] {
            assert!(html.contains(param), "{param}");
        }
    }

    #[test]
    fn empty_listing_message() {
        let html = render_logs_view(&logs_view(vec![]));
        assert!(html.contains("No log entries."));
    }

    #[test]
    fn form_offers_databases_and_statuses() {
        let html = render_logs_view(&logs_view(vec![]));
        assert!(html.contains(r#"<option value="old.db">"#));
        assert!(html.contains(r#"<option value="success">"#));
        assert!(html.contains(r#"<option value="Category">"#));
        assert!(html.contains(r#"name="day""#));
    }

    #[test]
    fn list_logs_shows_endpoint() {
        let mut listing = logs_view(vec![entry(1, r#"["A","B"]"#, "success")]);
        listing.tab.table_name = LogTable::ListLogs;
        let html = render_logs_view(&listing);
        assert!(html.contains("<th>Endpoint</th>"));
    }

    #[test]
    fn listing_params_skip_page() {
        let params = listing_params(&tab());
        assert!(params.iter().all(|(k, _)| k != "page"));
        assert!(params.contains(&("order".to_string(), "DESC".to_string())));
    }
}
