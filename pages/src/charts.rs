use std::collections::BTreeMap;

use common::reports::LogsByDate;
use leptos::prelude::*;
use templates::{bar_chart, Bar, Breadcrumb, Page};

use crate::logs_by_day::source_form;
use crate::HOME;

/// Requests per day as a bar chart, with titles per day below it.
pub fn render_daily_chart(report: &LogsByDate) -> String {
    let tab = &report.tab;
    let form = source_form("/chart", &report.dbs, &tab.db_path, tab.table_name);
    let requests = report
        .logs
        .iter()
        .map(|d| Bar::new(&d.day, d.total))
        .collect();
    let titles = report
        .logs
        .iter()
        .map(|d| Bar::new(&d.day, d.title_count))
        .collect();

    let content = view! {
        {form}
        <h2>"Requests per day"</h2>
        {bar_chart(requests)}
        <h2>"Titles per day"</h2>
        {bar_chart(titles)}
    };

    Page {
        title: format!("Category labels - Daily chart ({})", tab.table_name),
        breadcrumbs: vec![Breadcrumb::link(HOME, "/"), Breadcrumb::current("Daily chart")],
        nav_links: vec![],
        info_rows: vec![],
        content,
    }
    .render()
}

/// Requests per status bucket over every day, largest first.
pub fn status_totals(report: &LogsByDate) -> Vec<(String, i64)> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for group in &report.logs_data {
        *totals.entry(group.status_group.as_str()).or_default() += group.count;
    }
    let mut totals: Vec<(String, i64)> = totals
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

pub fn render_status_chart(report: &LogsByDate) -> String {
    let tab = &report.tab;
    let form = source_form("/chart2", &report.dbs, &tab.db_path, tab.table_name);
    let bars = status_totals(report)
        .into_iter()
        .map(|(status, total)| Bar::new(status, total))
        .collect();

    let content = view! {
        {form}
        <h2>"Requests per status"</h2>
        {bar_chart(bars)}
    };

    Page {
        title: format!("Category labels - Status chart ({})", tab.table_name),
        breadcrumbs: vec![Breadcrumb::link(HOME, "/"), Breadcrumb::current("Status chart")],
        nav_links: vec![],
        info_rows: vec![],
        content,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{DayGroup, LogTable};
    use common::reports::{DaySummary, DayTab};

    fn group(day: &str, status: &str, title_count: i64, count: i64) -> DayGroup {
        DayGroup {
            date_only: day.to_string(),
            status_group: status.to_string(),
            title_count,
            count,
        }
    }

    fn report() -> LogsByDate {
        LogsByDate {
            logs: vec![
                DaySummary {
                    day: "2025-01-26".to_string(),
                    title_count: 2,
                    total: 2,
                    by_status: BTreeMap::new(),
                },
                DaySummary {
                    day: "2025-01-27".to_string(),
                    title_count: 8,
                    total: 13,
                    by_status: BTreeMap::new(),
                },
            ],
            tab: DayTab {
                table_name: LogTable::Logs,
                db_path: "new_logs.db".to_string(),
                days: 2,
                sum_titles: 10,
                sum_total: 15,
            },
            status_table: vec!["Category".to_string(), "no_result".to_string()],
            logs_data: vec![
                group("2025-01-26", "no_result", 2, 2),
                group("2025-01-27", "Category", 3, 3),
                group("2025-01-27", "no_result", 5, 10),
            ],
            dbs: vec!["new_logs.db".to_string()],
        }
    }

    #[test]
    fn status_totals_sum_across_days() {
        assert_eq!(
            status_totals(&report()),
            vec![("no_result".to_string(), 12), ("Category".to_string(), 3)]
        );
    }

    #[test]
    fn daily_chart_has_a_bar_per_day() {
        let html = render_daily_chart(&report());
        assert!(html.contains("Requests per day"));
        assert!(html.contains("2025-01-26"));
        assert!(html.contains("width: 100%"));
        assert!(html.contains(r#"action="/chart""#));
    }

    #[test]
    fn status_chart_lists_buckets() {
        let html = render_status_chart(&report());
        assert!(html.contains("Requests per status"));
        assert!(html.contains("no_result"));
        assert!(html.contains("Category"));
        assert!(html.contains("width: 25%"));
    }
}
