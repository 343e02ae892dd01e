//! Turns request parameters into the report structures shared by the JSON
//! endpoints and the HTML pages.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use common::models::{status_bucket, DayGroup, LogTable, OrderBy, SortOrder, NO_RESULT};
use common::reports::{
    BucketCounts, DaySummary, DayTab, EnToAr, EnToArTab, LogsByDate, LogsTab, LogsView,
};
use db::{DbRegistry, LogQuery, StatusFilter};

/// Status value the listing form uses for "no status filter".
const ALL_STATUSES: &str = "All";

const DEFAULT_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 1000;

type Params = HashMap<String, String>;

fn text<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Like [`text`] but keeps surrounding whitespace, which is significant in
/// LIKE patterns.
fn raw<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// A positive integer parameter; missing, malformed or non-positive values
/// become `default` or 1.
fn positive(params: &Params, key: &str, default: i64) -> i64 {
    text(params, key)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
        .max(1)
}

fn total_pages(rows: i64, per_page: i64) -> i64 {
    (rows.saturating_add(per_page - 1) / per_page).max(1)
}

pub async fn view_logs(registry: &DbRegistry, params: &Params) -> anyhow::Result<LogsView> {
    let page = positive(params, "page", 1);
    let per_page = positive(params, "per_page", DEFAULT_PER_PAGE).min(MAX_PER_PAGE);
    let order = text(params, "order")
        .map(SortOrder::from_param)
        .unwrap_or_default();
    let order_by = text(params, "order_by")
        .map(OrderBy::from_param)
        .unwrap_or_default();
    let table = LogTable::from_param(text(params, "table_name"));
    let status = text(params, "status")
        .filter(|s| *s != ALL_STATUSES)
        .unwrap_or_default()
        .to_string();
    let like = raw(params, "like").unwrap_or_default().to_string();
    let day = text(params, "day").unwrap_or_default().to_string();

    let db::OpenDb { name: db_path, pool, dbs } = registry.open(text(params, "db_path")).await?;

    let filter = StatusFilter {
        status: Some(status.clone()),
        like: Some(like.clone()),
        day: Some(day.clone()),
    };
    let offset = (page - 1).saturating_mul(per_page);
    let query = LogQuery {
        per_page,
        offset,
        order,
        order_by,
        table,
        filter: filter.clone(),
    };

    let mut logs = db::get_logs(&pool, &query).await;
    for log in &mut logs {
        log.request_data = log.request_data.replace('_', " ");
    }
    let sum_all = db::count_filtered(&pool, table, &filter).await;
    let sum_response_count = db::sum_filtered(&pool, table, &filter).await;
    let status_table = db::get_response_status(&pool).await;

    let (start_log, end_log) = if logs.is_empty() {
        (0, 0)
    } else {
        (offset + 1, offset.saturating_add(logs.len() as i64))
    };

    Ok(LogsView {
        tab: LogsTab {
            sum_all,
            sum_response_count,
            page,
            per_page,
            total_pages: total_pages(sum_all, per_page),
            start_log,
            end_log,
            order,
            order_by,
            status,
            like,
            day,
            table_name: table,
            db_path,
            order_by_types: OrderBy::ALL.to_vec(),
        },
        logs,
        status_table,
        dbs,
    })
}

/// Folds `(day, bucket)` groups into one summary per day, days ascending.
pub fn merge_by_day(groups: &[DayGroup]) -> Vec<DaySummary> {
    let mut days: BTreeMap<&str, DaySummary> = BTreeMap::new();
    for group in groups {
        let summary = days
            .entry(group.date_only.as_str())
            .or_insert_with(|| DaySummary {
                day: group.date_only.clone(),
                title_count: 0,
                total: 0,
                by_status: BTreeMap::new(),
            });
        summary.title_count += group.title_count;
        summary.total += group.count;
        let bucket = summary
            .by_status
            .entry(status_bucket(&group.status_group).to_string())
            .or_insert_with(BucketCounts::default);
        bucket.title_count += group.title_count;
        bucket.count += group.count;
    }
    days.into_values().collect()
}

pub async fn retrieve_logs_by_date(
    registry: &DbRegistry,
    params: &Params,
) -> anyhow::Result<LogsByDate> {
    let table = LogTable::from_param(text(params, "table_name"));
    let db::OpenDb { name: db_path, pool, dbs } = registry.open(text(params, "db_path")).await?;

    let logs_data = db::fetch_logs_by_date(&pool, table).await;
    let logs = merge_by_day(&logs_data);
    let status_table: BTreeSet<String> = logs_data
        .iter()
        .map(|g| status_bucket(&g.status_group).to_string())
        .collect();

    Ok(LogsByDate {
        tab: DayTab {
            table_name: table,
            db_path,
            days: logs.len(),
            sum_titles: logs.iter().map(|d| d.title_count).sum(),
            sum_total: logs.iter().map(|d| d.total).sum(),
        },
        logs,
        status_table: status_table.into_iter().collect(),
        logs_data,
        dbs,
    })
}

/// Splits a title to status dump into unresolved titles and labels.
pub fn partition_en2ar(dump: BTreeMap<String, String>) -> EnToAr {
    let (no_result, data_result): (BTreeMap<_, _>, BTreeMap<_, _>) =
        dump.into_iter().partition(|(_, status)| status == NO_RESULT);
    let no_result: Vec<String> = no_result.into_keys().collect();

    EnToAr {
        tab: EnToArTab {
            sum_all: (no_result.len() + data_result.len()).to_string(),
            sum_data_result: data_result.len().to_string(),
            sum_no_result: no_result.len().to_string(),
        },
        no_result,
        data_result,
    }
}

pub async fn retrieve_logs_en_to_ar(
    registry: &DbRegistry,
    day: Option<&str>,
) -> anyhow::Result<EnToAr> {
    let pool = registry.default_pool().await?;
    let dump = db::all_logs_en2ar(&pool, day).await;
    Ok(partition_en2ar(dump))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn seeded_registry() -> (DbRegistry, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let registry = DbRegistry::new(dir.path(), "new_logs.db");
        let pool = registry.default_pool().await.unwrap();
        for i in 0..12 {
            db::log_request(&pool, "/api/{title}", &format!("Category:Test_{i}"), "no_result", 0.01)
                .await
                .unwrap();
        }
        for title in ["Category:Science", "Category:Art", "Category:Music"] {
            db::log_request(&pool, "/api/{title}", title, "تصنيف:علوم", 0.01)
                .await
                .unwrap();
        }
        db::log_request(&pool, "/api/list", r#"["A"]"#, "success", 0.2)
            .await
            .unwrap();
        (registry, dir)
    }

    #[test]
    fn positive_clamps_and_defaults() {
        let p = params(&[("page", "0"), ("per_page", "-5"), ("bad", "x")]);
        assert_eq!(positive(&p, "page", 1), 1);
        assert_eq!(positive(&p, "per_page", 10), 1);
        assert_eq!(positive(&p, "bad", 10), 10);
        assert_eq!(positive(&p, "missing", 10), 10);
    }

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn merge_by_day_sums_buckets() {
        let group = |day: &str, status: &str, t: i64, c: i64| DayGroup {
            date_only: day.to_string(),
            status_group: status.to_string(),
            title_count: t,
            count: c,
        };
        let merged = merge_by_day(&[
            group("2025-01-27", "Category", 3, 3),
            group("2025-01-26", "no_result", 2, 2),
            group("2025-01-27", "no_result", 5, 10),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].day, "2025-01-26");
        assert_eq!(merged[1].title_count, 8);
        assert_eq!(merged[1].total, 13);
        assert_eq!(
            merged[1].by_status["no_result"],
            BucketCounts { title_count: 5, count: 10 }
        );
    }

    #[test]
    fn partition_splits_on_sentinel() {
        let mut dump = BTreeMap::new();
        dump.insert("Category:A".to_string(), "تصنيف:أ".to_string());
        dump.insert("Category:B".to_string(), "no_result".to_string());
        dump.insert("Category:C".to_string(), "error".to_string());

        let out = partition_en2ar(dump);
        assert_eq!(out.no_result, vec!["Category:B".to_string()]);
        assert_eq!(out.data_result.len(), 2);
        assert_eq!(out.tab.sum_all, "3");
        assert_eq!(out.tab.sum_data_result, "2");
        assert_eq!(out.tab.sum_no_result, "1");
    }

    #[actix_web::test]
    async fn view_logs_defaults() {
        let (registry, _dir) = seeded_registry().await;
        let view = view_logs(&registry, &Params::new()).await.unwrap();

        assert_eq!(view.logs.len(), 10);
        assert_eq!(view.tab.sum_all, 15);
        assert_eq!(view.tab.total_pages, 2);
        assert_eq!(view.tab.page, 1);
        assert_eq!(view.tab.start_log, 1);
        assert_eq!(view.tab.end_log, 10);
        assert_eq!(view.tab.order, SortOrder::Desc);
        assert_eq!(view.tab.order_by, OrderBy::ResponseCount);
        assert_eq!(view.tab.table_name, LogTable::Logs);
        assert_eq!(view.tab.db_path, "new_logs.db");
        assert_eq!(view.dbs, vec!["new_logs.db".to_string()]);
        assert!(view.status_table.contains(&"no_result".to_string()));
        assert!(view.logs.iter().all(|l| !l.request_data.contains('_')));
    }

    #[actix_web::test]
    async fn view_logs_filters_and_pages() {
        let (registry, _dir) = seeded_registry().await;
        let p = params(&[("status", "Category"), ("per_page", "2"), ("page", "2")]);
        let view = view_logs(&registry, &p).await.unwrap();

        assert_eq!(view.tab.sum_all, 3);
        assert_eq!(view.tab.total_pages, 2);
        assert_eq!(view.logs.len(), 1);
        assert_eq!((view.tab.start_log, view.tab.end_log), (3, 3));
    }

    #[actix_web::test]
    async fn view_logs_all_status_and_bad_table() {
        let (registry, _dir) = seeded_registry().await;
        let p = params(&[
            ("status", "All"),
            ("table_name", "users; DROP TABLE logs"),
            ("order", "sideways"),
            ("order_by", "nope"),
            ("page", "-3"),
        ]);
        let view = view_logs(&registry, &p).await.unwrap();
        assert_eq!(view.tab.status, "");
        assert_eq!(view.tab.table_name, LogTable::Logs);
        assert_eq!(view.tab.order, SortOrder::Desc);
        assert_eq!(view.tab.order_by, OrderBy::Timestamp);
        assert_eq!(view.tab.page, 1);
        assert_eq!(view.tab.sum_all, 15);
    }

    #[actix_web::test]
    async fn view_logs_list_table_and_unknown_db() {
        let (registry, _dir) = seeded_registry().await;
        let p = params(&[("table_name", "list_logs"), ("db_path", "../../etc/passwd")]);
        let view = view_logs(&registry, &p).await.unwrap();
        assert_eq!(view.tab.db_path, "new_logs.db");
        assert_eq!(view.tab.sum_all, 1);
        assert_eq!(view.logs[0].endpoint, "/api/list");
    }

    #[actix_web::test]
    async fn logs_by_date_today() {
        let (registry, _dir) = seeded_registry().await;
        let report = retrieve_logs_by_date(&registry, &Params::new()).await.unwrap();

        assert_eq!(report.logs.len(), 1);
        assert_eq!(report.logs[0].title_count, 15);
        assert_eq!(report.logs[0].total, 15);
        assert_eq!(
            report.status_table,
            vec!["Category".to_string(), "no_result".to_string()]
        );
        assert_eq!(report.tab.days, 1);
        assert_eq!(report.tab.sum_titles, 15);
        assert_eq!(report.logs_data.len(), 2);
    }

    #[actix_web::test]
    async fn en_to_ar_counts() {
        let (registry, _dir) = seeded_registry().await;
        let out = retrieve_logs_en_to_ar(&registry, None).await.unwrap();
        assert_eq!(out.tab.sum_all, "15");
        assert_eq!(out.tab.sum_no_result, "12");
        assert_eq!(out.tab.sum_data_result, "3");
        assert_eq!(out.data_result["Category:Art"], "تصنيف:علوم");

        let none = retrieve_logs_en_to_ar(&registry, Some("1999-01-01")).await.unwrap();
        assert_eq!(none.tab.sum_all, "0");
    }

    #[actix_web::test]
    async fn view_logs_huge_page_does_not_overflow() {
        let (registry, _dir) = seeded_registry().await;
        let p = params(&[("page", "9223372036854775807"), ("per_page", "9223372036854775807")]);
        let view = view_logs(&registry, &p).await.unwrap();

        assert_eq!(view.tab.per_page, MAX_PER_PAGE);
        assert_eq!(view.tab.page, i64::MAX);
        assert!(view.logs.is_empty());
        assert_eq!((view.tab.start_log, view.tab.end_log), (0, 0));
        assert_eq!(view.tab.total_pages, 1);
    }

    #[test]
    fn total_pages_saturates() {
        assert_eq!(total_pages(i64::MAX, MAX_PER_PAGE), i64::MAX / MAX_PER_PAGE);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[actix_web::test]
    async fn view_logs_keeps_like_whitespace() {
        let (registry, _dir) = seeded_registry().await;
        let p = params(&[("like", " Category:%")]);
        let view = view_logs(&registry, &p).await.unwrap();
        assert_eq!(view.tab.like, " Category:%");
        assert_eq!(view.tab.sum_all, 0);

        let blank = view_logs(&registry, &params(&[("like", "   ")])).await.unwrap();
        assert_eq!(blank.tab.like, "");
        assert_eq!(blank.tab.sum_all, 15);
    }
}
