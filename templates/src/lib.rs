use leptos::{either::Either, prelude::*};

const COLLAPSE_THRESHOLD: usize = 120;

/// Pages linked from the top bar of every view.
pub const SITE_NAV: &[(&str, &str)] = &[
    ("Lookup", "/"),
    ("Batch", "/list"),
    ("Logs", "/logs"),
    ("By day", "/logs_by_day"),
    ("No result", "/no_result"),
    ("Daily chart", "/chart"),
    ("Status chart", "/chart2"),
];

pub fn collapsible_block(content: &str, css_class: &str) -> AnyView {
    if content.chars().count() <= COLLAPSE_THRESHOLD {
        let tag_content = content.to_string();
        let class = css_class.to_string();
        return view! { <span class={class}>{tag_content}</span> }.into_any();
    }
    let preview: String = content.chars().take(COLLAPSE_THRESHOLD).collect();
    let preview_display = format!("{}...", preview);
    let preview_class = format!("preview-text {}", css_class);
    let full_class = format!("collapsible-full {}", css_class);
    let content = content.to_string();
    view! {
        <details class="collapsible">
            <summary>
                <span class={preview_class}>{preview_display}</span>
                " "
                <span class="show-more">"show more"</span>
                <span class="show-less">"show less"</span>
            </summary>
            <div class={full_class}>{content}</div>
        </details>
    }
    .into_any()
}

fn site_nav() -> String {
    view! {
        <nav class="site-nav">
            {SITE_NAV.iter().map(|(label, href)| {
                view! { <a href={*href}>{*label}</a> }
            }).collect::<Vec<_>>()}
        </nav>
    }
    .to_html()
}

pub fn page_layout(title: &str, body_html: String) -> String {
    let title = title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; padding: 16px; }}
nav.site-nav {{ margin-bottom: 16px; }}
nav.site-nav a {{ margin-right: 12px; }}
table {{ width: 100%; border-collapse: collapse; }}
th {{ text-align: left; padding: 6px 8px; border-bottom: 1px solid #ccc; }}
td {{ padding: 6px 8px; border-bottom: 1px solid #eee; vertical-align: top; }}
td[dir=auto] {{ unicode-bidi: plaintext; }}
tr:last-child td {{ border-bottom: none; }}
pre {{ white-space: pre-wrap; }}
form.filters label {{ margin-right: 8px; }}
details.collapsible {{ display: flex; flex-direction: column; }}
details.collapsible > summary {{ cursor: pointer; list-style: none; order: 1; }}
details.collapsible > summary::-webkit-details-marker {{ display: none; }}
details.collapsible > summary .show-less {{ display: none; }}
details.collapsible > .collapsible-full {{ white-space: pre-wrap; word-break: break-word; order: 0; }}
details.collapsible[open] > summary .preview-text {{ display: none; }}
details.collapsible[open] > summary .show-more {{ display: none; }}
details.collapsible[open] > summary .show-less {{ display: inline; }}
.bar-row {{ display: flex; align-items: center; margin: 2px 0; }}
.bar-label {{ width: 160px; flex-shrink: 0; }}
.bar {{ background: #4a7bd0; height: 16px; }}
.bar-value {{ margin-left: 6px; }}
.pagination a, .pagination span {{ margin-right: 6px; }}
.error {{ color: #b00; }}
</style>
</head>
<body>
{nav}
{body_html}
</body>
</html>"#,
        title = title,
        nav = site_nav(),
        body_html = body_html
    )
}

pub struct Breadcrumb {
    pub label: String,
    pub href: Option<String>,
}

impl Breadcrumb {
    pub fn link(label: impl ToString, href: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            href: Some(href.to_string()),
        }
    }

    pub fn current(label: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            href: None,
        }
    }
}

pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: impl ToString, href: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

pub struct InfoRow {
    pub label: String,
    pub value: AnyView,
}

impl InfoRow {
    pub fn new(label: &str, value: impl ToString) -> Self {
        let v = value.to_string();
        Self {
            label: label.to_string(),
            value: v.into_any(),
        }
    }

    pub fn view(label: &str, value: impl IntoView + 'static) -> Self {
        Self {
            label: label.to_string(),
            value: value.into_any(),
        }
    }
}

/// `base?k=v&...` with every value form-encoded. Empty values are dropped.
pub fn url_with_params(base: &str, params: &[(String, String)]) -> String {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in params.iter().filter(|(_, v)| !v.is_empty()) {
        ser.append_pair(k, v);
    }
    let query = ser.finish();
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, query)
    }
}

pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub base_url: String,
    /// Query parameters carried to every page link, except `page`.
    pub params: Vec<(String, String)>,
}

/// Page links shown on each side of the current page.
const PAGE_WINDOW: i64 = 2;

impl Pagination {
    pub fn new(
        current_page: i64,
        total_pages: i64,
        base_url: impl ToString,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            current_page,
            total_pages: total_pages.max(1),
            base_url: base_url.to_string(),
            params,
        }
    }

    pub fn href(&self, page: i64) -> String {
        let mut params = vec![("page".to_string(), page.to_string())];
        params.extend(
            self.params
                .iter()
                .filter(|(k, _)| k != "page")
                .cloned(),
        );
        url_with_params(&self.base_url, &params)
    }

    /// First and last page numbers of the link window around the current page.
    pub fn window(&self) -> (i64, i64) {
        let start = (self.current_page - PAGE_WINDOW).max(1);
        let end = self.current_page.saturating_add(PAGE_WINDOW).min(self.total_pages);
        (start, end.max(start))
    }
}

pub fn pagination_nav(p: &Pagination) -> AnyView {
    if p.total_pages <= 1 {
        return ().into_any();
    }

    let info = format!("Page {} of {}", p.current_page, p.total_pages);
    let edge = |label: &'static str, page: i64, active: bool| {
        if active {
            Either::Left(view! { <a href={p.href(page)}>{label}</a> })
        } else {
            Either::Right(())
        }
    };
    let first = edge("First", 1, p.current_page > 1);
    let prev = edge("Previous", p.current_page - 1, p.current_page > 1);
    let next = edge("Next", p.current_page.saturating_add(1), p.current_page < p.total_pages);
    let last = edge("Last", p.total_pages, p.current_page < p.total_pages);

    let (start, end) = p.window();
    let numbers = (start..=end)
        .map(|n| {
            if n == p.current_page {
                Either::Left(view! { <span class="current">{n}</span> })
            } else {
                Either::Right(view! { <a href={p.href(n)}>{n}</a> })
            }
        })
        .collect::<Vec<_>>();

    view! {
        <p class="pagination">{info}" "{first}{prev}{numbers}{next}{last}</p>
    }
    .into_any()
}

/// A `<select>` whose option matching `selected` is preselected.
pub fn select_field(name: &str, options: Vec<(String, String)>, selected: &str) -> AnyView {
    let name = name.to_string();
    let selected = selected.to_string();
    view! {
        <select name={name}>
            {options.into_iter().map(|(value, label)| {
                let is_selected = value == selected;
                view! { <option value={value} selected={is_selected}>{label}</option> }
            }).collect::<Vec<_>>()}
        </select>
    }
    .into_any()
}

pub struct Bar {
    pub label: String,
    pub value: i64,
}

impl Bar {
    pub fn new(label: impl ToString, value: i64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Horizontal bars scaled against the largest value.
pub fn bar_chart(bars: Vec<Bar>) -> AnyView {
    if bars.is_empty() {
        return view! { <p>"No data."</p> }.into_any();
    }
    let max = bars.iter().map(|b| b.value).max().unwrap_or(0).max(1);
    view! {
        <div class="bar-chart">
            {bars.into_iter().map(|bar| {
                let width = format!("width: {}%", bar.value.max(0) * 100 / max);
                view! {
                    <div class="bar-row">
                        <span class="bar-label" dir="auto">{bar.label}</span>
                        <span class="bar" style={width}></span>
                        <span class="bar-value">{bar.value}</span>
                    </div>
                }
            }).collect::<Vec<_>>()}
        </div>
    }
    .into_any()
}

pub struct Page<C: IntoView = ()> {
    pub title: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub nav_links: Vec<NavLink>,
    pub info_rows: Vec<InfoRow>,
    pub content: C,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            title: String::new(),
            breadcrumbs: Vec::new(),
            nav_links: Vec::new(),
            info_rows: Vec::new(),
            content: (),
        }
    }
}

impl<C: IntoView> Page<C> {
    pub fn render(self) -> String {
        let Page {
            title,
            breadcrumbs,
            nav_links,
            info_rows,
            content,
        } = self;

        let body = view! {
            {if !breadcrumbs.is_empty() {
                Either::Left(view! {
                    <h1>
                        {breadcrumbs.into_iter().enumerate().map(|(i, crumb)| {
                            let sep = if i > 0 { " / " } else { "" };
                            match crumb.href {
                                Some(href) => Either::Left(view! {
                                    {sep}<a href={href}>{crumb.label}</a>
                                }),
                                None => Either::Right(view! {
                                    {sep}{crumb.label}
                                }),
                            }
                        }).collect::<Vec<_>>()}
                    </h1>
                })
            } else {
                Either::Right(())
            }}

            {if !nav_links.is_empty() {
                Either::Left(view! {
                    <p>
                        {nav_links.into_iter().map(|link| {
                            view! { <a href={link.href}>{link.label}</a>" " }
                        }).collect::<Vec<_>>()}
                    </p>
                })
            } else {
                Either::Right(())
            }}

            {if !info_rows.is_empty() {
                Either::Left(view! {
                    <table class="info">
                        {info_rows.into_iter().map(|row| {
                            view! { <tr><td>{row.label}</td><td>{row.value}</td></tr> }
                        }).collect::<Vec<_>>()}
                    </table>
                })
            } else {
                Either::Right(())
            }}

            {content}
        };

        page_layout(&title, body.to_html())
    }
}
