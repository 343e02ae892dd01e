use leptos::prelude::*;
use templates::{Breadcrumb, Page};

use crate::HOME;

const LOOKUP_SCRIPT: &str = r#"
document.getElementById('lookup').addEventListener('submit', async (ev) => {
  ev.preventDefault();
  const title = document.getElementById('title').value.trim();
  const out = document.getElementById('result');
  if (!title) { out.textContent = ''; return; }
  const resp = await fetch('/api/' + encodeURIComponent(title));
  const data = await resp.json();
  out.textContent = data.error || data.result || 'no result';
});
"#;

const BATCH_SCRIPT: &str = r#"
document.getElementById('batch').addEventListener('submit', async (ev) => {
  ev.preventDefault();
  const titles = document.getElementById('titles').value
    .split('\n').map((t) => t.trim()).filter((t) => t.length > 0);
  const body = document.getElementById('results');
  const summary = document.getElementById('summary');
  body.innerHTML = '';
  const resp = await fetch('/api/list', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({titles: titles}),
  });
  const data = await resp.json();
  if (data.error) { summary.textContent = data.error; return; }
  summary.textContent = `labels: ${data.with_labs}, without: ${data.no_labs}, duplicates: ${data.duplicates}, time: ${data.time}s`;
  for (const [title, label] of Object.entries(data.results)) {
    const row = body.insertRow();
    row.insertCell().textContent = title;
    const cell = row.insertCell();
    cell.dir = 'auto';
    cell.textContent = label;
  }
});
"#;

/// Single-title lookup form backed by `GET /api/{title}`.
pub fn render_index_view() -> String {
    let content = view! {
        <form id="lookup">
            <label for="title">"Category title "</label>
            <input type="text" id="title" name="title" size="60" placeholder="Category:Science"/>
            " "
            <button type="submit">"Resolve"</button>
        </form>
        <p id="result" dir="auto"></p>
        <script inner_html={LOOKUP_SCRIPT}></script>
    };

    Page {
        title: "Category labels".to_string(),
        breadcrumbs: vec![Breadcrumb::current(HOME)],
        nav_links: vec![],
        info_rows: vec![],
        content,
    }
    .render()
}

/// Batch lookup form backed by `POST /api/list`, one title per line.
pub fn render_list_view() -> String {
    let content = view! {
        <form id="batch">
            <textarea id="titles" name="titles" rows="12" cols="80"></textarea>
            <br/>
            <button type="submit">"Resolve all"</button>
        </form>
        <p id="summary"></p>
        <table>
            <thead><tr><th>"Title"</th><th>"Label"</th></tr></thead>
            <tbody id="results"></tbody>
        </table>
        <script inner_html={BATCH_SCRIPT}></script>
    };

    Page {
        title: "Category labels - Batch".to_string(),
        breadcrumbs: vec![Breadcrumb::link(HOME, "/"), Breadcrumb::current("Batch")],
        nav_links: vec![],
        info_rows: vec![],
        content,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_has_lookup_form_and_script() {
        let html = render_index_view();
        assert!(html.contains(r#"<form id="lookup">"#));
        assert!(html.contains(r#"name="title""#));
        assert!(html.contains("encodeURIComponent(title)"));
    }

    #[test]
    fn list_posts_json_titles() {
        let html = render_list_view();
        assert!(html.contains(r#"<textarea id="titles""#));
        assert!(html.contains("'/api/list'"));
        assert!(html.contains("JSON.stringify({titles: titles})"));
    }
}
