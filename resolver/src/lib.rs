//! Title to label resolution behind the `/api/{title}` and `/api/list`
//! endpoints.

mod http;
mod table;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use common::config::ResolverConfig;
use serde::{Deserialize, Serialize};

pub use http::HttpResolver;
pub use table::TableResolver;

/// Outcome of resolving several titles at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResolution {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub no_labels: BTreeSet<String>,
}

impl BatchResolution {
    pub fn record(&mut self, title: &str, label: Option<String>) {
        match label {
            Some(label) => {
                self.labels.insert(title.to_string(), label);
            }
            None => {
                self.no_labels.insert(title.to_string());
            }
        }
    }
}

#[async_trait]
pub trait LabelResolver: Send + Sync {
    /// The label for `title`, or `None` when it has none.
    async fn resolve(&self, title: &str) -> anyhow::Result<Option<String>>;

    /// Resolves every title; the default asks [`resolve`](Self::resolve) one
    /// title at a time.
    async fn batch_resolve(&self, titles: &[String]) -> anyhow::Result<BatchResolution> {
        let mut out = BatchResolution::default();
        for title in titles {
            let label = self.resolve(title).await?;
            out.record(title, label);
        }
        Ok(out)
    }
}

/// Labels that are empty after trimming mean "no label".
pub(crate) fn clean_label(label: Option<String>) -> Option<String> {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

/// Builds the configured backend. An HTTP url wins over a table file; with
/// neither set there is no resolver.
pub fn build_resolver(config: &ResolverConfig) -> anyhow::Result<Option<Arc<dyn LabelResolver>>> {
    if let Some(url) = config.url.as_deref().filter(|u| !u.is_empty()) {
        log::info!("resolving labels through {}", url);
        let resolver = HttpResolver::new(url, config.timeout_secs)?;
        return Ok(Some(Arc::new(resolver)));
    }
    if let Some(path) = config.table.as_deref().filter(|p| !p.is_empty()) {
        let resolver = TableResolver::from_file(path)?;
        log::info!("loaded {} labels from {}", resolver.len(), path);
        return Ok(Some(Arc::new(resolver)));
    }
    log::warn!("no label resolver configured");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl LabelResolver for Failing {
        async fn resolve(&self, _title: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("backend down")
        }
    }

    #[tokio::test]
    async fn default_batch_splits_labels() {
        let resolver = TableResolver::from_pairs([("Category:A", "تصنيف:أ")]);
        let titles = vec!["Category:A".to_string(), "Category:B".to_string()];
        let out = resolver.batch_resolve(&titles).await.unwrap();

        assert_eq!(out.labels.get("Category:A").map(String::as_str), Some("تصنيف:أ"));
        assert!(out.no_labels.contains("Category:B"));
    }

    #[tokio::test]
    async fn default_batch_propagates_errors() {
        let titles = vec!["x".to_string()];
        assert!(Failing.batch_resolve(&titles).await.is_err());
    }

    #[test]
    fn clean_label_drops_blank() {
        assert_eq!(clean_label(Some("  ".to_string())), None);
        assert_eq!(clean_label(None), None);
        assert_eq!(clean_label(Some(" x ".to_string())), Some("x".to_string()));
    }

    #[test]
    fn build_resolver_none_when_unconfigured() {
        let resolver = build_resolver(&ResolverConfig::default()).unwrap();
        assert!(resolver.is_none());
    }

    #[test]
    fn build_resolver_from_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r#"{"Category:A": "تصنيف:أ"}"#).unwrap();
        let config = ResolverConfig {
            table: Some(path.to_str().unwrap().to_string()),
            ..ResolverConfig::default()
        };
        assert!(build_resolver(&config).unwrap().is_some());
    }

    #[test]
    fn build_resolver_missing_table_is_error() {
        let config = ResolverConfig {
            table: Some("/nonexistent/labels.json".to_string()),
            ..ResolverConfig::default()
        };
        assert!(build_resolver(&config).is_err());
    }

    #[test]
    fn batch_resolution_deserializes_partial() {
        let out: BatchResolution = serde_json::from_str(r#"{"labels": {"a": "b"}}"#).unwrap();
        assert_eq!(out.labels.len(), 1);
        assert!(out.no_labels.is_empty());
    }
}
