use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::{clean_label, BatchResolution, LabelResolver};

/// Resolver backed by a remote label service.
///
/// `GET {base}/resolve?title=..` answers `{"label": ..}` and
/// `POST {base}/batch` with `{"titles": [..]}` answers a [`BatchResolution`].
pub struct HttpResolver {
    client: reqwest::Client,
    base: Url,
}

#[derive(Deserialize)]
struct LabelResponse {
    #[serde(default)]
    label: Option<String>,
}

impl HttpResolver {
    pub fn new(base: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid resolver url {base}"))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, name: &str) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("resolver url cannot be a base: {}", self.base))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    pub(crate) fn resolve_url(&self, title: &str) -> anyhow::Result<Url> {
        let mut url = self.endpoint("resolve")?;
        url.query_pairs_mut().append_pair("title", title);
        Ok(url)
    }
}

#[async_trait]
impl LabelResolver for HttpResolver {
    async fn resolve(&self, title: &str) -> anyhow::Result<Option<String>> {
        let url = self.resolve_url(title)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<LabelResponse>()
            .await?;
        Ok(clean_label(resp.label))
    }

    async fn batch_resolve(&self, titles: &[String]) -> anyhow::Result<BatchResolution> {
        let url = self.endpoint("batch")?;
        let out = self
            .client
            .post(url)
            .json(&serde_json::json!({ "titles": titles }))
            .send()
            .await?
            .error_for_status()?
            .json::<BatchResolution>()
            .await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_base_path() {
        let r = HttpResolver::new("http://labels.local/api/", 5).unwrap();
        assert_eq!(r.endpoint("batch").unwrap().as_str(), "http://labels.local/api/batch");

        let r = HttpResolver::new("http://labels.local/api", 5).unwrap();
        assert_eq!(r.endpoint("batch").unwrap().as_str(), "http://labels.local/api/batch");
    }

    #[test]
    fn resolve_url_encodes_title() {
        let r = HttpResolver::new("http://labels.local", 5).unwrap();
        let url = r.resolve_url("Category:A b&c").unwrap();
        assert_eq!(
            url.as_str(),
            "http://labels.local/resolve?title=Category%3AA+b%26c"
        );
    }

    #[test]
    fn rejects_bad_url() {
        assert!(HttpResolver::new("not a url", 5).is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_error() {
        let r = HttpResolver::new("http://127.0.0.1:9", 1).unwrap();
        assert!(r.resolve("Category:A").await.is_err());
    }
}
