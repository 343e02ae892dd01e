use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;

use crate::{clean_label, LabelResolver};

/// Static title to label mapping, usually read from a JSON object file.
/// Underscores in titles match spaces.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    labels: HashMap<String, String>,
}

fn normalize(title: &str) -> String {
    title.trim().replace('_', " ")
}

impl TableResolver {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let labels = pairs
            .into_iter()
            .map(|(k, v)| (normalize(k.as_ref()), v.into()))
            .collect();
        Self { labels }
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading label table {}", path.display()))?;
        let map: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing label table {}", path.display()))?;
        Ok(Self::from_pairs(map))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[async_trait]
impl LabelResolver for TableResolver {
    async fn resolve(&self, title: &str) -> anyhow::Result<Option<String>> {
        Ok(clean_label(self.labels.get(&normalize(title)).cloned()))
    }
}
