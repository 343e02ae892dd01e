use serde::Deserialize;

use crate::models::DEFAULT_DB;

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_db() -> String {
    DEFAULT_DB.to_string()
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Where labels come from. With neither `url` nor `table` set the lookup
/// endpoints answer 500.
#[derive(Clone, Debug, Deserialize)]
pub struct ResolverConfig {
    /// Base URL of a label service exposing `/resolve` and `/batch`.
    pub url: Option<String>,
    /// Path to a JSON object mapping titles to labels.
    pub table: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            url: None,
            table: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Directory holding the log databases; every `*.db` file in it can be
    /// selected with `db_path`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_db")]
    pub default_db: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_db: default_db(),
            bind: default_bind(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load("/nonexistent/dir/config.toml").unwrap();
        assert_eq!(config.data_dir, ".");
        assert_eq!(config.default_db, "new_logs.db");
        assert!(config.resolver.url.is_none());
        assert!(config.resolver.table.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
data_dir = "/var/lib/labels"

[resolver]
url = "http://localhost:9000"
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, "/var/lib/labels");
        assert_eq!(config.default_db, "new_logs.db");
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.resolver.url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.resolver.timeout_secs, 10);
    }
}
