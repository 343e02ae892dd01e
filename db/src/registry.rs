use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sqlx::sqlite::SqlitePool;
use tokio::sync::Mutex;

use crate::init_pool;

/// Log databases available in a data directory, with one pool per file
/// opened on first use.
pub struct DbRegistry {
    data_dir: PathBuf,
    default_db: String,
    pools: Mutex<HashMap<String, SqlitePool>>,
}

impl DbRegistry {
    pub fn new(data_dir: impl Into<PathBuf>, default_db: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            default_db: default_db.into(),
            pools: Mutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn default_db(&self) -> &str {
        &self.default_db
    }

    /// Sorted file names of the `.db` files in the data directory.
    pub async fn available(&self) -> Vec<String> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("cannot list {}: {}", self.data_dir.display(), e);
                return Vec::new();
            }
        };
        let mut names = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".db") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        names
    }

    /// The requested database if it is one of `available`, otherwise the
    /// default one. Only bare file names are honored.
    pub fn resolve(&self, requested: Option<&str>, available: &[String]) -> String {
        match requested.map(str::trim).filter(|r| !r.is_empty()) {
            Some(name) if available.iter().any(|db| db == name) => name.to_string(),
            Some(name) => {
                log::debug!("unknown database {:?}, using {}", name, self.default_db);
                self.default_db.clone()
            }
            None => self.default_db.clone(),
        }
    }

    /// Lists the data directory once, resolves `requested` against it and
    /// returns the chosen database with its pool.
    pub async fn open(&self, requested: Option<&str>) -> anyhow::Result<OpenDb> {
        let mut dbs = self.available().await;
        let name = self.resolve(requested, &dbs);
        let pool = self.pool_for(&name).await?;
        if let Err(pos) = dbs.binary_search(&name) {
            dbs.insert(pos, name.clone());
        }
        Ok(OpenDb { name, pool, dbs })
    }

    pub async fn default_pool(&self) -> anyhow::Result<SqlitePool> {
        self.pool_for(&self.default_db).await
    }

    async fn pool_for(&self, name: &str) -> anyhow::Result<SqlitePool> {
        let mut pools = self.pools.lock().await;
        if let Some(pool) = pools.get(name) {
            return Ok(pool.clone());
        }

        let path = self.data_dir.join(name);
        let path = path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF-8 database path: {}", path.display()))?;
        log::info!("opening database {}", path);
        let pool = init_pool(path).await?;
        pools.insert(name.to_string(), pool.clone());
        Ok(pool)
    }
}

/// A database picked by [`DbRegistry::open`], with the directory listing
/// taken while picking it.
pub struct OpenDb {
    pub name: String,
    pub pool: SqlitePool,
    pub dbs: Vec<String>,
}
