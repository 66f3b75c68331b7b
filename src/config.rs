use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;

use crate::store::{FileStore, KeyValueStore, SqliteStore};

pub const DEFAULT_STORE_PATH: &str = ".gwa";
const SQLITE_FILE_NAME: &str = "gwa.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// One JSON file per key in a directory
    #[default]
    File,
    /// A SQLite database file
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: Backend,
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(backend: Backend, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }

    /// For the SQLite backend a directory path resolves to `gwa.db` inside it.
    pub fn sqlite_file(&self) -> PathBuf {
        if self.path.extension().is_some() {
            self.path.clone()
        } else {
            self.path.join(SQLITE_FILE_NAME)
        }
    }

    /// Opens the configured backend and brings its schema up to date.
    pub async fn open(&self) -> anyhow::Result<Box<dyn KeyValueStore>> {
        match self.backend {
            Backend::File => {
                let store = FileStore::new(&self.path);
                store
                    .init()
                    .await
                    .with_context(|| format!("failed to prepare {}", self.path.display()))?;
                tracing::debug!(dir = %store.dir().display(), "opened file store");
                Ok(Box::new(store))
            }
            Backend::Sqlite => {
                let file = self.sqlite_file();
                let store = SqliteStore::open(&file)
                    .await
                    .with_context(|| format!("failed to open {}", file.display()))?;
                store
                    .init()
                    .await
                    .context("failed to apply SQLite migrations")?;
                tracing::debug!(file = %file.display(), "opened sqlite store");
                Ok(Box::new(store))
            }
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Backend::default(), DEFAULT_STORE_PATH)
    }
}
