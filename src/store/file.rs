use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{KeyValueStore, StoreResult};

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn init(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, value).await?;
        if let Err(err) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(err.into());
        }
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "wrote store entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_values_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store.init().await.unwrap();

        assert_eq!(store.get("gwaRecords").await.unwrap(), None);
        store.set("gwaRecords", "[]").await.unwrap();
        assert_eq!(store.get("gwaRecords").await.unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested").join("gwaRecords.json").exists());
    }

    #[tokio::test]
    async fn values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set("gwaTheme", "dark").await.unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("gwaTheme").await.unwrap().as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn removing_a_missing_key_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.remove("nothing-here").await.unwrap();
    }

    #[tokio::test]
    async fn failed_rename_cleans_up_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("gwaRecords.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "x").unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.set("gwaRecords", "[]").await.is_err());
        assert!(!dir.path().join("gwaRecords.json.tmp").exists());
        assert!(blocker.join("keep").exists());
    }

    #[test]
    fn keys_map_to_safe_file_names() {
        let store = FileStore::new("/data");
        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/data/___etc_passwd.json"));
    }
}
