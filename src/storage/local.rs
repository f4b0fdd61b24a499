//! Local filesystem state store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::StateStore;

/// Stores one newline-separated fingerprint file per source under a root
/// directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    root_dir: PathBuf,
}

impl FileStateStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn path(&self, source_file: &str) -> PathBuf {
        self.root_dir.join(source_file)
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, source_file: &str) -> Result<Vec<String>> {
        let path = self.path(source_file);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn replace(&self, source_file: &str, ids: &[String]) -> Result<()> {
        let path = self.path(source_file);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a temp file, then rename over the old state.
        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        let mut content = ids.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_is_an_empty_state() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path());

        let state = store.load("data.txt").await.unwrap();
        assert!(state.is_empty());
    }

    #[tokio::test]
    async fn replace_then_load_round_trips_in_order() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path());

        let ids = vec!["1412".to_string(), "1415".to_string(), "1401".to_string()];
        store.replace("dorm_data.txt", &ids).await.unwrap();

        let loaded = store.load("dorm_data.txt").await.unwrap();
        assert_eq!(loaded, ids);
    }

    #[tokio::test]
    async fn replacement_is_wholesale() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path());

        store
            .replace("data.txt", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        store.replace("data.txt", &["c".to_string()]).await.unwrap();

        let loaded = store.load("data.txt").await.unwrap();
        assert_eq!(loaded, vec!["c"]);
    }

    #[tokio::test]
    async fn empty_set_clears_the_file() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path());

        store.replace("data.txt", &["a".to_string()]).await.unwrap();
        store.replace("data.txt", &[]).await.unwrap();

        let loaded = store.load("data.txt").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn blank_lines_are_ignored_on_load() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("data.txt"), "a\n\n  \nb\n")
            .await
            .unwrap();

        let store = FileStateStore::new(tmp.path());
        let loaded = store.load("data.txt").await.unwrap();
        assert_eq!(loaded, vec!["a", "b"]);
    }
}
