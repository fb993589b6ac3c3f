//! Directory-backed recording store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::RecordingStore;

/// A [`RecordingStore`] over a local directory tree, typically a synced
/// copy of the event's storage container.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl RecordingStore for LocalStore {
    /// Walks the whole tree and returns relative names, sorted so the
    /// first match for a code is stable across runs.
    async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .with_context(|| format!("failed to list {}", dir.display()))?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    stack.push(path);
                } else if let Ok(rel) = path.strip_prefix(&self.root) {
                    names.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        names.sort();
        debug!("store at {} holds {} objects", self.root.display(), names.len());
        Ok(names)
    }

    async fn download(&self, name: &str, dest: &Path) -> Result<()> {
        let src = self.root.join(name);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::copy(&src, dest)
            .await
            .with_context(|| format!("failed to fetch {}", src.display()))?;
        Ok(())
    }

    async fn upload(&self, src: &Path, name: &str) -> Result<()> {
        let dest = self.root.join(name);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::copy(src, &dest)
            .await
            .with_context(|| format!("failed to store {}", dest.display()))?;
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(fs::try_exists(self.root.join(name)).await?)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let path = self.root.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to delete {}", path.display()))
            }
        }
    }
}
