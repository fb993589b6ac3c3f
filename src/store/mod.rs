//! Recording storage.
//!
//! A [`RecordingStore`] holds the raw talk recordings and receives the
//! produced renders. The pipeline only ever lists object names, pulls
//! one object to a local work file, and pushes one result back, so the
//! trait stays small. [`LocalStore`] serves a directory tree laid out
//! the way the remote container is.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

mod local;

pub use local::LocalStore;

/// Object storage holding recordings and produced renders.
///
/// Names are `/`-separated paths relative to the store root, the way a
/// blob listing reports them.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Names of every object in the store, in stable listing order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Copy a stored object to a local file, replacing it if present.
    async fn download(&self, name: &str, dest: &Path) -> Result<()>;

    /// Store a local file under `name`.
    async fn upload(&self, src: &Path, name: &str) -> Result<()>;

    /// Whether an object with this name is present.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Remove an object. Removing an absent object is not an error.
    async fn delete(&self, name: &str) -> Result<()>;
}
