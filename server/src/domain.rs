use std::fmt::{Debug, Display};

use kernel::StoredFile;
use tokio::fs::File;

/// Storage seam over the shared directory.
///
/// The file system is the source of truth: no locks, no transactions,
/// no versioning. Concurrent writers of the same name race with
/// last-writer-wins.
#[allow(async_fn_in_trait)]
pub trait Storage {
    type Err: Debug + Display;

    /// Names of all entries in the storage directory, sorted.
    async fn list(&self) -> Result<Vec<StoredFile>, Self::Err>;

    /// Writes `data` under `name`, overwriting any existing file.
    async fn save(&self, name: &str, data: Vec<u8>) -> Result<(), Self::Err>;

    /// Opens `name` for reading and returns the handle plus its byte length.
    /// A directory entry counts as not found.
    async fn open(&self, name: &str) -> Result<(File, u64), Self::Err>;

    /// Removes `name` from the directory.
    async fn remove(&self, name: &str) -> Result<(), Self::Err>;
}
