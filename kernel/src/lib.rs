#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]

use serde::{Deserialize, Serialize};

/// Represents a file stored in the share directory.
///
/// The name is the only metadata the application tracks. Size and
/// modification time live in the file system and are read from there
/// when a response needs them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// File name inside the storage directory, always a single path segment
    pub name: String,
}

impl StoredFile {
    #[must_use]
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }

    /// Hidden files are kept out of the listing view but stay reachable
    /// by direct name.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}
