use std::io;
use std::path::{Path, PathBuf};

use kernel::StoredFile;
use tokio::fs::{self, File};

use crate::domain::Storage;

/// `Storage` backend over a single flat directory on local disk.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    #[must_use]
    pub fn open<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the storage directory if it does not exist yet. Called once
    /// at startup; the directory persists beyond the process lifetime.
    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Callers are expected to have validated `name` as a single path
    /// segment before resolving it here.
    fn entry_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Storage for DirectoryStore {
    type Err = io::Error;

    async fn list(&self) -> Result<Vec<StoredFile>, Self::Err> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // Names that are not valid UTF-8 cannot be addressed through the
            // HTTP surface, so they are not listed either.
            if let Ok(name) = entry.file_name().into_string() {
                files.push(StoredFile::new(name));
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn save(&self, name: &str, data: Vec<u8>) -> Result<(), Self::Err> {
        fs::write(self.entry_path(name), data).await
    }

    async fn open(&self, name: &str) -> Result<(File, u64), Self::Err> {
        let file = File::open(self.entry_path(name)).await?;
        let meta = file.metadata().await?;
        if meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{name} is a directory"),
            ));
        }
        Ok((file, meta.len()))
    }

    async fn remove(&self, name: &str) -> Result<(), Self::Err> {
        fs::remove_file(self.entry_path(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn save_then_list_and_open() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open(tmp.path());

        // Act
        store.save("a.txt", b"hello".to_vec()).await.unwrap();
        let files = store.list().await.unwrap();
        let (mut file, size) = store.open("a.txt").await.unwrap();

        // Assert
        assert_eq!(files, vec![StoredFile::new("a.txt")]);
        assert_eq!(size, 5);
        let mut content = Vec::new();
        file.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"hello");
    }

    #[tokio::test]
    async fn save_overwrites_existing_file() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open(tmp.path());
        store.save("a.txt", b"first".to_vec()).await.unwrap();

        // Act
        store.save("a.txt", b"second".to_vec()).await.unwrap();

        // Assert
        let (_, size) = store.open("a.txt").await.unwrap();
        assert_eq!(size, 6);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_sorted() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open(tmp.path());
        store.save("b", Vec::new()).await.unwrap();
        store.save("a", Vec::new()).await.unwrap();
        store.save("c", Vec::new()).await.unwrap();

        // Act
        let files = store.list().await.unwrap();

        // Assert
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn open_missing_file_is_not_found() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open(tmp.path());

        // Act
        let result = store.open("missing").await;

        // Assert
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn open_directory_is_not_found() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open(tmp.path());
        tokio::fs::create_dir(tmp.path().join("sub")).await.unwrap();

        // Act
        let result = store.open("sub").await;

        // Assert
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn remove_deletes_file() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open(tmp.path());
        store.save("a.txt", b"x".to_vec()).await.unwrap();

        // Act
        store.remove("a.txt").await.unwrap();

        // Assert
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_missing_file_fails() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open(tmp.path());

        // Act
        let result = store.remove("missing").await;

        // Assert
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn ensure_root_creates_directory() {
        // Arrange
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("uploads");
        let store = DirectoryStore::open(&root);

        // Act
        store.ensure_root().await.unwrap();
        store.ensure_root().await.unwrap();

        // Assert
        assert!(root.is_dir());
    }
}
