//! Stores for compiled documents.

use async_trait::async_trait;
use folio_core::{Book, OutputFormat};
use folio_error::{FolioResult, StorageError, StorageErrorKind};
use folio_interface::ArtifactStorage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// File stem derived from a book title.
///
/// Keeps alphanumerics, spaces, hyphens and underscores, then trims. Falls back to
/// the book id when nothing survives.
///
/// # Examples
///
/// ```
/// use folio_core::Book;
/// use folio_storage::safe_file_stem;
///
/// let book = Book::new("Rust: The Voyage / Part 1?", "brief");
/// assert_eq!(safe_file_stem(&book), "Rust The Voyage  Part 1");
/// ```
pub fn safe_file_stem(book: &Book) -> String {
    let stem: String = book
        .title()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        book.id().to_string()
    } else {
        stem.to_string()
    }
}

/// Filesystem artifact store.
///
/// Writes `{base_path}/{safe title}.{extension}`, replacing earlier compilations.
#[derive(Debug, Clone)]
pub struct FileSystemArtifactStorage {
    base_path: PathBuf,
}

impl FileSystemArtifactStorage {
    /// Create a store rooted at `base_path`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> FolioResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created artifact storage");
        Ok(Self { base_path })
    }

    /// Root directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, book: &Book, format: OutputFormat) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", safe_file_stem(book), format.extension()))
    }
}

#[async_trait]
impl ArtifactStorage for FileSystemArtifactStorage {
    #[tracing::instrument(skip(self, book, bytes), fields(book_id = %book.id(), format = %format, size = bytes.len()))]
    async fn store(&self, book: &Book, format: OutputFormat, bytes: &[u8]) -> FolioResult<String> {
        let path = self.path_for(book, format);

        let temp_path = path.with_extension(format!("{}.tmp", format.extension()));
        tokio::fs::write(&temp_path, bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(path = %path.display(), "Stored compiled document");
        Ok(path.to_string_lossy().to_string())
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, handle: &str) -> FolioResult<Vec<u8>> {
        tokio::fs::read(handle).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(handle.to_string())).into()
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", handle, e))).into()
            }
        })
    }
}

/// In-memory artifact store keyed by `memory://{book id}/{stem}.{extension}`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactStorage {
    artifacts: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryArtifactStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }

    /// Stored handles, sorted.
    pub async fn handles(&self) -> Vec<String> {
        let mut handles: Vec<String> = self.artifacts.read().await.keys().cloned().collect();
        handles.sort();
        handles
    }
}

#[async_trait]
impl ArtifactStorage for InMemoryArtifactStorage {
    async fn store(&self, book: &Book, format: OutputFormat, bytes: &[u8]) -> FolioResult<String> {
        let handle = format!(
            "memory://{}/{}.{}",
            book.id(),
            safe_file_stem(book),
            format.extension()
        );
        self.artifacts
            .write()
            .await
            .insert(handle.clone(), bytes.to_vec());
        Ok(handle)
    }

    async fn retrieve(&self, handle: &str) -> FolioResult<Vec<u8>> {
        self.artifacts
            .read()
            .await
            .get(handle)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(handle.to_string())).into())
    }
}
