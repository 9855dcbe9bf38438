//! JSON-file implementation of BookRepository.

use crate::tables::Tables;
use async_trait::async_trait;
use folio_core::{Book, BookId, Chapter, ChapterId};
use folio_error::{FolioResult, StorageError, StorageErrorKind};
use folio_interface::BookRepository;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Repository persisted to a single JSON document.
///
/// The whole table set is held in memory and rewritten after every mutation,
/// using a temp file + rename so a crash never leaves a half-written store.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
    tables: Arc<Mutex<Tables>>,
}

impl JsonFileRepository {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the file cannot be parsed.
    #[tracing::instrument(skip(path))]
    pub async fn open(path: impl Into<PathBuf>) -> FolioResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let tables = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::new(StorageErrorKind::Serialization(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::default(),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        tracing::info!(path = %path.display(), books = tables.book_count(), "Opened record store");
        Ok(Self {
            path,
            tables: Arc::new(Mutex::new(tables)),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, tables: &Tables) -> FolioResult<()> {
        let bytes = serde_json::to_vec_pretty(tables).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(e.to_string()))
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "rename {} to {}: {}",
                    temp_path.display(),
                    self.path.display(),
                    e
                )))
            })?;

        tracing::debug!(path = %self.path.display(), size = bytes.len(), "Persisted record store");
        Ok(())
    }

    /// Apply a mutation and persist on success.
    ///
    /// The in-memory tables are only replaced once the file write succeeds.
    async fn mutate<T: Send>(
        &self,
        f: impl FnOnce(&mut Tables) -> FolioResult<T> + Send,
    ) -> FolioResult<T> {
        let mut guard = self.tables.lock().await;
        let mut next = guard.clone();
        let value = f(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl BookRepository for JsonFileRepository {
    async fn create_book(&self, book: &Book) -> FolioResult<()> {
        self.mutate(|t| t.create_book(book)).await
    }

    async fn get_book(&self, id: BookId) -> FolioResult<Book> {
        self.tables.lock().await.get_book(id)
    }

    async fn list_books(&self) -> FolioResult<Vec<Book>> {
        Ok(self.tables.lock().await.list_books())
    }

    async fn update_book(&self, book: &Book) -> FolioResult<()> {
        self.mutate(|t| t.update_book(book)).await
    }

    async fn delete_book(&self, id: BookId) -> FolioResult<()> {
        self.mutate(|t| t.delete_book(id)).await
    }

    async fn create_chapters(&self, chapters: &[Chapter]) -> FolioResult<()> {
        self.mutate(|t| t.create_chapters(chapters)).await
    }

    async fn get_chapter(&self, id: ChapterId) -> FolioResult<Chapter> {
        self.tables.lock().await.get_chapter(id)
    }

    async fn list_chapters(&self, book_id: BookId) -> FolioResult<Vec<Chapter>> {
        Ok(self.tables.lock().await.list_chapters(book_id))
    }

    async fn update_chapter(&self, chapter: &Chapter) -> FolioResult<()> {
        self.mutate(|t| t.update_chapter(chapter)).await
    }

    async fn claim_generation(&self, id: ChapterId) -> FolioResult<Chapter> {
        self.mutate(|t| t.claim_generation(id)).await
    }
}
