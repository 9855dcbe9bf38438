//! Per-book serialisation of pipeline operations.

use folio_core::BookId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async lock per book.
///
/// Chapters of a book are generated strictly in order, so every mutating operation
/// on a book holds its lock. Different books never contend.
#[derive(Debug, Clone, Default)]
pub struct BookLocks {
    locks: Arc<Mutex<HashMap<BookId, Arc<Mutex<()>>>>>,
}

impl BookLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a book.
    pub async fn acquire(&self, book_id: BookId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .await
            .entry(book_id)
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}
