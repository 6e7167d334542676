//! # Library Store
//!
//! The authoritative owner of the book collection. All mutations go
//! through this type; each one runs to completion in memory and is
//! immediately mirrored to the library file, so state and storage never
//! diverge once an operation returns.
//!
//! ```text
//! LibraryStore
//! ├── books: Vec<Book>        // insertion-ordered, soft-deleted included
//! ├── path: PathBuf           // the JSON library file
//! ├── retention: Duration     // recycle-bin window before auto-purge
//! └── on_change: hook         // optional UI notification callback
//! ```
//!
//! The store performs no internal locking: it is a single-actor object,
//! and a multi-threaded host must guarantee exclusive access (e.g. one
//! owning task). Write failures are surfaced as [`StoreError::Storage`];
//! the in-memory state keeps the mutation either way, so the running
//! process stays authoritative.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use log::{debug, info, warn};

use crate::core::book::{Book, BookStatus, new_book_id, sample_books};
use crate::core::storage;

/// How long a book stays in the recycle bin before `purge_expired`
/// removes it for good.
pub const DEFAULT_RETENTION_DAYS: i64 = 28;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum StoreError {
    /// The operation targeted an id that is not in the collection.
    NotFound(String),
    /// The library file could not be written. The in-memory collection
    /// still holds the mutation.
    Storage(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "no book with id {id}"),
            StoreError::Storage(e) => write!(f, "library storage error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ============================================================================
// Operation Inputs
// ============================================================================

/// Caller-supplied fields for a new book. The store assigns `id` and
/// `added_date` itself. Title and author are required non-empty by the
/// caller's contract; the store does not re-validate them.
#[derive(Debug, Default, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub cover_image: Option<Vec<u8>>,
    pub notes: Option<String>,
    pub progress: f64,
}

/// A sparse patch for `update`: `None` leaves the field untouched.
/// `id` and `added_date` are immutable and have no entry here.
#[derive(Debug, Default, Clone)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<BookStatus>,
    pub notes: Option<String>,
    pub progress: Option<f64>,
    pub cover_image: Option<Vec<u8>>,
}

// ============================================================================
// Store
// ============================================================================

type ChangeHook = Box<dyn Fn(&[Book])>;

pub struct LibraryStore {
    books: Vec<Book>,
    path: PathBuf,
    retention: Duration,
    on_change: Option<ChangeHook>,
}

impl LibraryStore {
    /// Load the collection from `path` with the default 28-day retention.
    ///
    /// A missing or unparseable file is not an error: the store seeds
    /// itself with the sample set instead. The expired-book sweep runs
    /// immediately after loading, which also persists the seed on a
    /// first run.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::load_with_retention(path, Duration::days(DEFAULT_RETENTION_DAYS))
    }

    /// Like [`LibraryStore::load`], with an explicit retention window.
    pub fn load_with_retention(
        path: impl Into<PathBuf>,
        retention: Duration,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let books = match storage::read_collection(&path) {
            Ok(Some(books)) => {
                info!("Loaded {} book(s) from {}", books.len(), path.display());
                books
            }
            Ok(None) => {
                info!(
                    "No library file at {}, seeding sample books",
                    path.display()
                );
                sample_books()
            }
            Err(e) => {
                warn!(
                    "Could not read library file {}: {}. Seeding sample books",
                    path.display(),
                    e
                );
                sample_books()
            }
        };

        let mut store = LibraryStore {
            books,
            path,
            retention,
            on_change: None,
        };
        store.purge_expired()?;
        Ok(store)
    }

    /// Add a new book. Assigns a fresh id, stamps `added_date`, appends
    /// to the collection and persists. Duplicate titles are allowed.
    ///
    /// A book added as `Read` is stored with full progress.
    pub fn add(&mut self, new: NewBook) -> Result<Book, StoreError> {
        let book = Book {
            id: new_book_id(),
            title: new.title,
            author: new.author,
            status: new.status,
            cover_image: new.cover_image,
            notes: new.notes,
            progress: if new.status == BookStatus::Read {
                1.0
            } else {
                new.progress
            },
            added_date: Utc::now(),
            deletion_date: None,
        };
        debug!("Adding book {} ({})", book.id, book.title);
        self.books.push(book.clone());
        self.persist()?;
        Ok(book)
    }

    /// Apply a patch to an existing book and persist. `id` and
    /// `added_date` never change. When the effective status afterwards is
    /// `Read`, progress is forced to 1.0 whatever the patch said.
    ///
    /// Returns the updated record.
    pub fn update(&mut self, id: &str, patch: BookUpdate) -> Result<Book, StoreError> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(author) = patch.author {
            book.author = author;
        }
        if let Some(status) = patch.status {
            book.status = status;
        }
        if let Some(notes) = patch.notes {
            book.notes = Some(notes);
        }
        if let Some(progress) = patch.progress {
            book.progress = progress;
        }
        if let Some(cover) = patch.cover_image {
            book.cover_image = Some(cover);
        }
        if book.status == BookStatus::Read {
            book.progress = 1.0;
        }

        let updated = book.clone();
        debug!("Updated book {}", id);
        self.persist()?;
        Ok(updated)
    }

    /// Move a book to the recycle bin by stamping `deletion_date`.
    ///
    /// Idempotent: a book already in the bin keeps its original
    /// timestamp and nothing is rewritten.
    pub fn soft_delete(&mut self, id: &str) -> Result<(), StoreError> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if book.deletion_date.is_some() {
            debug!("Book {} is already in the recycle bin", id);
            return Ok(());
        }

        book.deletion_date = Some(Utc::now());
        info!("Moved book {} to the recycle bin", id);
        self.persist()
    }

    /// Bring a book back from the recycle bin. A book that is already
    /// active is left untouched.
    pub fn restore(&mut self, id: &str) -> Result<(), StoreError> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if book.deletion_date.is_none() {
            debug!("Book {} is not in the recycle bin", id);
            return Ok(());
        }

        book.deletion_date = None;
        info!("Restored book {} from the recycle bin", id);
        self.persist()
    }

    /// Remove a book from the collection for good, recycle bin or not.
    pub fn purge_permanently(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let book = self.books.remove(index);
        info!("Permanently deleted book {} ({})", book.id, book.title);
        self.persist()
    }

    /// Sweep the recycle bin: remove every book whose `deletion_date` is
    /// strictly older than the retention window, then persist once.
    ///
    /// Runs automatically at load time; callers may also invoke it
    /// periodically. Returns the number of books removed.
    pub fn purge_expired(&mut self) -> Result<usize, StoreError> {
        let now = Utc::now();
        let retention = self.retention;
        let before = self.books.len();
        self.books.retain(|book| match book.deletion_date {
            Some(deleted) => now - deleted <= retention,
            None => true,
        });
        let removed = before - self.books.len();
        if removed > 0 {
            info!("Purged {} expired book(s) from the recycle bin", removed);
        }
        self.persist()?;
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Books not in the recycle bin, in insertion order.
    pub fn active_books(&self) -> Vec<&Book> {
        self.books.iter().filter(|b| b.is_active()).collect()
    }

    /// Books in the recycle bin, in insertion order.
    pub fn deleted_books(&self) -> Vec<&Book> {
        self.books.iter().filter(|b| !b.is_active()).collect()
    }

    /// Active books with the given status whose title or author contains
    /// `search` case-insensitively. An empty `search` matches all.
    pub fn filtered(&self, status: BookStatus, search: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| b.is_active() && b.status == status && matches_search(b, search))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// The full collection, soft-deleted books included.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Register a callback fired after every successful persist, so a UI
    /// can re-render without this crate depending on any UI framework.
    pub fn set_on_change(&mut self, hook: impl Fn(&[Book]) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    fn persist(&self) -> Result<(), StoreError> {
        storage::write_collection(&self.path, &self.books).map_err(StoreError::Storage)?;
        if let Some(hook) = &self.on_change {
            hook(&self.books);
        }
        Ok(())
    }
}

fn matches_search(book: &Book, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
}
