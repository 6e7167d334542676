//! # Shelf
//!
//! A personal book-tracking store: record books, track reading status and
//! progress, attach notes and a cover image, and move items through a
//! recycle bin with a timed permanent-deletion policy. The collection is
//! held in memory and mirrored to a single JSON file on every mutation.
//!
//! This crate is the data layer only. A presentation layer (desktop,
//! mobile, TUI) constructs a [`LibraryStore`] and calls its operations;
//! nothing here depends on a UI framework.
//!
//! ```no_run
//! use shelf::core::config;
//! use shelf::{LibraryStore, NewBook};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = config::resolve(&config::load_config()?);
//!     let mut library =
//!         LibraryStore::load_with_retention(settings.library_path, settings.retention)?;
//!
//!     let book = library.add(NewBook {
//!         title: "1984".to_string(),
//!         author: "George Orwell".to_string(),
//!         ..NewBook::default()
//!     })?;
//!     library.soft_delete(&book.id)?;
//!
//!     for deleted in library.deleted_books() {
//!         println!("{} ({})", deleted.title, deleted.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;

#[cfg(test)]
pub mod test_support;

pub use crate::core::book::{Book, BookStatus};
pub use crate::core::store::{BookUpdate, LibraryStore, NewBook, StoreError};
