//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use tempfile::TempDir;

use crate::core::store::{LibraryStore, NewBook};

/// Creates a store over an empty library file in a throwaway directory.
///
/// The file is pre-seeded with `[]` so the store does not fall back to
/// the sample books. Keep the `TempDir` alive for the store's lifetime.
pub fn empty_library() -> (TempDir, LibraryStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("books.json");
    std::fs::write(&path, "[]").expect("seed empty library file");
    let store = LibraryStore::load(path).expect("load store");
    (dir, store)
}

/// A minimal `NewBook` with everything else defaulted (Want to Read,
/// zero progress, no notes or cover).
pub fn new_book(title: &str, author: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        ..NewBook::default()
    }
}
