//! # Library Persistence
//!
//! Reads and writes the whole book collection as one JSON file.
//!
//! Every mutation overwrites the file wholesale. All writes use atomic
//! rename (write `.tmp`, then `rename()`) so a crash mid-write never
//! corrupts the previously committed file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::book::Book;

/// Default file name of the persisted collection.
pub const LIBRARY_FILE_NAME: &str = "books.json";

/// Returns `~/.shelf/`, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".shelf");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the default library file path, `~/.shelf/books.json`.
pub fn default_library_path() -> io::Result<PathBuf> {
    Ok(data_dir()?.join(LIBRARY_FILE_NAME))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
pub fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Overwrite the library file with the full collection.
pub fn write_collection(path: &Path, books: &[Book]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    atomic_write_json(path, &books)
}

/// Read the persisted collection.
///
/// `Ok(None)` means no file exists yet. An unreadable or unparseable file
/// is an error; the store treats both the same way as "no data".
pub fn read_collection(path: &Path) -> io::Result<Option<Vec<Book>>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    let books: Vec<Book> =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(books))
}
