//! # Book Records
//!
//! The `Book` record and its reading status. These types define the wire
//! shape of the library file: one JSON array of books, with RFC 3339 dates
//! and a base64 string for the optional cover image.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reading status of a book.
///
/// The serialized strings double as the labels the embedding UI shows, so
/// they are spelled out rather than derived from the variant names.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    #[serde(rename = "Read")]
    Read,
    #[serde(rename = "Currently Reading")]
    CurrentlyReading,
    #[default]
    #[serde(rename = "Want to Read")]
    WantToRead,
}

impl BookStatus {
    /// Every status, in the order a UI lists them.
    pub const ALL: [BookStatus; 3] = [
        BookStatus::Read,
        BookStatus::CurrentlyReading,
        BookStatus::WantToRead,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BookStatus::Read => "Read",
            BookStatus::CurrentlyReading => "Currently Reading",
            BookStatus::WantToRead => "Want to Read",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single tracked book.
///
/// `id` and `added_date` are assigned by the store at creation and never
/// change afterwards. A set `deletion_date` means the book sits in the
/// recycle bin; it stays in storage until restored or purged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    /// Raw image bytes (e.g. JPEG), stored as base64 text on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "cover_b64")]
    pub cover_image: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Reading progress in [0.0, 1.0]. Always 1.0 for `Read` books.
    pub progress: f64,
    pub added_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_date: Option<DateTime<Utc>>,
}

impl Book {
    /// True when the book is not in the recycle bin.
    pub fn is_active(&self) -> bool {
        self.deletion_date.is_none()
    }
}

/// Generate a new UUID v4 book ID.
pub fn new_book_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The fixed seed set used when no library file exists yet (or the
/// existing one cannot be parsed).
pub fn sample_books() -> Vec<Book> {
    let now = Utc::now();
    vec![
        Book {
            id: new_book_id(),
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            status: BookStatus::Read,
            cover_image: None,
            notes: Some("Classic dystopia.".to_string()),
            progress: 1.0,
            added_date: now,
            deletion_date: None,
        },
        Book {
            id: new_book_id(),
            title: "Clean Code".to_string(),
            author: "Robert C. Martin".to_string(),
            status: BookStatus::CurrentlyReading,
            cover_image: None,
            notes: Some("Important for developers.".to_string()),
            progress: 0.4,
            added_date: now,
            deletion_date: None,
        },
        Book {
            id: new_book_id(),
            title: "The Rust Programming Language".to_string(),
            author: "Steve Klabnik and Carol Nichols".to_string(),
            status: BookStatus::WantToRead,
            cover_image: None,
            notes: Some("Official documentation.".to_string()),
            progress: 0.0,
            added_date: now,
            deletion_date: None,
        },
    ]
}

/// Serde codec for the optional cover blob: base64 string on the wire,
/// raw bytes in memory. JSON has no binary type and a bare byte array
/// would bloat the file roughly 4x.
mod cover_b64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(data) => serializer.serialize_str(&STANDARD.encode(data)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text {
            Some(text) => STANDARD
                .decode(text.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
