//! Common types and utilities shared across the quotes crates.
//!
//! This crate holds the scraped record type and the observability helpers
//! used by the binary and integration tests. It stays dependency-minimal so
//! every other crate can depend on it cheaply.
//!
//! # Overview
//!
//! - [`Quote`]: one scraped item, in its JSON wire shape
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use quotes_common::Quote;
//!
//! let quote = Quote::new("Test quote.", "Jane Doe", vec!["/tag/life/page/1/".into()]);
//! assert_eq!(quote.tags.len(), 1);
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// One scraped quote.
///
/// Serialized as `{"quote": .., "author": .., "tags": [..]}`. Missing
/// fields on the page become empty strings; `tags` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body, trimmed.
    #[serde(rename = "quote")]
    pub text: String,
    pub author: String,
    /// Tag link `href` values in document order (not the visible tag names).
    pub tags: Vec<String>,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }
}
