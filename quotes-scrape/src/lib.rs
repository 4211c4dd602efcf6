//! Quote extraction: selectors, HTML parsing, and the page-backed source.
//!
//! - [`selectors`]: compiled CSS selectors describing where a quote lives
//! - [`extract`]: pure HTML → [`Quote`](quotes_common::Quote) extraction
//! - [`source`]: the [`QuoteSource`] seam and the HTTP-backed [`PageScraper`]
pub mod extract;
pub mod selectors;
pub mod source;

pub use extract::extract_quotes;
pub use selectors::{QuoteSelectors, SelectorSet};
pub use source::{PageScraper, QuoteSource};

use quotes_http::HttpError;

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// The target page could not be fetched (network, status, timeout, URL).
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] HttpError),

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}
