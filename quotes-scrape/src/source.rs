use async_trait::async_trait;
use quotes_common::Quote;
use quotes_http::{HttpClient, RequestOpts};

use crate::{QuoteSelectors, ScrapeError, extract_quotes};

/// Anything that can produce a fresh list of quotes on demand.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Run one full fetch + extract pass. Nothing is cached between calls.
    async fn scrape(&self) -> Result<Vec<Quote>, ScrapeError>;
}

/// Scrapes a single page: one GET of the client's base URL per call.
///
/// A 2xx answer declared as something other than HTML is not parsed and
/// yields no quotes.
#[derive(Clone)]
pub struct PageScraper {
    http: HttpClient,
    selectors: QuoteSelectors,
}

impl PageScraper {
    pub fn new(http: HttpClient, selectors: QuoteSelectors) -> Self {
        Self { http, selectors }
    }

    pub fn target(&self) -> &str {
        self.http.base().as_str()
    }
}

#[async_trait]
impl QuoteSource for PageScraper {
    async fn scrape(&self) -> Result<Vec<Quote>, ScrapeError> {
        let page = self.http.get_page("", RequestOpts::default()).await?;
        if !page.is_html() {
            tracing::debug!(
                target_url = %self.target(),
                content_type = page.content_type.as_deref().unwrap_or("-"),
                "scrape.skipped_non_html"
            );
            return Ok(Vec::new());
        }
        let quotes = extract_quotes(&page.body, &self.selectors);
        tracing::debug!(
            target_url = %self.target(),
            html_len = page.body.len(),
            quotes = quotes.len(),
            "scrape.completed"
        );
        Ok(quotes)
    }
}
