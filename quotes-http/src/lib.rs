//! Minimal HTTP client for fetching HTML pages with safe logging.
//!
//! - Request options: extra headers, optional timeout
//! - One attempt per call: no retries, no caching
//! - Non-2xx responses become [`HttpError::Status`] with a body snippet
//! - Optional *raw* response logging via `QUOTES_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), quotes_http::HttpError> {
//! let client = quotes_http::HttpClient::new("https://quotes.toscrape.com")?;
//! let html = client.get_text("", quotes_http::RequestOpts::default()).await?;
//! assert!(!html.is_empty());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and
//! (optionally) the raw body (target `http.raw`) when `QUOTES_HTTP_RAW=1`.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "QUOTES_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)

pub const DEFAULT_USER_AGENT: &str = concat!("quotes-scraper/", env!("CARGO_PKG_VERSION"));

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status}, body_snippet: {body_snippet}")]
    Status {
        status: StatusCode,
        body_snippet: String,
    },
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use quotes_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.headers.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    /// Overrides the client default; `None` keeps it.
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
}

// ==============================
// Responses
// ==============================

/// A successful response body together with its declared media type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub body: String,
    /// Raw `Content-Type` header; `None` when the server sent none.
    pub content_type: Option<String>,
}

impl Page {
    /// True unless the server declared a media type that is not HTML.
    ///
    /// ```
    /// use quotes_http::Page;
    ///
    /// let page = |ct: Option<&str>| Page { body: String::new(), content_type: ct.map(Into::into) };
    /// assert!(page(Some("text/html; charset=utf-8")).is_html());
    /// assert!(page(Some("application/XHTML+xml")).is_html());
    /// assert!(page(None).is_html());
    /// assert!(!page(Some("application/json")).is_html());
    /// ```
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_none_or(|ct| ct.to_ascii_lowercase().contains("html"))
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    /// `None` waits for the upstream indefinitely.
    pub default_timeout: Option<Duration>,
    pub user_agent: String,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```
    /// use quotes_http::{HttpClient, HttpError, DEFAULT_USER_AGENT};
    ///
    /// let client = HttpClient::new("https://quotes.toscrape.com")?;
    /// assert_eq!(client.default_timeout, None);
    /// assert_eq!(client.user_agent, DEFAULT_USER_AGENT);
    /// assert_eq!(client.base().as_str(), "https://quotes.toscrape.com/");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Override the default timeout (none) returned by [`HttpClient::new`].
    ///
    /// ```
    /// use quotes_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://quotes.toscrape.com")?
    ///     .with_timeout(Some(Duration::from_secs(2)));
    /// assert_eq!(client.default_timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Option<Duration>) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// GET `path` relative to the base URL and return the body as text.
    ///
    /// An empty `path` fetches the base URL itself. Bodies that are not
    /// valid UTF-8 are decoded lossily.
    pub async fn get_text(&self, path: &str, opts: RequestOpts) -> Result<String, HttpError> {
        Ok(self.get_page(path, opts).await?.body)
    }

    /// Like [`HttpClient::get_text`], but keeps the response `Content-Type`.
    pub async fn get_page(&self, path: &str, opts: RequestOpts) -> Result<Page, HttpError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        // ----- Build request -----
        let agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| HttpError::Build(format!("invalid User-Agent: {e}")))?;
        let mut rb = self.inner.get(url.clone()).header(USER_AGENT, agent);

        let timeout = opts.timeout.or(self.default_timeout);
        if let Some(timeout) = timeout {
            rb = rb.timeout(timeout);
        }
        if let Some(hdrs) = opts.headers {
            rb = rb.headers(hdrs);
        }

        tracing::debug!(
            method = "GET",
            host_path = %format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms = ?timeout.map(|t| t.as_millis() as u64),
            "http.request.start"
        );

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(url = %url, message = %message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(url = %url, message = %message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            %status,
            duration_ms = dur_ms,
            body_len = bytes.len(),
            content_type = content_type.as_deref().unwrap_or("-"),
            "http.response.headers"
        );

        if raw_enabled() {
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(target: "http.raw", %status, duration_ms = dur_ms, body = %text, truncated);
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(body_snippet = %snippet, "http.response.body_snippet");

        // ----- Success path -----
        if status.is_success() {
            return Ok(Page {
                body: String::from_utf8_lossy(&bytes).into_owned(),
                content_type,
            });
        }

        tracing::warn!(%status, url = %url, body_snippet = %snippet, "http.error");
        Err(HttpError::Status {
            status,
            body_snippet: snippet,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        let mut cut = 500;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept_whole() {
        assert_eq!(snip_body(b"<p>hi</p>"), "<p>hi</p>");
    }

    #[test]
    fn long_bodies_are_cut_on_a_char_boundary() {
        let body = "é".repeat(400); // 800 bytes
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert_eq!(snip.len(), 500 + 3);
    }

    #[test]
    fn rejects_relative_base() {
        assert!(matches!(HttpClient::new("/quotes"), Err(HttpError::Url(_))));
    }
}
