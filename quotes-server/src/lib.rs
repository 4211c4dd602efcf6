//! HTTP surface for scraped quotes.
//!
//! One route (default `/quotes`, any method) runs a fresh scrape per request
//! and returns at most `max_quotes` records as a JSON array. Scrape failures
//! are not reported to the client; [`serve`] returns
//! [`ServeError::Scrape`] instead so the process driver can exit.
use std::future::IntoFuture;
use std::sync::Arc;

use quotes_scrape::{QuoteSource, ScrapeError};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub mod routes;

pub use routes::{AppState, router};

pub const DEFAULT_PATH: &str = "/quotes";
pub const DEFAULT_MAX_QUOTES: usize = 100;

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scrape failed: {0}")]
    Scrape(#[from] ScrapeError),
}

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub path: String,
    pub max_quotes: usize,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_string(),
            max_quotes: DEFAULT_MAX_QUOTES,
        }
    }
}

/// Bind a TCP listener, keeping the address in the error.
pub async fn bind(addr: &str) -> Result<TcpListener, ServeError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve until `shutdown` is cancelled or a scrape fails.
///
/// Returns `Ok(())` after a graceful shutdown and
/// `Err(ServeError::Scrape)` as soon as any request's scrape fails.
pub async fn serve(
    listener: TcpListener,
    source: Arc<dyn QuoteSource>,
    opts: ServeOptions,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    let (fatal_tx, mut fatal_rx) = mpsc::channel(1);
    let app = router(
        AppState::new(source, opts.max_quotes, fatal_tx),
        &opts.path,
    );

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();

    tokio::select! {
        res = server => res.map_err(ServeError::Io),
        Some(err) = fatal_rx.recv() => {
            shutdown.cancel();
            Err(ServeError::Scrape(err))
        }
    }
}
