use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use quotes_scrape::{QuoteSource, ScrapeError};
use tokio::sync::mpsc;

/// Per-router state. Cloned into every request; nothing in it is mutable.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn QuoteSource>,
    max_quotes: usize,
    fatal: mpsc::Sender<ScrapeError>,
}

impl AppState {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        max_quotes: usize,
        fatal: mpsc::Sender<ScrapeError>,
    ) -> Self {
        Self {
            source,
            max_quotes,
            fatal,
        }
    }
}

/// Mount the quotes handler on `path` for every HTTP method.
pub fn router(state: AppState, path: &str) -> Router {
    Router::new()
        .route(path, any(quotes_handler))
        .with_state(state)
}

/// Scrape, keep the first `max_quotes`, and answer with a bare JSON array.
///
/// A failed scrape never produces a response: the error is handed to the
/// serve loop and this request stays open until the process goes down.
async fn quotes_handler(State(state): State<AppState>) -> Response {
    match state.source.scrape().await {
        Ok(mut quotes) => {
            let scraped = quotes.len();
            quotes.truncate(state.max_quotes);
            tracing::debug!(scraped, served = quotes.len(), "quotes.served");
            Json(quotes).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "quotes.scrape_failed");
            let _ = state.fatal.send(err).await;
            std::future::pending::<Response>().await
        }
    }
}
