use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use quotes_common::observability::{LogConfig, LogFormat};
use quotes_config::{LogFormatConfig, LoggingConfig, QuotesConfig, ScrapeConfig};
use quotes_http::HttpClient;
use quotes_scrape::{PageScraper, QuoteSelectors, SelectorSet};
use quotes_server::ServeOptions;
use tokio_util::sync::CancellationToken;

pub fn log_config(cfg: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name: "quotes",
        log_dir: cfg.dir.as_ref().map(PathBuf::from),
        emit_stderr: cfg.stderr,
        format: match cfg.format {
            LogFormatConfig::Text => LogFormat::Text,
            LogFormatConfig::Json => LogFormat::Json,
        },
        default_filter: cfg.filter.clone(),
    }
}

pub fn build_scraper(cfg: &ScrapeConfig) -> Result<PageScraper> {
    let mut http = HttpClient::new(&cfg.target_url)?
        .with_timeout(cfg.timeout_secs.map(Duration::from_secs));
    if let Some(agent) = &cfg.user_agent {
        http = http.with_user_agent(agent.clone());
    }

    let s = &cfg.selectors;
    let selectors = QuoteSelectors::parse(SelectorSet {
        container: &s.container,
        text: &s.text,
        author: &s.author,
        tag: &s.tag,
        tag_attr: &s.tag_attr,
    })?;

    Ok(PageScraper::new(http, selectors))
}

/// Bind, serve, and block until ctrl-c or a fatal error.
pub async fn run(cfg: QuotesConfig) -> Result<()> {
    let scraper = build_scraper(&cfg.scrape)?;
    let target = scraper.target().to_string();

    let listener = quotes_server::bind(&cfg.server.bind_addr()).await?;
    let local = listener.local_addr()?;
    tracing::info!(target_url = %target, "Server is running on http://{}{}", local, cfg.server.path);

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("quotes.shutdown.requested");
            on_signal.cancel();
        }
    });

    let opts = ServeOptions {
        path: cfg.server.path.clone(),
        max_quotes: cfg.server.max_quotes,
    };
    quotes_server::serve(listener, Arc::new(scraper), opts, shutdown).await?;

    tracing::info!("quotes.shutdown.complete");
    Ok(())
}
