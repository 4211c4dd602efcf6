//! Loader for service configuration with optional YAML + environment overlays.
//!
//! Every field has a default, so an empty configuration reproduces the stock
//! behavior: scrape `https://quotes.toscrape.com` and serve `/quotes` on
//! `[::]:8080` (all interfaces), returning at most 100 quotes. Sources are merged in order
//! (file, inline YAML, then `QUOTES__`-prefixed environment variables), and
//! `${VAR}` placeholders inside string values are expanded afterwards.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuotesConfig {
    pub version: Option<String>,
    pub scrape: ScrapeConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub target_url: String,
    pub user_agent: Option<String>,
    /// `None` waits for the upstream indefinitely.
    pub timeout_secs: Option<u64>,
    pub selectors: SelectorsConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            target_url: "https://quotes.toscrape.com".into(),
            user_agent: None,
            timeout_secs: None,
            selectors: SelectorsConfig::default(),
        }
    }
}

/// CSS selectors locating one quote and its fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorsConfig {
    pub container: String,
    pub text: String,
    pub author: String,
    pub tag: String,
    pub tag_attr: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            container: ".quote".into(),
            text: ".text".into(),
            author: ".author".into(),
            tag: ".tags a.tag".into(),
            tag_attr: "href".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub max_quotes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "[::]".into(),
            port: 8080,
            path: "/quotes".into(),
            max_quotes: 100,
        }
    }
}

impl ServerConfig {
    /// `host:port`; IPv6 hosts keep their brackets (`[::]` accepts IPv4 too
    /// on dual-stack systems).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatConfig {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<String>,
    pub stderr: bool,
    pub format: LogFormatConfig,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            stderr: true,
            format: LogFormatConfig::Text,
            filter: "info".into(),
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &QuotesConfig) -> Result<(), ConfigError> {
    let url = url::Url::parse(&cfg.scrape.target_url).map_err(|e| {
        ConfigError::Message(format!(
            "scrape.target_url `{}` is not a valid URL: {e}",
            cfg.scrape.target_url
        ))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Message(format!(
            "scrape.target_url must be http(s), got `{}`",
            url.scheme()
        )));
    }
    if !cfg.server.path.starts_with('/') {
        return Err(ConfigError::Message(format!(
            "server.path must start with '/', got `{}`",
            cfg.server.path
        )));
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct QuotesConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for QuotesConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotesConfigLoader {
    /// Start from defaults; `QUOTES__` env overrides are always applied last.
    ///
    /// ```
    /// use quotes_config::QuotesConfigLoader;
    ///
    /// let config = QuotesConfigLoader::new().load().expect("defaults are valid");
    ///
    /// assert_eq!(config.scrape.target_url, "https://quotes.toscrape.com");
    /// assert_eq!(config.server.port, 8080);
    /// assert_eq!(config.server.path, "/quotes");
    /// assert_eq!(config.server.max_quotes, 100);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only when present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use quotes_config::QuotesConfigLoader;
    ///
    /// let cfg = QuotesConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// server:
    ///   port: 9090
    ///   max_quotes: 5
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("test"));
    /// assert_eq!(cfg.server.port, 9090);
    /// assert_eq!(cfg.server.max_quotes, 5);
    /// assert_eq!(cfg.server.host, "[::]");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use quotes_config::QuotesConfigLoader;
    ///
    /// unsafe { std::env::set_var("UPSTREAM_HOST", "example.test"); }
    ///
    /// let config = QuotesConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// scrape:
    ///   target_url: "https://${UPSTREAM_HOST}/"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.scrape.target_url, "https://example.test/");
    ///
    /// unsafe { std::env::remove_var("UPSTREAM_HOST"); }
    /// ```
    pub fn load(self) -> Result<QuotesConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("QUOTES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: QuotesConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;

        Ok(typed)
    }
}
