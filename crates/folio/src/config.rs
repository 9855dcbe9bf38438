//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (`folio.toml` compiled into the binary)
//! - `~/.config/folio/folio.toml`
//! - `./folio.toml`
//! - `FOLIO__SECTION__KEY` environment variables
//!
//! Any later source only needs the keys it overrides.

use config::{Config, Environment, File, FileFormat};
use folio_error::{ConfigError, FolioError, FolioResult};
use folio_interface::Notifier;
use folio_models::{GeminiClient, RetryPolicy};
use folio_outline::DecomposerConfig;
use folio_pipeline::{FanoutNotifier, GenerationSettings, TracingNotifier, WebhookNotifier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../../../folio.toml");

/// Text generation service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider name; only `gemini` is supported
    pub provider: String,
    /// Model identifier
    pub name: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Backoff for transient failures
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Where records and compiled documents live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON record store file
    pub store: PathBuf,
    /// Directory for compiled documents
    pub output_dir: PathBuf,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

/// Event delivery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Webhook receiving a JSON POST per pipeline event
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Complete folio configuration.
///
/// # Examples
///
/// ```
/// use folio::FolioConfig;
///
/// let config = FolioConfig::defaults().unwrap();
/// assert_eq!(config.model.provider, "gemini");
/// assert_eq!(*config.generation.chapter_max_tokens(), 8192);
/// assert_eq!(*config.outline.fallback_cap(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Text generation service
    pub model: ModelConfig,
    /// Token budgets
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Outline decomposition
    #[serde(default)]
    pub outline: DecomposerConfig,
    /// Storage locations
    pub paths: PathsConfig,
    /// Logging
    pub logging: LoggingConfig,
    /// Event delivery
    #[serde(default)]
    pub notifications: NotificationConfig,
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> FolioResult<FolioConfig> {
    builder
        .build()
        .map_err(|e| {
            FolioError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            FolioError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}

fn bundled() -> config::ConfigBuilder<config::builder::DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

impl FolioConfig {
    /// The bundled defaults alone.
    pub fn defaults() -> FolioResult<Self> {
        build(bundled())
    }

    /// Load from every source in precedence order.
    #[instrument]
    pub fn load() -> FolioResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = bundled();

        if let Some(config_dir) = dirs::home_dir().map(|home| home.join(".config/folio/folio.toml")) {
            builder = builder.add_source(File::from(config_dir).required(false));
        }

        builder = builder
            .add_source(File::with_name("folio").required(false))
            .add_source(
                Environment::with_prefix("FOLIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        build(builder)
    }

    /// Bundled defaults overlaid with one explicit file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or does not parse.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> FolioResult<Self> {
        build(bundled().add_source(File::from(path.as_ref())))
    }

    /// Build the configured text generation client.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown provider or when the API key variable is unset.
    pub fn text_generator(&self) -> FolioResult<GeminiClient> {
        if !self.model.provider.eq_ignore_ascii_case("gemini") {
            return Err(ConfigError::new(format!(
                "Unsupported model provider: {}",
                self.model.provider
            ))
            .into());
        }
        Ok(
            GeminiClient::from_env(&self.model.api_key_env, self.model.name.clone())?
                .with_temperature(self.model.temperature)
                .with_retry(self.model.retry.clone()),
        )
    }

    /// Notifier for the configured channels: always tracing, plus the webhook if set.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        let mut notifier = FanoutNotifier::new().with(Arc::new(TracingNotifier));
        if let Some(url) = self
            .notifications
            .webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        {
            notifier = notifier.with(Arc::new(WebhookNotifier::new(url)));
        }
        Arc::new(notifier)
    }
}
