use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Store path cannot be empty")]
    EmptyStorePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidEmbeddingDimension(usize),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid min_score: {0}. Must be within [0.0, 1.0]")]
    InvalidMinScore(f32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid confidence threshold: {0}. Must be within [0.0, 1.0]")]
    InvalidConfidenceThreshold(f32),

    #[error("Invalid request deadline: {0} ms. Must be positive")]
    InvalidRequestDeadline(u64),

    #[error("Provider {index} has an empty name")]
    EmptyProviderName { index: usize },

    #[error("Provider {name} has unknown kind: {kind}. Must be one of: openai, anthropic, mock")]
    UnknownProviderKind { name: String, kind: String },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .counsel/config.yaml (project config)
    /// 3. .counsel/local.yaml (project local overrides, optional)
    /// 4. Environment variables (COUNSEL_* prefix, highest priority)
    ///
    /// Configuration is always project-local (pwd/.counsel/) so one machine
    /// can serve several knowledge bases with different settings.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".counsel/config.yaml"))
            .merge(Yaml::file(".counsel/local.yaml"))
            .merge(Env::prefixed("COUNSEL_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.request_deadline_ms == 0 {
            return Err(ConfigError::InvalidRequestDeadline(
                config.request_deadline_ms,
            ));
        }

        if config.store.path.is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }
        if config.store.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.store.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidEmbeddingDimension(
                config.embedding.dimension,
            ));
        }

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }
        if !(0.0..=1.0).contains(&config.retrieval.min_score) {
            return Err(ConfigError::InvalidMinScore(config.retrieval.min_score));
        }

        if config.tools.retry.initial_backoff_ms >= config.tools.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.tools.retry.initial_backoff_ms,
                config.tools.retry.max_backoff_ms,
            ));
        }

        if !(0.0..=1.0).contains(&config.router.confidence_threshold) {
            return Err(ConfigError::InvalidConfidenceThreshold(
                config.router.confidence_threshold,
            ));
        }

        let valid_kinds = ["openai", "anthropic", "mock"];
        for (index, provider) in config.providers.iter().enumerate() {
            if provider.name.is_empty() {
                return Err(ConfigError::EmptyProviderName { index });
            }
            if !valid_kinds.contains(&provider.kind.as_str()) {
                return Err(ConfigError::UnknownProviderKind {
                    name: provider.name.clone(),
                    kind: provider.kind.clone(),
                });
            }
        }

        Ok(())
    }
}
