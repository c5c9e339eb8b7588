use serde::{Deserialize, Serialize};

/// Main configuration structure for Counsel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Overall per-request deadline in milliseconds
    #[serde(default = "default_request_deadline_ms")]
    pub request_deadline_ms: u64,

    /// Vector store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Tool client configuration
    #[serde(default)]
    pub tools: ToolsConfig,

    /// LLM provider configurations, in failover priority order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Generation defaults
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Router configuration
    #[serde(default)]
    pub router: RouterConfig,
}

const fn default_request_deadline_ms() -> u64 {
    60_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_deadline_ms: default_request_deadline_ms(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            tools: ToolsConfig::default(),
            providers: vec![],
            generation: GenerationConfig::default(),
            router: RouterConfig::default(),
        }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_store_path() -> String {
    ".counsel/counsel.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Provider kind: openai or hash
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// API key (can also be set via OPENAI_API_KEY env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for API (for testing/proxies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Maximum texts per batch request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Maximum input length in characters
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "openai".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_embedding_dimension() -> usize {
    1536
}

const fn default_max_batch_size() -> usize {
    100
}

const fn default_max_input_chars() -> usize {
    8192
}

const fn default_embedding_timeout() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_key: None,
            base_url: None,
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            max_batch_size: default_max_batch_size(),
            max_input_chars: default_max_input_chars(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Number of results to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum similarity score to keep a result
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

const fn default_top_k() -> usize {
    5
}

const fn default_min_score() -> f32 {
    0.25
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

/// Tool client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ToolsConfig {
    /// Per-tool request timeout in seconds
    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,

    /// Maximum results a search tool may be asked for
    #[serde(default = "default_tool_max_results")]
    pub max_results: usize,

    /// Retry policy for transient tool failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Search API base URL (SearXNG-compatible)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_base_url: Option<String>,

    /// Patent search API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patent_base_url: Option<String>,

    /// Search API key, if the endpoint requires one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_api_key: Option<String>,
}

const fn default_tool_timeout() -> u64 {
    20
}

const fn default_tool_max_results() -> usize {
    10
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_tool_timeout(),
            max_results: default_tool_max_results(),
            retry: RetryConfig::default(),
            search_base_url: None,
            patent_base_url: None,
            search_api_key: None,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    250
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// One LLM provider entry. List order is failover priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    /// Provider name used in logs and attempt records
    pub name: String,

    /// Provider kind: openai, anthropic, or mock
    pub kind: String,

    /// API key (env fallback depends on kind)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for API (for testing/proxies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model to use
    pub model: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

const fn default_provider_timeout() -> u64 {
    60
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

const fn default_max_tokens() -> u32 {
    2048
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RouterConfig {
    /// Confidence below this routes to the generic fallback agent
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

const fn default_confidence_threshold() -> f32 {
    0.35
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}
