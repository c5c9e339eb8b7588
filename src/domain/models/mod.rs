pub mod chunk;
pub mod config;
pub mod domain;
pub mod invocation;
pub mod request;
pub mod state;

pub use chunk::{Chunk, RetrievalResult};
pub use config::{
    Config, EmbeddingConfig, GenerationConfig, LoggingConfig, ProviderConfig, RetrievalConfig,
    RetryConfig, RouterConfig, StoreConfig, ToolsConfig,
};
pub use domain::Domain;
pub use invocation::{
    AttemptOutcome, Generation, GenerationParams, ProviderAttempt, ToolInvocation, ToolOutcome,
};
pub use request::{AgentRequest, AgentResponse, DegradedFlag, RoutingDecision, SourceRef};
pub use state::RequestState;
