pub mod agents;
pub mod gateway;
pub mod retriever;
pub mod retry;
pub mod router;
pub mod tool_client;

pub use agents::{AgentRuntime, AgentVariant};
pub use gateway::LlmGateway;
pub use retriever::{Retrieved, Retriever};
pub use retry::RetryPolicy;
pub use router::Router;
pub use tool_client::ToolClient;
