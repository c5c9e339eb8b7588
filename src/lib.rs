//! Counsel - domain-routed startup advisory runtime
//!
//! Counsel answers startup-operations questions by routing each message to
//! a specialized domain agent. Every agent runs the same pipeline: semantic
//! retrieval over its knowledge collection, optional tool augmentation, and
//! generation through a multi-provider LLM gateway with ordered failover.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and port traits
//! - **Service Layer** (`services`): retrieval, tools, gateway, agents, router
//! - **Adapters Layer** (`adapters`): embedding, store, tool, and provider backends
//! - **Infrastructure Layer** (`infrastructure`): config, logging, runtime assembly
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{AgentError, AgentResult};
pub use domain::models::{
    AgentRequest, AgentResponse, Chunk, Config, DegradedFlag, Domain, RetrievalResult,
    RoutingDecision, SourceRef,
};
pub use domain::ports::{DomainAgent, EmbeddingProvider, LlmProvider, Tool, VectorStore};
pub use infrastructure::{App, ConfigError, ConfigLoader};
pub use services::{LlmGateway, Retriever, Router, ToolClient};
