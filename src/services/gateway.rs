//! Multi-provider generation gateway.
//!
//! Walks the request's ordered provider list: transient failures and
//! per-attempt timeouts move to the next provider, fatal errors abort the
//! chain immediately, and exhaustion surfaces the full attempt trail.
//! The gateway keeps no state between calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{AttemptOutcome, Generation, GenerationParams, ProviderAttempt};
use crate::domain::ports::LlmProvider;

#[derive(Debug, Default, Clone, Copy)]
pub struct LlmGateway;

impl LlmGateway {
    pub fn new() -> Self {
        Self
    }

    /// Generate a completion, failing over in list order.
    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
        params: &GenerationParams,
        providers: &[Arc<dyn LlmProvider>],
    ) -> AgentResult<Generation> {
        let mut attempts: Vec<ProviderAttempt> = Vec::with_capacity(providers.len());

        for provider in providers {
            let name = provider.name();
            let budget = Duration::from_secs(provider.timeout_secs());
            let started = Instant::now();

            match timeout(budget, provider.complete(system, prompt, params)).await {
                Ok(Ok(completion)) => {
                    let latency = started.elapsed();
                    tracing::debug!(
                        provider = %name,
                        latency_ms = latency.as_millis() as u64,
                        tokens = completion.tokens_used,
                        "generation succeeded"
                    );
                    attempts.push(ProviderAttempt {
                        provider: name.clone(),
                        outcome: AttemptOutcome::Success,
                        latency,
                        tokens_used: completion.tokens_used,
                    });
                    return Ok(Generation {
                        text: completion.text,
                        provider: name,
                        tokens_used: completion.tokens_used,
                        attempts,
                    });
                }
                Ok(Err(e)) if e.is_fatal() => {
                    tracing::error!(provider = %name, error = %e, "fatal provider error, aborting failover");
                    attempts.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::FatalError(e.to_string()),
                        latency: started.elapsed(),
                        tokens_used: None,
                    });
                    return Err(e);
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider = %name, error = %e, "provider attempt failed, trying next");
                    attempts.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::TransientError(e.to_string()),
                        latency: started.elapsed(),
                        tokens_used: None,
                    });
                }
                Err(_) => {
                    tracing::warn!(
                        provider = %name,
                        timeout_secs = provider.timeout_secs(),
                        "provider attempt timed out, trying next"
                    );
                    attempts.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::TransientError(format!(
                            "timed out after {}s",
                            provider.timeout_secs()
                        )),
                        latency: started.elapsed(),
                        tokens_used: None,
                    });
                }
            }
        }

        Err(AgentError::AllProvidersExhausted { attempts })
    }
}
