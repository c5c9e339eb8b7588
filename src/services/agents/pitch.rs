//! Pitch agent: investor-deck guidance with a structured section outline.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{AgentRequest, AgentResponse, Domain, RetrievalResult};
use crate::domain::ports::DomainAgent;
use crate::services::agents::runtime::{AgentRuntime, AgentVariant};
use crate::services::agents::structured::extract_json_block;

const SYSTEM_PROMPT: &str = "You are a pitch coach for an early-stage startup. \
Draft and critique investor-deck content using the company context and the \
deck excerpts provided. Always answer with a single JSON object of the form \
{\"sections\": [{\"title\": \"...\", \"content\": \"...\"}]} and nothing else. \
Order sections the way they should appear in the deck.";

const AUGMENTATION_TOOLS: &[&str] = &["web_search"];
const MIN_USEFUL_RESULTS: usize = 2;

pub struct PitchAgent {
    runtime: Arc<AgentRuntime>,
}

impl PitchAgent {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

impl AgentVariant for PitchAgent {
    fn domain(&self) -> Domain {
        Domain::Pitch
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn min_useful_results(&self) -> usize {
        MIN_USEFUL_RESULTS
    }

    fn augmentation_plan(
        &self,
        request: &AgentRequest,
        results: &[RetrievalResult],
    ) -> Vec<(&'static str, Value)> {
        if results.len() < MIN_USEFUL_RESULTS {
            vec![("web_search", json!({ "query": request.query }))]
        } else {
            Vec::new()
        }
    }

    fn parse_structured(&self, text: &str) -> Option<AgentResult<Value>> {
        Some(parse_outline(text))
    }

    fn corrective_instruction(&self) -> &'static str {
        "Your previous answer was not valid JSON. Respond with a single JSON \
         object containing a non-empty \"sections\" array of objects with \
         \"title\" and \"content\" strings, and nothing else."
    }
}

#[async_trait]
impl DomainAgent for PitchAgent {
    fn domain(&self) -> Domain {
        Domain::Pitch
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn min_useful_results(&self) -> usize {
        MIN_USEFUL_RESULTS
    }

    fn augmentation_tools(&self) -> &'static [&'static str] {
        AUGMENTATION_TOOLS
    }

    async fn handle(&self, request: &AgentRequest) -> AgentResult<AgentResponse> {
        self.runtime.run(self, request).await
    }
}

fn parse_outline(text: &str) -> AgentResult<Value> {
    let block = extract_json_block(text)
        .ok_or_else(|| AgentError::Serialization("no JSON object in model output".to_string()))?;
    let value: Value =
        serde_json::from_str(block).map_err(|e| AgentError::Serialization(e.to_string()))?;

    let sections = value
        .get("sections")
        .and_then(Value::as_array)
        .ok_or_else(|| AgentError::Serialization("missing sections array".to_string()))?;
    if sections.is_empty() {
        return Err(AgentError::Serialization("sections array is empty".to_string()));
    }
    for section in sections {
        let title = section.get("title").and_then(Value::as_str);
        if title.map_or(true, str::is_empty) {
            return Err(AgentError::Serialization(
                "section without a title".to_string(),
            ));
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::agents::runtime::testing::{chunk_results, null_runtime};

    #[test]
    fn test_thin_retrieval_plans_web_search() {
        let agent = PitchAgent::new(null_runtime());
        let request = AgentRequest::new("how should we open the deck?", Domain::Pitch);

        let plan = AgentVariant::augmentation_plan(&agent, &request, &[]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].0, "web_search");

        let plan =
            AgentVariant::augmentation_plan(&agent, &request, &chunk_results("pitch_decks", 3));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_parse_valid_outline() {
        let value = parse_outline(
            r#"{"sections": [{"title": "Problem", "content": "Hinges break."},
                            {"title": "Solution", "content": "Ours does not."}]}"#,
        )
        .unwrap();
        assert_eq!(value["sections"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_sections_rejected() {
        let err = parse_outline(r#"{"sections": []}"#).unwrap_err();
        assert!(matches!(err, AgentError::Serialization(_)));
    }

    #[test]
    fn test_untitled_section_rejected() {
        let err = parse_outline(r#"{"sections": [{"content": "orphan text"}]}"#).unwrap_err();
        assert!(matches!(err, AgentError::Serialization(_)));
    }

    #[test]
    fn test_prose_wrapped_outline_parses() {
        let text = "Sure!\n```json\n{\"sections\": [{\"title\": \"Team\", \"content\": \"Two founders.\"}]}\n```";
        assert!(parse_outline(text).is_ok());
    }
}
