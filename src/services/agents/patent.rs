//! Patent agent: prior-art analysis with a numeric patentability score.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{AgentRequest, AgentResponse, Domain, RetrievalResult};
use crate::domain::ports::DomainAgent;
use crate::services::agents::runtime::{AgentRuntime, AgentVariant};
use crate::services::agents::structured::extract_json_block;

const SYSTEM_PROMPT: &str = "You are a patent analyst for an early-stage startup. \
Assess patentability and prior-art risk based on the filings and search results \
provided. Always answer with a single JSON object of the form \
{\"patentability_score\": <0-100>, \"assessment\": \"...\", \"prior_art_risks\": [\"...\"]} \
and nothing else. Base claims on the cited evidence; say so when evidence is thin.";

const AUGMENTATION_TOOLS: &[&str] = &["patent_search", "web_search"];
const MIN_USEFUL_RESULTS: usize = 2;

pub struct PatentAgent {
    runtime: Arc<AgentRuntime>,
}

impl PatentAgent {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

impl AgentVariant for PatentAgent {
    fn domain(&self) -> Domain {
        Domain::Patent
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    /// Patent questions always go out to the patent corpus; web search is
    /// added only when the knowledge base came back thin.
    fn augmentation_plan(
        &self,
        request: &AgentRequest,
        results: &[RetrievalResult],
    ) -> Vec<(&'static str, Value)> {
        let mut plan = vec![("patent_search", json!({ "query": request.query }))];
        if results.len() < MIN_USEFUL_RESULTS {
            plan.push(("web_search", json!({ "query": request.query })));
        }
        plan
    }

    fn min_useful_results(&self) -> usize {
        MIN_USEFUL_RESULTS
    }

    fn parse_structured(&self, text: &str) -> Option<AgentResult<Value>> {
        Some(parse_assessment(text))
    }

    fn corrective_instruction(&self) -> &'static str {
        "Your previous answer was not valid JSON. Respond with a single JSON \
         object containing a numeric \"patentability_score\" between 0 and 100, \
         and nothing else."
    }
}

#[async_trait]
impl DomainAgent for PatentAgent {
    fn domain(&self) -> Domain {
        Domain::Patent
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

fn parse_assessment(text: &str) -> AgentResult<Value> {
    let block = extract_json_block(text)
        .ok_or_else(|| AgentError::Serialization("no JSON object in model output".to_string()))?;
    let value: Value =
        serde_json::from_str(block).map_err(|e| AgentError::Serialization(e.to_string()))?;

    let score = value
        .get("patentability_score")
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            AgentError::Serialization("missing numeric patentability_score".to_string())
        })?;
    if !(0.0..=100.0).contains(&score) {
        return Err(AgentError::Serialization(format!(
            "patentability_score {score} out of range 0-100"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::agents::runtime::testing::{chunk_results, null_runtime};

    #[test]
    fn test_patent_search_always_planned() {
        let agent = PatentAgent::new(null_runtime());
        let request = AgentRequest::new("is our hinge patentable?", Domain::Patent);

        let plan =
            AgentVariant::augmentation_plan(&agent, &request, &chunk_results("patent_filings", 5));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].0, "patent_search");
    }

    #[test]
    fn test_thin_retrieval_adds_web_search() {
        let agent = PatentAgent::new(null_runtime());
        let request = AgentRequest::new("is our hinge patentable?", Domain::Patent);

        let plan =
            AgentVariant::augmentation_plan(&agent, &request, &chunk_results("patent_filings", 1));
        let tools: Vec<&str> = plan.iter().map(|(t, _)| *t).collect();
        assert_eq!(tools, vec!["patent_search", "web_search"]);
    }

    #[test]
    fn test_parse_valid_assessment() {
        let value = parse_assessment(
            r#"{"patentability_score": 72, "assessment": "novel hinge", "prior_art_risks": []}"#,
        )
        .unwrap();
        assert_eq!(value["patentability_score"], 72);
    }

    #[test]
    fn test_parse_fenced_assessment() {
        let text = "Here is my analysis:\n```json\n{\"patentability_score\": 45, \"assessment\": \"risky\"}\n```";
        let value = parse_assessment(text).unwrap();
        assert_eq!(value["patentability_score"], 45);
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let err = parse_assessment(r#"{"patentability_score": 140}"#).unwrap_err();
        assert!(matches!(err, AgentError::Serialization(_)));
    }

    #[test]
    fn test_missing_score_rejected() {
        let err = parse_assessment(r#"{"assessment": "no number"}"#).unwrap_err();
        assert!(matches!(err, AgentError::Serialization(_)));
    }
}
