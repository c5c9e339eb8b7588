//! Structured prompt assembly.
//!
//! Builds the user prompt from company context, retrieved chunks with
//! `[S1]`-style citation markers, and successful tool result blocks. The
//! returned source list covers exactly the evidence that entered the
//! prompt, deduplicated in first-seen order.

use serde_json::Value;

use crate::domain::models::{
    AgentRequest, RetrievalResult, SourceRef, ToolInvocation, ToolOutcome,
};

pub struct AssembledPrompt {
    pub text: String,
    pub sources: Vec<SourceRef>,
}

pub fn assemble(
    request: &AgentRequest,
    results: &[RetrievalResult],
    invocations: &[ToolInvocation],
) -> AssembledPrompt {
    let mut text = String::new();
    let mut sources: Vec<SourceRef> = Vec::new();

    if !request.company_context.is_null() {
        text.push_str("## Company context\n");
        text.push_str(
            &serde_json::to_string_pretty(&request.company_context)
                .unwrap_or_else(|_| request.company_context.to_string()),
        );
        text.push_str("\n\n");
    }

    if !results.is_empty() {
        text.push_str("## Knowledge base excerpts\n");
        for (i, result) in results.iter().enumerate() {
            text.push_str(&format!(
                "[S{}] (source: {}) {}\n",
                i + 1,
                result.chunk.source_id,
                result.chunk.text
            ));
            push_unique(
                &mut sources,
                SourceRef::Chunk {
                    chunk_id: result.chunk.id.clone(),
                    source_id: result.chunk.source_id.clone(),
                },
            );
        }
        text.push('\n');
    }

    let successful: Vec<&ToolInvocation> = invocations
        .iter()
        .filter(|inv| inv.outcome.is_success())
        .collect();
    if !successful.is_empty() {
        text.push_str("## Tool results\n");
        for inv in successful {
            if let ToolOutcome::Success(data) = &inv.outcome {
                text.push_str(&format!("### {}\n", inv.tool_name));
                text.push_str(
                    &serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
                );
                text.push('\n');
                for source in tool_source_refs(&inv.tool_name, data) {
                    push_unique(&mut sources, source);
                }
            }
        }
        text.push('\n');
    }

    text.push_str("## Question\n");
    text.push_str(&request.query);
    if !results.is_empty() {
        text.push_str("\n\nCite knowledge base excerpts with their [S#] markers where relevant.");
    }

    AssembledPrompt { text, sources }
}

/// Pull citable references out of a successful tool payload.
///
/// Search-style payloads carry a `results` array whose entries have a
/// `patent_id` or `url`; extraction payloads carry a top-level `url`.
fn tool_source_refs(tool_name: &str, data: &Value) -> Vec<SourceRef> {
    let mut refs = Vec::new();

    if let Some(items) = data.get("results").and_then(Value::as_array) {
        for item in items {
            let reference = item
                .get("patent_id")
                .or_else(|| item.get("url"))
                .and_then(Value::as_str);
            if let Some(reference) = reference {
                refs.push(SourceRef::Tool {
                    tool_name: tool_name.to_string(),
                    reference: reference.to_string(),
                });
            }
        }
    } else if let Some(url) = data.get("url").and_then(Value::as_str) {
        refs.push(SourceRef::Tool {
            tool_name: tool_name.to_string(),
            reference: url.to_string(),
        });
    }

    refs
}

fn push_unique(sources: &mut Vec<SourceRef>, source: SourceRef) {
    if !sources.contains(&source) {
        sources.push(source);
    }
}
