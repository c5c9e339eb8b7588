//! Page content extraction.
//!
//! Fetches a URL and reduces the HTML to a title plus readable text.
//! The extraction is deliberately crude: drop script, style and comment
//! blocks, strip tags, decode the common entities, collapse whitespace.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::ToolsConfig;
use crate::domain::ports::tool::{Tool, ToolOutput};

use super::http::{build_client, check_status, classify_send_error};

/// Extracted text is capped so a single page cannot dominate a prompt.
const MAX_TEXT_CHARS: usize = 20_000;

#[derive(Debug, Deserialize)]
struct ExtractParams {
    url: String,
}

pub struct ContentExtractTool {
    http: Client,
}

impl ContentExtractTool {
    pub fn new(config: &ToolsConfig) -> AgentResult<Self> {
        Ok(Self {
            http: build_client(config.timeout_secs)?,
        })
    }

    fn parse_params(&self, params: &Value) -> AgentResult<ExtractParams> {
        let parsed: ExtractParams =
            serde_json::from_value(params.clone()).map_err(|e| AgentError::InvalidToolParams {
                tool: self.name().to_string(),
                reason: e.to_string(),
            })?;
        let url = reqwest::Url::parse(&parsed.url).map_err(|e| AgentError::InvalidToolParams {
            tool: self.name().to_string(),
            reason: format!("invalid url: {e}"),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AgentError::InvalidToolParams {
                tool: self.name().to_string(),
                reason: format!("unsupported scheme: {}", url.scheme()),
            });
        }
        Ok(parsed)
    }
}

#[async_trait]
impl Tool for ContentExtractTool {
    fn name(&self) -> &'static str {
        "content_extract"
    }

    fn validate(&self, params: &Value) -> AgentResult<()> {
        self.parse_params(params).map(|_| ())
    }

    async fn execute(&self, params: &Value) -> AgentResult<ToolOutput> {
        let parsed = self.parse_params(params)?;

        let resp = self
            .http
            .get(&parsed.url)
            .send()
            .await
            .map_err(|e| classify_send_error(self.name(), &e))?;
        let resp = check_status(self.name(), resp).await?;

        let html = resp
            .text()
            .await
            .map_err(|e| AgentError::ToolExecutionFailed {
                tool: self.name().to_string(),
                reason: format!("body read failed: {e}"),
            })?;

        let title = extract_title(&html).unwrap_or_default();
        let text = truncate_chars(strip_html(&html), MAX_TEXT_CHARS);

        tracing::debug!(
            tool = self.name(),
            url = %parsed.url,
            chars = text.chars().count(),
            "content extraction complete"
        );
        Ok(ToolOutput {
            tool_name: self.name().to_string(),
            data: json!({
                "url": parsed.url,
                "title": title,
                "text": text,
            }),
        })
    }
}

/// Pull the contents of the first `<title>` element, whitespace-collapsed.
fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let open_end = lower[open..].find('>')? + open + 1;
    let close = lower[open_end..].find("</title>")? + open_end;
    let title = collapse_whitespace(&decode_entities(&html[open_end..close]));
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Strip tags, script/style/comment blocks, decode entities, collapse
/// whitespace. Works on byte offsets of the ASCII-lowercased copy, which
/// shares indices with the original.
fn strip_html(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len() / 4);
    let mut i = 0;

    while i < html.len() {
        if lower[i..].starts_with('<') {
            i = if lower[i..].starts_with("<script") {
                skip_block(&lower, i, "</script>")
            } else if lower[i..].starts_with("<style") {
                skip_block(&lower, i, "</style>")
            } else if lower[i..].starts_with("<!--") {
                skip_block(&lower, i, "-->")
            } else {
                match lower[i..].find('>') {
                    Some(end) => i + end + 1,
                    None => lower.len(),
                }
            };
            // Tag boundaries separate words even after the tag is gone.
            out.push(' ');
        } else {
            let end = lower[i..].find('<').map_or(lower.len(), |off| i + off);
            out.push_str(&html[i..end]);
            i = end;
        }
    }

    collapse_whitespace(&decode_entities(&out))
}

fn skip_block(lower: &str, start: usize, closer: &str) -> usize {
    match lower[start..].find(closer) {
        Some(off) => start + off + closer.len(),
        None => lower.len(),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}
