//! Extraction of JSON payloads from model output.
//!
//! Models asked for JSON frequently wrap it in a code fence or surround
//! it with prose. Parsing happens on the extracted block, not the raw
//! output.

/// Find the JSON object in a model response: a fenced block if present,
/// otherwise the outermost brace span.
pub(crate) fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(fence_start) = text.find("```") {
        let after = &text[fence_start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(fence_end) = after.find("```") {
            let inner = after[..fence_end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json() {
        assert_eq!(
            extract_json_block(r#"{"score": 70}"#),
            Some(r#"{"score": 70}"#)
        );
    }

    #[test]
    fn test_fenced_json() {
        let text = "Here you go:\n```json\n{\"score\": 70}\n```\nHope that helps.";
        assert_eq!(extract_json_block(text), Some("{\"score\": 70}"));
    }

    #[test]
    fn test_prose_around_braces() {
        let text = "The assessment is {\"score\": 70} as requested.";
        assert_eq!(extract_json_block(text), Some("{\"score\": 70}"));
    }

    #[test]
    fn test_no_json() {
        assert_eq!(extract_json_block("no structure here"), None);
    }
}
