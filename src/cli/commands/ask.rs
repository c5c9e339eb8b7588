//! Ask command: route a question to a domain agent and print the answer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::progress::create_spinner_with_message;
use crate::cli::output::TableFormatter;
use crate::domain::models::{Config, DegradedFlag, Domain, RoutingDecision};
use crate::infrastructure::App;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub query: String,

    /// Skip classification and pin a domain
    /// (pitch, competitive, marketing, patent, policy, team, generic)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// JSON file with company context forwarded to the agent
    #[arg(short = 'C', long)]
    pub context_file: Option<PathBuf>,
}

pub async fn execute(config: Config, args: AskArgs, json_mode: bool) -> Result<()> {
    let context = read_context(args.context_file.as_deref())?;

    let spinner = (!json_mode).then(|| create_spinner_with_message("Assembling runtime"));

    let app = App::bootstrap(config).await?;

    let decision = match args.domain.as_deref() {
        Some(name) => {
            let domain =
                Domain::from_str(name).with_context(|| format!("Unknown domain: {name}"))?;
            RoutingDecision {
                domain,
                confidence: 1.0,
                matched_signal: "operator override".to_string(),
            }
        }
        None => app.router.classify(&args.query),
    };

    if let Some(spinner) = &spinner {
        spinner.set_message(format!("Asking the {} agent", decision.domain));
    }

    let result = app.router.handle_with(decision, &args.query, context).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let response = result?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.text);

    if let Some(structured) = &response.structured {
        println!("\nStructured output:");
        println!("{}", serde_json::to_string_pretty(structured)?);
    }

    println!(
        "\ndomain: {}  provider: {}",
        response.domain, response.provider_used
    );
    for flag in &response.degraded {
        println!("degraded: {}", degraded_label(flag));
    }

    let formatter = TableFormatter::new();
    if !response.sources.is_empty() {
        println!("\nSources:");
        println!("{}", formatter.format_sources(&response.sources));
    }
    if !response.tool_invocations.is_empty() {
        println!("Tools:");
        println!(
            "{}",
            formatter.format_tool_invocations(&response.tool_invocations)
        );
    }
    if response.provider_attempts.len() > 1 {
        println!("Provider attempts:");
        println!("{}", formatter.format_attempts(&response.provider_attempts));
    }

    Ok(())
}

fn read_context(path: Option<&std::path::Path>) -> Result<serde_json::Value> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read context file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Context file {} is not valid JSON", path.display()))
        }
        None => Ok(serde_json::Value::Null),
    }
}

fn degraded_label(flag: &DegradedFlag) -> String {
    match flag {
        DegradedFlag::RetrievalDegraded => {
            "retrieval was unavailable; no knowledge-base chunks used".to_string()
        }
        DegradedFlag::ToolUnavailable { tool } => format!("tool {tool} was unavailable"),
        DegradedFlag::UnstructuredOutput => {
            "structured parse failed; raw model text returned".to_string()
        }
        DegradedFlag::NoExternalSources => {
            "no external sources; the answer is model knowledge only".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_context_defaults_to_null() {
        assert!(read_context(None).unwrap().is_null());
    }

    #[test]
    fn test_read_context_parses_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"company": "Acme", "stage": "seed"}}"#).unwrap();

        let context = read_context(Some(file.path())).unwrap();
        assert_eq!(context["company"], "Acme");
    }

    #[test]
    fn test_read_context_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let err = read_context(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_degraded_labels_name_the_tool() {
        let label = degraded_label(&DegradedFlag::ToolUnavailable {
            tool: "web_search".to_string(),
        });
        assert!(label.contains("web_search"));
    }
}
