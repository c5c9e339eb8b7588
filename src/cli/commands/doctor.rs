//! Doctor command: probe every configured component and report health.
//!
//! Each probe runs the same construction path the runtime uses at
//! bootstrap, so a green doctor run means `ask` will assemble.

use anyhow::{bail, Result};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::adapters::providers::build_provider;
use crate::adapters::store::SqliteVectorStore;
use crate::domain::models::Config;
use crate::domain::ports::VectorStore;
use crate::infrastructure::setup::build_embedder;
use crate::services::ToolClient;

/// Tools the agent roster can plan. Unconfigured optional tools are
/// reported as warnings, not failures.
const EXPECTED_TOOLS: &[&str] = &[
    "web_search",
    "image_search",
    "patent_search",
    "content_extract",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl CheckStatus {
    fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Warn => "!",
            Self::Fail => "✗",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub component: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckReport {
    fn new(component: impl Into<String>, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status,
            detail: detail.into(),
        }
    }
}

pub async fn execute(config: Config, json_mode: bool) -> Result<()> {
    let checks = run_checks(&config).await;
    let failures = checks
        .iter()
        .filter(|check| check.status == CheckStatus::Fail)
        .count();

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        println!("{}", format_check_table(&checks));
    }

    if failures > 0 {
        bail!("{failures} of {} checks failed", checks.len());
    }
    Ok(())
}

async fn run_checks(config: &Config) -> Vec<CheckReport> {
    let mut checks = Vec::new();

    match SqliteVectorStore::connect(&config.store.path, config.store.max_connections).await {
        Ok(store) => match store.collections().await {
            Ok(collections) => checks.push(CheckReport::new(
                "store",
                CheckStatus::Ok,
                format!("{} ({} collections)", config.store.path, collections.len()),
            )),
            Err(err) => checks.push(CheckReport::new("store", CheckStatus::Fail, err.to_string())),
        },
        Err(err) => checks.push(CheckReport::new("store", CheckStatus::Fail, err.to_string())),
    }

    match build_embedder(&config.embedding) {
        Ok(embedder) => checks.push(CheckReport::new(
            "embedder",
            CheckStatus::Ok,
            format!("{} (dimension {})", embedder.name(), embedder.dimension()),
        )),
        Err(err) => checks.push(CheckReport::new(
            "embedder",
            CheckStatus::Fail,
            err.to_string(),
        )),
    }

    match ToolClient::from_config(&config.tools) {
        Ok(tools) => {
            for tool in EXPECTED_TOOLS {
                if tools.has(tool) {
                    checks.push(CheckReport::new(
                        format!("tool:{tool}"),
                        CheckStatus::Ok,
                        "configured",
                    ));
                } else {
                    checks.push(CheckReport::new(
                        format!("tool:{tool}"),
                        CheckStatus::Warn,
                        "not configured; agents fall back without it",
                    ));
                }
            }
        }
        Err(err) => checks.push(CheckReport::new("tools", CheckStatus::Fail, err.to_string())),
    }

    if config.providers.is_empty() {
        checks.push(CheckReport::new(
            "providers",
            CheckStatus::Fail,
            "none configured; every ask will fail with exhaustion",
        ));
    }
    for provider in &config.providers {
        match build_provider(provider) {
            Ok(_) => checks.push(CheckReport::new(
                format!("provider:{}", provider.name),
                CheckStatus::Ok,
                format!("{} ({})", provider.kind, provider.model),
            )),
            Err(err) => checks.push(CheckReport::new(
                format!("provider:{}", provider.name),
                CheckStatus::Fail,
                err.to_string(),
            )),
        }
    }

    checks
}

fn format_check_table(checks: &[CheckReport]) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Component").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Detail").add_attribute(Attribute::Bold),
    ]);

    for check in checks {
        table.add_row(vec![
            Cell::new(&check.component),
            Cell::new(check.status.icon()),
            Cell::new(&check.detail),
        ]);
    }

    table.to_string()
}
