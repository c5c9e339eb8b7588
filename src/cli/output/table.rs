//! Table output formatting for CLI commands
//!
//! Formatted table output for sources and provider attempts using
//! comfy-table. Supports color-coded cells, automatic column sizing, and
//! accessibility features.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{AttemptOutcome, ProviderAttempt, SourceRef, ToolInvocation};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<usize>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub fn with_config(use_colors: bool, max_width: Option<usize>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format the citations attached to a response.
    pub fn format_sources(&self, sources: &[SourceRef]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Reference").add_attribute(Attribute::Bold),
        ]);

        for (index, source) in sources.iter().enumerate() {
            let (kind, reference) = match source {
                SourceRef::Chunk {
                    chunk_id,
                    source_id,
                } => ("chunk", format!("{source_id} ({chunk_id})")),
                SourceRef::Tool {
                    tool_name,
                    reference,
                } => (tool_name.as_str(), reference.clone()),
            };

            table.add_row(vec![
                Cell::new(format!("S{}", index + 1)),
                Cell::new(kind),
                Cell::new(truncate_text(&reference, 70)),
            ]);
        }

        table.to_string()
    }

    /// Format the provider attempt trail of a response.
    pub fn format_attempts(&self, attempts: &[ProviderAttempt]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Provider").add_attribute(Attribute::Bold),
            Cell::new("Outcome").add_attribute(Attribute::Bold),
            Cell::new("Latency (ms)").add_attribute(Attribute::Bold),
            Cell::new("Tokens").add_attribute(Attribute::Bold),
        ]);

        for attempt in attempts {
            let outcome_cell = if self.use_colors {
                Cell::new(attempt.outcome.to_string()).fg(outcome_color(&attempt.outcome))
            } else {
                Cell::new(format!(
                    "{} {}",
                    outcome_icon(&attempt.outcome),
                    attempt.outcome
                ))
            };

            let tokens = attempt
                .tokens_used
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                Cell::new(&attempt.provider),
                outcome_cell,
                Cell::new(attempt.latency.as_millis().to_string()),
                Cell::new(tokens),
            ]);
        }

        table.to_string()
    }

    /// Format the tool calls made while serving a request.
    pub fn format_tool_invocations(&self, invocations: &[ToolInvocation]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Tool").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Latency (ms)").add_attribute(Attribute::Bold),
        ]);

        for invocation in invocations {
            let (label, color) = if invocation.outcome.is_success() {
                ("ok", Color::Green)
            } else {
                ("failed", Color::Red)
            };
            let status_cell = if self.use_colors {
                Cell::new(label).fg(color)
            } else {
                Cell::new(label)
            };

            table.add_row(vec![
                Cell::new(&invocation.tool_name),
                status_cell,
                Cell::new(invocation.latency.as_millis().to_string()),
            ]);
        }

        table.to_string()
    }

    /// Create a base table with common settings
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

fn outcome_color(outcome: &AttemptOutcome) -> Color {
    match outcome {
        AttemptOutcome::Success => Color::Green,
        AttemptOutcome::TransientError(_) => Color::Yellow,
        AttemptOutcome::FatalError(_) => Color::Red,
    }
}

fn outcome_icon(outcome: &AttemptOutcome) -> &'static str {
    match outcome {
        AttemptOutcome::Success => "✓",
        AttemptOutcome::TransientError(_) => "⟳",
        AttemptOutcome::FatalError(_) => "✗",
    }
}

/// Truncate text to max length with ellipsis
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        text.to_string()
    } else {
        format!("{}...", &text[..max_len.saturating_sub(3)])
    }
}
