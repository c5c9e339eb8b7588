//! CLI output formatting module
//!
//! Provides table and progress formatters for terminal display.

pub mod progress;
pub mod table;

pub use progress::{create_progress_bar, create_spinner, create_spinner_with_message, ProgressBarExt};
pub use table::TableFormatter;
