//! Infrastructure layer module
//!
//! Process-level concerns that sit outside the domain:
//! - Hierarchical configuration loading and validation
//! - Logging initialization
//! - Runtime assembly from config

pub mod config;
pub mod logging;
pub mod setup;

pub use config::{ConfigError, ConfigLoader};
pub use setup::App;
