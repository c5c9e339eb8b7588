//! Config command: inspect the merged configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the merged configuration with all overrides applied
    Show,
}

pub fn execute(config: &Config, args: &ConfigArgs, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let shown = redact_secrets(config.clone());
            if json_mode {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", serde_yaml::to_string(&shown)?);
            }
        }
    }
    Ok(())
}

/// Mask credential values so `config show` output is safe to paste.
fn redact_secrets(mut config: Config) -> Config {
    if config.embedding.api_key.is_some() {
        config.embedding.api_key = Some(REDACTED.to_string());
    }
    if config.tools.search_api_key.is_some() {
        config.tools.search_api_key = Some(REDACTED.to_string());
    }
    for provider in &mut config.providers {
        if provider.api_key.is_some() {
            provider.api_key = Some(REDACTED.to_string());
        }
    }
    config
}

const REDACTED: &str = "********";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ProviderConfig;

    #[test]
    fn test_redaction_masks_every_credential() {
        let mut config = Config::default();
        config.embedding.api_key = Some("sk-embed".to_string());
        config.tools.search_api_key = Some("search-key".to_string());
        config.providers.push(ProviderConfig {
            name: "primary".to_string(),
            kind: "openai".to_string(),
            api_key: Some("sk-live".to_string()),
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        });

        let shown = redact_secrets(config);
        assert_eq!(shown.embedding.api_key.as_deref(), Some(REDACTED));
        assert_eq!(shown.tools.search_api_key.as_deref(), Some(REDACTED));
        assert_eq!(shown.providers[0].api_key.as_deref(), Some(REDACTED));
    }

    #[test]
    fn test_redaction_leaves_absent_keys_absent() {
        let shown = redact_secrets(Config::default());
        assert!(shown.embedding.api_key.is_none());
        assert!(shown.tools.search_api_key.is_none());
    }

    #[test]
    fn test_show_renders_yaml() {
        let config = Config::default();
        let args = ConfigArgs {
            command: ConfigCommands::Show,
        };
        execute(&config, &args, false).unwrap();
    }
}
