//! Route command: classify a message without dispatching it.
//!
//! Runs the keyword classifier against an empty agent roster, so operators
//! can inspect routing decisions without a store or provider credentials.

use anyhow::Result;
use clap::Args;

use crate::domain::models::Config;
use crate::services::Router;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// The message to classify
    pub query: String,
}

pub fn execute(config: &Config, args: &RouteArgs, json_mode: bool) -> Result<()> {
    let router = Router::new(Vec::new(), &config.router, config.request_deadline_ms);
    let decision = router.classify(&args.query);

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("domain:     {}", decision.domain);
        println!("confidence: {:.2}", decision.confidence);
        println!("signal:     {}", decision.matched_signal);
    }

    Ok(())
}
