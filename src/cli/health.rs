//! Health command implementation

use crate::cli::output::{format_health, to_json};
use crate::cli::HealthArgs;
use crate::client::ProxyApi;

/// Handle `llm-console health`
pub async fn handle_health(
    args: &HealthArgs,
    api: &dyn ProxyApi,
    base_url: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let report = api.health().await?;

    if args.json {
        Ok(to_json(&report)?)
    } else {
        Ok(format_health(&report, base_url))
    }
}
