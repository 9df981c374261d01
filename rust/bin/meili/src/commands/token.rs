//! Tenant token command. Signs locally; no request is made.

use std::path::Path;

use anyhow::Result;
use meili_client::SearchRules;

use crate::config::ClientConfig;

/// Parse `--rules`: a JSON object/array, or a comma-separated list of indexes.
fn parse_rules(raw: &str) -> Result<SearchRules> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let rules: SearchRules = serde_json::from_str(trimmed)
            .map_err(|e| anyhow::anyhow!("Invalid search rules JSON: {}", e))?;
        return Ok(rules);
    }
    let names: Vec<String> = trimmed.split(',').map(|s| s.trim().to_string()).collect();
    Ok(SearchRules::IndexNames(names))
}

/// GENERATE a tenant token.
///
/// The signing key is `--api-key`, or else the current context's key.
pub fn generate(
    rules: &str,
    expires_in_secs: Option<i64>,
    api_key: Option<&str>,
    client_config_path: &Path,
) -> Result<()> {
    let rules = parse_rules(rules)?;
    let expires_at = expires_in_secs.map(|s| chrono::Utc::now() + chrono::Duration::seconds(s));

    let token = match api_key {
        Some(key) => meili_client::tenant_token::generate_tenant_token(rules, expires_at, Some(key))?,
        None => {
            let config = ClientConfig::load(client_config_path)?;
            let client = config.require_current()?.client()?;
            client.generate_tenant_token(rules, expires_at, None)?
        }
    };

    println!("{}", token);
    Ok(())
}
