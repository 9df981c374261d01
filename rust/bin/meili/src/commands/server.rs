//! Instance-level commands: health, version.

use std::path::Path;

use anyhow::Result;

use crate::config::ClientConfig;

/// HEALTH: check the current context's server.
pub async fn health(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let ctx = config.require_current()?;

    println!("Context:   {}", ctx.name);
    println!("URL:       {}", ctx.url);

    let client = ctx.client()?;
    match client.health().await {
        Ok(h) => println!("Status:    {}", h.status),
        Err(e) => println!("Status:    unreachable ({})", e),
    }
    Ok(())
}

/// VERSION: server build info.
pub async fn version(output_json: bool, client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;
    let version = client.version().await?;
    super::print(&version, output_json)
}
