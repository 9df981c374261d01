//! Index commands.

use std::path::Path;

use anyhow::Result;
use meili_client::ListQuery;

use crate::config::ClientConfig;

/// LIST indexes.
pub async fn list(
    limit: Option<usize>,
    offset: Option<usize>,
    output_json: bool,
    client_config_path: &Path,
) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;

    let mut query = ListQuery::new();
    if let Some(l) = limit {
        query = query.with_limit(l);
    }
    if let Some(o) = offset {
        query = query.with_offset(o);
    }

    let indexes = client.get_indexes(&query).await?;
    if output_json {
        return super::print(&indexes.results, true);
    }

    println!("{:30} {:20} {:30}", "UID", "PRIMARY KEY", "UPDATED");
    for idx in &indexes.results {
        println!(
            "{:30} {:20} {:30}",
            idx.uid,
            idx.primary_key.as_deref().unwrap_or("-"),
            idx.updated_at
        );
    }
    println!("({} of {})", indexes.results.len(), indexes.total);
    Ok(())
}

/// CREATE an index.
pub async fn create(
    uid: &str,
    primary_key: Option<&str>,
    wait: bool,
    output_json: bool,
    client_config_path: &Path,
) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;
    let info = client.create_index(uid, primary_key).await?;
    super::task::report(&client, info, wait, output_json).await
}

/// DELETE an index.
pub async fn delete(uid: &str, wait: bool, output_json: bool, client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;
    let info = client.delete_index(uid).await?;
    super::task::report(&client, info, wait, output_json).await
}
