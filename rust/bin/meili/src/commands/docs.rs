//! Document and search commands.

use std::path::Path;

use anyhow::Result;
use meili_client::SearchQuery;
use serde_json::Value;

use crate::config::ClientConfig;

/// Parse a JSON file holding either one document or an array of them.
fn read_documents(file: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", file.display(), e))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid JSON in {}: {}", file.display(), e))?;
    match value {
        Value::Array(docs) => Ok(docs),
        Value::Object(_) => Ok(vec![value]),
        _ => anyhow::bail!("{} must contain a JSON object or array of objects.", file.display()),
    }
}

/// ADD documents from a file.
pub async fn add(
    index: &str,
    file: &Path,
    primary_key: Option<&str>,
    batch_size: Option<usize>,
    wait: bool,
    output_json: bool,
    client_config_path: &Path,
) -> Result<()> {
    let docs = read_documents(file)?;
    if docs.is_empty() {
        anyhow::bail!("No documents in {}.", file.display());
    }

    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;
    let index = client.index(index);

    let infos = match batch_size {
        Some(size) => index.add_documents_in_batches(&docs, size, primary_key).await?,
        None => vec![index.add_documents(&docs, primary_key).await?],
    };
    for info in infos {
        super::task::report(&client, info, wait, output_json).await?;
    }
    Ok(())
}

/// SEARCH an index.
pub async fn search(
    index: &str,
    q: &str,
    limit: Option<usize>,
    filter: Option<&str>,
    output_json: bool,
    client_config_path: &Path,
) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;

    let mut query = SearchQuery::new(q);
    if let Some(l) = limit {
        query = query.with_limit(l);
    }
    if let Some(f) = filter {
        query = query.with_filter(f);
    }

    let results = client.index(index).search::<Value>(&query).await?;
    if output_json {
        return super::print(&results.hits, true);
    }
    super::print(&results.hits, false)?;
    println!(
        "({} hits, ~{} total, {}ms)",
        results.hits.len(),
        results.estimated_total_hits.or(results.total_hits).unwrap_or(results.hits.len()),
        results.processing_time_ms
    );
    Ok(())
}
