//! Task commands: inspect and wait on asynchronous server operations.

use std::path::Path;

use anyhow::Result;
use meili_client::{Client, TaskInfo, TaskStatus, TasksQuery, WaitOptions};
use tracing::info;

use crate::config::ClientConfig;

/// GET one task.
pub async fn get(uid: u64, output_json: bool, client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;
    let task = client.get_task(uid).await?;
    super::print(&task, output_json)
}

/// LIST recent tasks, optionally filtered by status.
pub async fn list(
    limit: Option<u32>,
    statuses: &[String],
    output_json: bool,
    client_config_path: &Path,
) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;

    let mut query = TasksQuery::new();
    if let Some(l) = limit {
        query = query.with_limit(l);
    }
    for s in statuses {
        let status: TaskStatus = serde_json::from_value(serde_json::Value::String(s.clone()))
            .map_err(|_| anyhow::anyhow!("Unknown task status: {}", s))?;
        query = query.with_statuses([status]);
    }

    let tasks = client.get_tasks(&query).await?;
    super::print(&tasks.results, output_json)
}

/// WAIT for a task to finish.
pub async fn wait(
    uid: u64,
    timeout_ms: u64,
    interval_ms: u64,
    output_json: bool,
    client_config_path: &Path,
) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;
    let client = config.require_current()?.client()?;
    let task = client
        .wait_for_task(uid, Some(WaitOptions::from_millis(timeout_ms, interval_ms)))
        .await?;
    super::print(&task, output_json)?;
    if task.status != TaskStatus::Succeeded {
        anyhow::bail!("Task {} ended as {}.", uid, task.status);
    }
    Ok(())
}

/// Print the enqueued task; with `wait`, block until it is done.
pub async fn report(client: &Client, info: TaskInfo, wait: bool, output_json: bool) -> Result<()> {
    if !wait {
        return super::print(&info, output_json);
    }

    info!(task_uid = info.task_uid, "waiting for task");
    let task = info.wait_for_completion(client, None).await?;
    super::print(&task, output_json)?;
    match (task.status, task.error) {
        (TaskStatus::Succeeded, _) => Ok(()),
        (status, Some(err)) => anyhow::bail!("Task {} {}: {}", task.uid, status, err.message),
        (status, None) => anyhow::bail!("Task {} {}.", task.uid, status),
    }
}
