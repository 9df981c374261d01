//! Asynchronous server-side tasks and the client-side wait loop.
//!
//! Every mutating call (index create/delete, document writes, settings
//! updates, ...) is enqueued by the server and answered with a
//! [`TaskInfo`]. [`wait_for_task`] polls `GET /tasks/{uid}` until the task
//! reaches a terminal status or the wait budget runs out.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::{Error, Result};

/// Default wait budget for [`wait_for_task`].
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5000;
/// Default delay between two polls.
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 50;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a task, as reported by the server.
///
/// ```text
/// enqueued → processing → succeeded
///                       → failed
///                       → canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enqueued => "enqueued",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }

    /// Whether the task has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Task: server snapshot
// ---------------------------------------------------------------------------

/// Error recorded on a failed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskError {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Snapshot of a task, as returned by `GET /tasks/{uid}`.
///
/// The client never builds or mutates one; descriptive fields are passed
/// through as the server sent them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub uid: u64,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub canceled_by: Option<u64>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<TaskError>,
    /// ISO 8601 duration, e.g. `"PT0.0065S"`.
    #[serde(default)]
    pub duration: Option<String>,
    pub enqueued_at: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

impl Task {
    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }

    pub fn is_failure(&self) -> bool {
        self.status == TaskStatus::Failed
    }
}

/// Summary returned (HTTP 202) by every call that enqueues a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub task_uid: u64,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: String,
    pub enqueued_at: String,
}

impl TaskInfo {
    /// Wait for this task using the client's clock.
    ///
    /// `None` uses the client's configured [`WaitOptions`].
    pub async fn wait_for_completion(
        &self,
        client: &Client,
        opts: Option<WaitOptions>,
    ) -> Result<Task> {
        client.wait_for_task(self.task_uid, opts).await
    }
}

// ---------------------------------------------------------------------------
// Listing / filtering
// ---------------------------------------------------------------------------

/// Filters for `GET /tasks`, `POST /tasks/cancel` and `DELETE /tasks`.
#[derive(Debug, Clone, Default)]
pub struct TasksQuery {
    pub limit: Option<u32>,
    pub from: Option<u64>,
    pub uids: Vec<u64>,
    pub statuses: Vec<TaskStatus>,
    pub types: Vec<String>,
    pub index_uids: Vec<String>,
}

impl TasksQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_uids(mut self, uids: impl IntoIterator<Item = u64>) -> Self {
        self.uids.extend(uids);
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses.extend(statuses);
        self
    }

    pub fn with_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn with_index_uids<S: Into<String>>(mut self, uids: impl IntoIterator<Item = S>) -> Self {
        self.index_uids.extend(uids.into_iter().map(Into::into));
        self
    }

    /// Whether any filter (as opposed to pagination) is set.
    /// Cancel and delete refuse to run without one.
    pub fn has_filters(&self) -> bool {
        !self.uids.is_empty()
            || !self.statuses.is_empty()
            || !self.types.is_empty()
            || !self.index_uids.is_empty()
    }

    /// Query-string pairs; list filters are comma-joined.
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if !self.uids.is_empty() {
            let uids: Vec<String> = self.uids.iter().map(u64::to_string).collect();
            pairs.push(("uids", uids.join(",")));
        }
        if !self.statuses.is_empty() {
            let statuses: Vec<&str> = self.statuses.iter().map(TaskStatus::as_str).collect();
            pairs.push(("statuses", statuses.join(",")));
        }
        if !self.types.is_empty() {
            pairs.push(("types", self.types.join(",")));
        }
        if !self.index_uids.is_empty() {
            pairs.push(("indexUids", self.index_uids.join(",")));
        }
        pairs
    }
}

/// Page of tasks from `GET /tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksResults {
    pub results: Vec<Task>,
    pub limit: u32,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub next: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

// ---------------------------------------------------------------------------
// Wait loop
// ---------------------------------------------------------------------------

/// Budget for a single [`wait_for_task`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Upper bound on total time spent polling, measured from the first poll.
    pub timeout: Duration,
    /// Delay between two polls. Zero only yields to the runtime.
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::from_millis(DEFAULT_WAIT_TIMEOUT_MS, DEFAULT_WAIT_INTERVAL_MS)
    }
}

impl WaitOptions {
    pub fn from_millis(timeout_ms: u64, interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            interval: Duration::from_millis(interval_ms),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Anything that can fetch a task snapshot by uid.
#[async_trait::async_trait]
pub trait TaskSource: Send + Sync {
    async fn get_task(&self, task_uid: u64) -> Result<Task>;
}

/// Time capability used by the wait loop.
///
/// Tests swap in a manual clock so no real time passes.
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

/// Monotonic tokio clock. A zero sleep yields once instead of sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait::async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Poll `source` until task `task_uid` is terminal.
///
/// The first fetch always happens, so a zero timeout still observes the
/// task once. Fetch errors are returned as-is and never retried.
/// Reaching `failed` or `canceled` is a normal return; only running out
/// of `opts.timeout` while the task is still pending yields
/// [`Error::Timeout`].
pub async fn wait_for_task<S, C>(
    source: &S,
    clock: &C,
    task_uid: u64,
    opts: WaitOptions,
) -> Result<Task>
where
    S: TaskSource + ?Sized,
    C: Clock + ?Sized,
{
    let started = clock.now();
    let mut polls = 0u32;

    loop {
        let task = source.get_task(task_uid).await?;
        polls += 1;
        let elapsed = clock.now().saturating_duration_since(started);
        debug!(task_uid, status = %task.status, polls, ?elapsed, "polled task");

        if task.status.is_terminal() {
            return Ok(task);
        }

        if elapsed >= opts.timeout {
            let timeout_ms = u64::try_from(opts.timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(task_uid, timeout_ms, polls, status = %task.status, "gave up waiting for task");
            return Err(Error::Timeout { task_uid, timeout_ms });
        }

        clock.sleep(opts.interval).await;
    }
}
