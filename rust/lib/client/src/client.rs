//! Meilisearch HTTP client.
//!
//! Entry point for instance-level calls (health, indexes, tasks, keys) and
//! the factory for [`Index`] handles.
//!
//! # Usage
//!
//! ```ignore
//! use meili_client::{Client, SearchQuery};
//!
//! let client = Client::new("http://localhost:7700", Some("masterKey"))?;
//! let task = client.create_index("movies", Some("id")).await?;
//! client.wait_for_task(task.task_uid, None).await?;
//! let hits = client.index("movies").search::<Movie>(&SearchQuery::new("shifu")).await?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::index::{Index, IndexInfo, IndexStats, IndexesResults, ListQuery};
use crate::keys::{Key, KeyBuilder, KeyUpdate, KeysResults};
use crate::task::{self, Task, TaskInfo, TaskSource, TasksQuery, TasksResults, TokioClock, WaitOptions};
use crate::tenant_token::{self, SearchRules};

// ── Instance-level response bodies ─────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub commit_sha: String,
    pub commit_date: String,
    pub pkg_version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub database_size: u64,
    #[serde(default)]
    pub last_update: Option<String>,
    pub indexes: std::collections::BTreeMap<String, IndexStats>,
}

// ── Client ─────────────────────────────────────────────────────────

struct Inner {
    config: ClientConfig,
    http: HttpClient,
}

/// Handle to one Meilisearch instance. Clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    pub fn new(url: impl Into<String>, api_key: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::new(url);
        config.api_key = api_key.map(str::to_string);
        Self::from_config(config)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        if !(config.url.starts_with("http://") || config.url.starts_with("https://")) {
            return Err(Error::Validation(format!(
                "url must start with http:// or https://, got {:?}",
                config.url
            )));
        }
        let http = HttpClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(Inner { config, http }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    // =======================================================================
    // Instance
    // =======================================================================

    pub async fn health(&self) -> Result<Health> {
        self.http().get("/health").await
    }

    /// `true` when `/health` answers `available`; transport errors count as unhealthy.
    pub async fn is_healthy(&self) -> bool {
        matches!(self.health().await, Ok(h) if h.status == "available")
    }

    pub async fn version(&self) -> Result<Version> {
        self.http().get("/version").await
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.http().get("/stats").await
    }

    pub async fn create_dump(&self) -> Result<TaskInfo> {
        self.http().post_query::<[(&str, &str)], (), _>("/dumps", &[], None).await
    }

    // =======================================================================
    // Indexes
    // =======================================================================

    /// Handle for index `uid`. Makes no request.
    pub fn index(&self, uid: impl Into<String>) -> Index {
        Index::new(uid, self.clone())
    }

    pub async fn get_index(&self, uid: &str) -> Result<IndexInfo> {
        self.http().get(&index_path(uid)).await
    }

    pub async fn get_indexes(&self, query: &ListQuery) -> Result<IndexesResults> {
        self.http().get_query("/indexes", query).await
    }

    pub async fn create_index(&self, uid: &str, primary_key: Option<&str>) -> Result<TaskInfo> {
        let body = serde_json::json!({ "uid": uid, "primaryKey": primary_key });
        self.http().post("/indexes", &body).await
    }

    pub async fn delete_index(&self, uid: &str) -> Result<TaskInfo> {
        self.http().delete(&index_path(uid)).await
    }

    // =======================================================================
    // Tasks
    // =======================================================================

    pub async fn get_task(&self, task_uid: u64) -> Result<Task> {
        self.http().get(&format!("/tasks/{task_uid}")).await
    }

    pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksResults> {
        self.http().get_query("/tasks", &query.to_pairs()).await
    }

    /// Cancel enqueued/processing tasks matching `query`. A filter is required.
    pub async fn cancel_tasks(&self, query: &TasksQuery) -> Result<TaskInfo> {
        if !query.has_filters() {
            return Err(Error::Validation("cancel_tasks needs at least one filter".into()));
        }
        self.http()
            .post_query::<_, (), _>("/tasks/cancel", &query.to_pairs(), None)
            .await
    }

    /// Delete finished tasks matching `query`. A filter is required.
    pub async fn delete_tasks(&self, query: &TasksQuery) -> Result<TaskInfo> {
        if !query.has_filters() {
            return Err(Error::Validation("delete_tasks needs at least one filter".into()));
        }
        self.http().delete_query("/tasks", &query.to_pairs()).await
    }

    /// Block until task `task_uid` is terminal or the wait budget runs out.
    ///
    /// `None` uses the configured defaults (5000 ms budget, 50 ms interval).
    /// A `failed` or `canceled` task is returned, not raised; inspect
    /// `status` / `error`. Only an exhausted budget gives [`Error::Timeout`].
    pub async fn wait_for_task(&self, task_uid: u64, opts: Option<WaitOptions>) -> Result<Task> {
        let opts = opts.unwrap_or(self.inner.config.wait);
        task::wait_for_task(self, &TokioClock, task_uid, opts).await
    }

    // =======================================================================
    // Keys
    // =======================================================================

    pub async fn get_keys(&self, query: &ListQuery) -> Result<KeysResults> {
        self.http().get_query("/keys", query).await
    }

    /// Fetch a key by its value or its uid.
    pub async fn get_key(&self, key_or_uid: &str) -> Result<Key> {
        self.http().get(&key_path(key_or_uid)).await
    }

    pub async fn create_key(&self, key: &KeyBuilder) -> Result<Key> {
        key.validate()?;
        self.http().post("/keys", key).await
    }

    pub async fn update_key(&self, key_or_uid: &str, update: &KeyUpdate) -> Result<Key> {
        self.http().patch(&key_path(key_or_uid), update).await
    }

    pub async fn delete_key(&self, key_or_uid: &str) -> Result<()> {
        self.http().delete_empty(&key_path(key_or_uid)).await
    }

    // =======================================================================
    // Tenant tokens
    // =======================================================================

    /// Sign a tenant token. `api_key` overrides the configured key.
    pub fn generate_tenant_token(
        &self,
        search_rules: impl Into<SearchRules>,
        expires_at: Option<DateTime<Utc>>,
        api_key: Option<&str>,
    ) -> Result<String> {
        let key = api_key.or(self.inner.config.api_key.as_deref());
        tenant_token::generate_tenant_token(search_rules, expires_at, key)
    }

    /// Rules granting the listed indexes with per-index filters.
    pub fn filtered_rules<'a>(filters: impl IntoIterator<Item = (&'a str, &'a str)>) -> SearchRules {
        let map: Map<String, serde_json::Value> = filters
            .into_iter()
            .map(|(index, filter)| (index.to_string(), serde_json::json!({ "filter": filter })))
            .collect();
        SearchRules::ByIndex(map)
    }
}

fn index_path(uid: &str) -> String {
    format!("/indexes/{}", urlencoding::encode(uid))
}

fn key_path(key_or_uid: &str) -> String {
    format!("/keys/{}", urlencoding::encode(key_or_uid))
}

#[async_trait::async_trait]
impl TaskSource for Client {
    async fn get_task(&self, task_uid: u64) -> Result<Task> {
        Client::get_task(self, task_uid).await
    }
}
