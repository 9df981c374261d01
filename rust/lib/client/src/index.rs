//! Per-index operations: documents, search, settings.
//!
//! Path layout: `{base_url}/indexes/{uid}/...`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::search::{SearchQuery, SearchResults};
use crate::settings::Settings;
use crate::task::TaskInfo;

/// Index metadata from `GET /indexes/{uid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    pub uid: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexesResults {
    pub results: Vec<IndexInfo>,
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub number_of_documents: u64,
    pub is_indexing: bool,
    #[serde(default)]
    pub field_distribution: Map<String, Value>,
}

/// `offset` / `limit` pagination for index and key listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Query for `GET /indexes/{uid}/documents`.
#[derive(Debug, Clone, Default)]
pub struct DocumentsQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub fields: Vec<String>,
}

impl DocumentsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.join(",")));
        }
        pairs
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsResults<T> {
    pub results: Vec<T>,
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

/// Handle on a single index. Cheap to create; holds no server state.
#[derive(Clone)]
pub struct Index {
    pub uid: String,
    client: Client,
}

impl Index {
    pub(crate) fn new(uid: impl Into<String>, client: Client) -> Self {
        Self {
            uid: uid.into(),
            client,
        }
    }

    fn path(&self, suffix: &str) -> String {
        format!("/indexes/{}{}", urlencoding::encode(&self.uid), suffix)
    }

    /// Document ids are user data and may contain `/`, `?` or `#`.
    fn document_path(&self, document_id: &str) -> String {
        self.path(&format!("/documents/{}", urlencoding::encode(document_id)))
    }

    fn primary_key_query(primary_key: Option<&str>) -> Vec<(&'static str, &str)> {
        primary_key.map(|pk| vec![("primaryKey", pk)]).unwrap_or_default()
    }

    // =======================================================================
    // Index lifecycle
    // =======================================================================

    pub async fn fetch_info(&self) -> Result<IndexInfo> {
        self.client.http().get(&self.path("")).await
    }

    /// Change the primary key (only allowed while the index is empty).
    pub async fn update(&self, primary_key: &str) -> Result<TaskInfo> {
        let body = serde_json::json!({ "primaryKey": primary_key });
        self.client.http().patch(&self.path(""), &body).await
    }

    pub async fn delete(&self) -> Result<TaskInfo> {
        self.client.http().delete(&self.path("")).await
    }

    pub async fn stats(&self) -> Result<IndexStats> {
        self.client.http().get(&self.path("/stats")).await
    }

    // =======================================================================
    // Documents
    // =======================================================================

    /// Add documents, replacing any with the same primary key.
    pub async fn add_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo> {
        self.client
            .http()
            .post_query(
                &self.path("/documents"),
                &Self::primary_key_query(primary_key),
                Some(documents),
            )
            .await
    }

    /// Add documents in chunks of `batch_size`, one task per chunk.
    pub async fn add_documents_in_batches<T: Serialize>(
        &self,
        documents: &[T],
        batch_size: usize,
        primary_key: Option<&str>,
    ) -> Result<Vec<TaskInfo>> {
        if batch_size == 0 {
            return Err(Error::Validation("batch size must be positive".into()));
        }
        let mut tasks = Vec::with_capacity(documents.len().div_ceil(batch_size));
        for chunk in documents.chunks(batch_size) {
            tasks.push(self.add_documents(chunk, primary_key).await?);
        }
        Ok(tasks)
    }

    /// Add documents, merging fields into existing ones with the same key.
    pub async fn update_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskInfo> {
        self.client
            .http()
            .put_query(
                &self.path("/documents"),
                &Self::primary_key_query(primary_key),
                documents,
            )
            .await
    }

    pub async fn get_document<T: DeserializeOwned>(&self, document_id: &str) -> Result<T> {
        self.client
            .http()
            .get(&self.document_path(document_id))
            .await
    }

    pub async fn get_documents<T: DeserializeOwned>(
        &self,
        query: &DocumentsQuery,
    ) -> Result<DocumentsResults<T>> {
        self.client
            .http()
            .get_query(&self.path("/documents"), &query.to_pairs())
            .await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<TaskInfo> {
        self.client
            .http()
            .delete(&self.document_path(document_id))
            .await
    }

    pub async fn delete_documents<S: AsRef<str>>(&self, document_ids: &[S]) -> Result<TaskInfo> {
        let ids: Vec<&str> = document_ids.iter().map(AsRef::as_ref).collect();
        self.client
            .http()
            .post(&self.path("/documents/delete-batch"), &ids)
            .await
    }

    pub async fn delete_all_documents(&self) -> Result<TaskInfo> {
        self.client.http().delete(&self.path("/documents")).await
    }

    // =======================================================================
    // Search
    // =======================================================================

    pub async fn search<T: DeserializeOwned>(&self, query: &SearchQuery) -> Result<SearchResults<T>> {
        self.client.http().post(&self.path("/search"), query).await
    }

    // =======================================================================
    // Settings
    // =======================================================================

    pub async fn get_settings(&self) -> Result<Settings> {
        self.client.http().get(&self.path("/settings")).await
    }

    /// Update the `Some` fields of `settings`; others are untouched.
    pub async fn set_settings(&self, settings: &Settings) -> Result<TaskInfo> {
        self.client.http().patch(&self.path("/settings"), settings).await
    }

    pub async fn reset_settings(&self) -> Result<TaskInfo> {
        self.client.http().delete(&self.path("/settings")).await
    }

    async fn get_setting<R: DeserializeOwned>(&self, name: &str) -> Result<R> {
        self.client
            .http()
            .get(&self.path(&format!("/settings/{name}")))
            .await
    }

    async fn set_setting<B: Serialize + ?Sized>(&self, name: &str, value: &B) -> Result<TaskInfo> {
        self.client
            .http()
            .put(&self.path(&format!("/settings/{name}")), value)
            .await
    }

    async fn reset_setting(&self, name: &str) -> Result<TaskInfo> {
        self.client
            .http()
            .delete(&self.path(&format!("/settings/{name}")))
            .await
    }

    pub async fn get_ranking_rules(&self) -> Result<Vec<String>> {
        self.get_setting("ranking-rules").await
    }

    pub async fn set_ranking_rules<S: AsRef<str> + Serialize>(&self, rules: &[S]) -> Result<TaskInfo> {
        self.set_setting("ranking-rules", rules).await
    }

    pub async fn reset_ranking_rules(&self) -> Result<TaskInfo> {
        self.reset_setting("ranking-rules").await
    }

    pub async fn get_filterable_attributes(&self) -> Result<Vec<String>> {
        self.get_setting("filterable-attributes").await
    }

    pub async fn set_filterable_attributes<S: AsRef<str> + Serialize>(
        &self,
        attrs: &[S],
    ) -> Result<TaskInfo> {
        self.set_setting("filterable-attributes", attrs).await
    }

    pub async fn reset_filterable_attributes(&self) -> Result<TaskInfo> {
        self.reset_setting("filterable-attributes").await
    }

    pub async fn get_searchable_attributes(&self) -> Result<Vec<String>> {
        self.get_setting("searchable-attributes").await
    }

    pub async fn set_searchable_attributes<S: AsRef<str> + Serialize>(
        &self,
        attrs: &[S],
    ) -> Result<TaskInfo> {
        self.set_setting("searchable-attributes", attrs).await
    }

    pub async fn reset_searchable_attributes(&self) -> Result<TaskInfo> {
        self.reset_setting("searchable-attributes").await
    }

    pub async fn get_stop_words(&self) -> Result<Vec<String>> {
        self.get_setting("stop-words").await
    }

    pub async fn set_stop_words<S: AsRef<str> + Serialize>(&self, words: &[S]) -> Result<TaskInfo> {
        self.set_setting("stop-words", words).await
    }

    pub async fn reset_stop_words(&self) -> Result<TaskInfo> {
        self.reset_setting("stop-words").await
    }

    pub async fn get_synonyms(&self) -> Result<std::collections::BTreeMap<String, Vec<String>>> {
        self.get_setting("synonyms").await
    }

    pub async fn set_synonyms(
        &self,
        synonyms: &std::collections::BTreeMap<String, Vec<String>>,
    ) -> Result<TaskInfo> {
        self.set_setting("synonyms", synonyms).await
    }

    pub async fn reset_synonyms(&self) -> Result<TaskInfo> {
        self.reset_setting("synonyms").await
    }
}
