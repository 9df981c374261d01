//! Typed async client for the Meilisearch HTTP API.
//!
//! Most calls map one method to one REST endpoint. Two pieces carry real
//! client-side logic:
//!
//! - [`Client::wait_for_task`] / [`task::wait_for_task`]: polls an
//!   asynchronous server task until it is terminal or a time budget runs out.
//! - [`Client::generate_tenant_token`] / [`tenant_token::generate_tenant_token`]:
//!   signs an HS256 tenant token restricting search to given rules.

pub mod client;
pub mod config;
pub mod error;
mod http;
pub mod index;
pub mod keys;
pub mod search;
pub mod settings;
pub mod task;
pub mod tenant_token;

pub use client::{Client, Health, Stats, Version};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use index::{DocumentsQuery, DocumentsResults, Index, IndexInfo, IndexStats, IndexesResults, ListQuery};
pub use keys::{Key, KeyBuilder, KeyUpdate, KeysResults};
pub use search::{MatchingStrategy, SearchQuery, SearchResults};
pub use settings::Settings;
pub use task::{
    Clock, Task, TaskError, TaskInfo, TaskSource, TaskStatus, TasksQuery, TasksResults, TokioClock,
    WaitOptions, DEFAULT_WAIT_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
pub use tenant_token::{SearchRules, TenantTokenClaims};
