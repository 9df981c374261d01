//! Tenant tokens: signed, scoped search credentials derived from an API key.
//!
//! A tenant token is a compact HS256 JWT:
//!
//! ```text
//! base64url({"typ":"JWT","alg":"HS256"})
//!   . base64url({"apiKeyPrefix":"…","searchRules":…,"exp":…})
//!   . base64url(HMAC-SHA256(key, header "." payload))
//! ```
//!
//! The serialized key order of header and payload is part of the wire
//! contract: the signature covers those exact bytes. Reordering the fields
//! of [`TenantTokenClaims`] is a breaking change.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Number of leading key characters embedded in the payload.
pub const API_KEY_PREFIX_LEN: usize = 8;

/// Which indexes (and filters) a tenant token grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchRules {
    /// Index uid → rule object, e.g. `{"movies": {"filter": "user_id = 1"}}`.
    ByIndex(Map<String, Value>),
    /// Plain list of index uids. `["*"]` grants every index.
    IndexNames(Vec<String>),
}

impl SearchRules {
    /// `["*"]`: every index, no extra restriction.
    pub fn all() -> Self {
        Self::IndexNames(vec!["*".to_string()])
    }

    fn validate(&self) -> Result<()> {
        let empty = match self {
            Self::ByIndex(map) => map.is_empty() || map.keys().all(|k| k.trim().is_empty()),
            Self::IndexNames(names) => names.iter().all(|n| n.trim().is_empty()),
        };
        if empty {
            return Err(Error::Validation(
                "tenant token requires non-empty search rules".into(),
            ));
        }
        Ok(())
    }
}

impl From<&str> for SearchRules {
    fn from(index: &str) -> Self {
        Self::IndexNames(vec![index.to_string()])
    }
}

impl From<Vec<String>> for SearchRules {
    fn from(names: Vec<String>) -> Self {
        Self::IndexNames(names)
    }
}

impl From<Vec<&str>> for SearchRules {
    fn from(names: Vec<&str>) -> Self {
        Self::IndexNames(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Map<String, Value>> for SearchRules {
    fn from(map: Map<String, Value>) -> Self {
        Self::ByIndex(map)
    }
}

/// Token payload. Field order is the signed byte order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantTokenClaims {
    pub api_key_prefix: String,
    pub search_rules: SearchRules,
    /// Unix timestamp; `null` means the token never expires.
    pub exp: Option<i64>,
}

/// Sign a tenant token with `api_key`, checking `expires_at` against now.
///
/// Inputs are checked in order key → rules → expiry, so a call that is
/// wrong in several ways always reports the same problem.
pub fn generate_tenant_token(
    search_rules: impl Into<SearchRules>,
    expires_at: Option<DateTime<Utc>>,
    api_key: Option<&str>,
) -> Result<String> {
    generate_tenant_token_at(search_rules, expires_at, api_key, Utc::now())
}

/// Same as [`generate_tenant_token`] with an explicit signing instant.
pub fn generate_tenant_token_at(
    search_rules: impl Into<SearchRules>,
    expires_at: Option<DateTime<Utc>>,
    api_key: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String> {
    let key = match api_key {
        Some(k) if !k.is_empty() => k,
        _ => {
            return Err(Error::Validation(
                "an api key is required to sign a tenant token".into(),
            ));
        }
    };

    let search_rules = search_rules.into();
    search_rules.validate()?;

    if let Some(exp) = expires_at {
        if exp <= now {
            return Err(Error::Validation(format!(
                "tenant token expiry {} is not in the future",
                exp.to_rfc3339()
            )));
        }
    }

    let claims = TenantTokenClaims {
        api_key_prefix: key.chars().take(API_KEY_PREFIX_LEN).collect(),
        search_rules,
        exp: expires_at.map(|t| t.timestamp()),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )?;
    Ok(token)
}
