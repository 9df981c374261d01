use serde::Deserialize;
use thiserror::Error;

/// Client-side error.
///
/// Server failures carry the stable `code` / `type` strings from the
/// Meilisearch error object. Match on those, never on `message`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP {status}{}: {message}", bracketed(.code))]
    Api {
        status: u16,
        code: String,
        error_type: String,
        message: String,
        link: Option<String>,
    },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("timeout of {timeout_ms}ms exceeded while waiting for task {task_uid}")]
    Timeout { task_uid: u64, timeout_ms: u64 },

    #[error("validation: {0}")]
    Validation(String),

    #[error("token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// ` [code]`, or nothing when the server sent no code.
fn bracketed(code: &str) -> String {
    if code.is_empty() {
        String::new()
    } else {
        format!(" [{code}]")
    }
}

impl Error {
    /// Whether the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Build an `Api` error from a non-2xx status and its raw body.
    ///
    /// Falls back to the raw text when the body is not an error object.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(e) => Error::Api {
                status,
                code: e.code,
                error_type: e.error_type,
                message: e.message,
                link: e.link,
            },
            Err(_) => Error::Api {
                status,
                code: String::new(),
                error_type: String::new(),
                message: body.to_string(),
                link: None,
            },
        }
    }
}

/// Meilisearch error object: `{"message","code","type","link"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: String,
    #[serde(rename = "type", default)]
    error_type: String,
    #[serde(default)]
    link: Option<String>,
}
