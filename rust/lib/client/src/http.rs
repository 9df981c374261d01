//! Thin JSON-over-HTTP layer on top of `reqwest`.
//!
//! Every call goes to `{base_url}{path}` with the configured auth and
//! client headers. Non-2xx responses become [`Error::Api`].

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

const CLIENT_HEADER: &str = "X-Meilisearch-Client";

#[derive(Clone)]
pub(crate) struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let val = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| Error::Validation(format!("api key is not a valid header value: {e}")))?;
            headers.insert(AUTHORIZATION, val);
        }
        let agent = HeaderValue::from_str(&config.user_agent())
            .map_err(|e| Error::Validation(format!("client agent is not a valid header value: {e}")))?;
        headers.insert(CLIENT_HEADER, agent);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.url.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "meilisearch request");
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Parse a response, mapping HTTP errors to `Error::Api`.
    async fn parse<R: DeserializeOwned>(resp: Response) -> Result<R> {
        let resp = Self::check(resp).await?;
        resp.json::<R>()
            .await
            .map_err(|e| Error::Decode(format!("response body: {e}")))
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::from_response(status.as_u16(), &body))
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let resp = self.request(Method::GET, path).send().await?;
        Self::parse(resp).await
    }

    pub async fn get_query<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.request(Method::GET, path).query(query).send().await?;
        Self::parse(resp).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        Self::parse(resp).await
    }

    /// POST with query parameters and a body that may be absent.
    pub async fn post_query<Q, B, R>(&self, path: &str, query: &Q, body: Option<&B>) -> Result<R>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut req = self.request(Method::POST, path).query(query);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::parse(resp).await
    }

    pub async fn put_query<Q, B, R>(&self, path: &str, query: &Q, body: &B) -> Result<R>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.request(Method::PUT, path).query(query).json(body).send().await?;
        Self::parse(resp).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.request(Method::PUT, path).json(body).send().await?;
        Self::parse(resp).await
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.request(Method::PATCH, path).json(body).send().await?;
        Self::parse(resp).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let resp = self.request(Method::DELETE, path).send().await?;
        Self::parse(resp).await
    }

    pub async fn delete_query<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.request(Method::DELETE, path).query(query).send().await?;
        Self::parse(resp).await
    }

    /// DELETE where the success body (204) is ignored.
    pub async fn delete_empty(&self, path: &str) -> Result<()> {
        let resp = self.request(Method::DELETE, path).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}
