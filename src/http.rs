use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::API_KEY_HEADER;
use crate::error::{Error, Result};

/// Query parameters as produced by the `to_query_params` helpers
pub(crate) type Query<'a> = [(&'a str, String)];

/// Internal HTTP client shared by every endpoint wrapper of one API surface
///
/// Builds requests against a fixed base URL with JSON headers and the optional
/// API key, and classifies responses into decoded payloads or [`Error`]s.
#[derive(Debug)]
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
    headers: RwLock<HeaderMap>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            client,
            headers: RwLock::new(build_headers(api_key)?),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the API key used by subsequent requests
    ///
    /// Requests that were already built keep the headers they were built with.
    pub fn set_api_key(&self, api_key: &str) -> Result<()> {
        let headers = build_headers(Some(api_key))?;
        *self.headers.write().unwrap_or_else(|e| e.into_inner()) = headers;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn current_headers(&self) -> HeaderMap {
        self.headers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Build a GET request; only the supplied (present) parameters are serialized
    pub fn build_get(&self, path: &str, query: &Query<'_>) -> Result<Request> {
        let mut builder = self
            .client
            .request(Method::GET, self.url(path))
            .headers(self.current_headers());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        Ok(builder.build()?)
    }

    /// Build a POST request with a JSON body
    pub fn build_post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Request> {
        let body = serde_json::to_vec(body)?;
        Ok(self
            .client
            .request(Method::POST, self.url(path))
            .headers(self.current_headers())
            .body(body)
            .build()?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query<'_>) -> Result<T> {
        let request = self.build_get(path, query)?;
        self.execute(request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_post(path, body)?;
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");
        parse_response(status, &body)
    }
}

fn build_headers(api_key: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        let value = HeaderValue::from_str(key)
            .map_err(|e| Error::Config(format!("invalid API key header value: {}", e)))?;
        headers.insert(API_KEY_HEADER, value);
    }
    Ok(headers)
}

/// Classify a raw response into a decoded payload or a typed error
pub(crate) fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    if !status.is_success() {
        let parsed = if body.is_empty() {
            None
        } else {
            Some(serde_json::from_slice::<serde_json::Value>(body).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(body).into_owned())
            }))
        };
        return Err(Error::Api {
            status: status.as_u16(),
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            body: parsed,
        });
    }

    serde_json::from_slice(body).map_err(|source| Error::Decode {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
        source,
    })
}
