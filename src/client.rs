use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiClientError, ApiError};
use crate::token::TokenStore;

/// HTTP client for the task backend. Cheap to clone; clones share the
/// connection pool and the token store.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    pub(crate) tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiClientError> {
        let http = Client::builder().build().map_err(ApiClientError::Network)?;
        Ok(Self {
            http,
            base_url: config.base_url,
            tokens,
        })
    }

    pub fn from_env(tokens: Arc<dyn TokenStore>) -> Result<Self, ApiClientError> {
        Self::new(ApiConfig::from_env(), tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// True when a token is on hand. Says nothing about whether the
    /// backend still accepts it; a 401 on the next request settles that.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.get().is_some()
    }

    fn request(&self, method: Method, path: &str, include_auth: bool) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        // Missing token is not an error: the request simply goes out
        // unauthenticated and the backend decides.
        if include_auth {
            if let Some(token) = self.tokens.get() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }
        }
        request
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiClientError> {
        let response = request.send().await?;
        handle_response(response).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        include_auth: bool,
    ) -> Result<T, ApiClientError> {
        let value = self.send(self.request(Method::GET, path, include_auth)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        include_auth: bool,
    ) -> Result<T, ApiClientError> {
        let request = self.request(Method::GET, path, include_auth).query(query);
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        include_auth: bool,
    ) -> Result<T, ApiClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, include_auth).json(body);
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn put<B, T>(
        &self,
        path: &str,
        body: &B,
        include_auth: bool,
    ) -> Result<T, ApiClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path, include_auth).json(body);
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Bodyless PATCH, the shape every current backend endpoint uses.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        include_auth: bool,
    ) -> Result<T, ApiClientError> {
        let value = self.send(self.request(Method::PATCH, path, include_auth)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn patch_json<B, T>(
        &self,
        path: &str,
        body: &B,
        include_auth: bool,
    ) -> Result<T, ApiClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, path, include_auth).json(body);
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        include_auth: bool,
    ) -> Result<T, ApiClientError> {
        let value = self.send(self.request(Method::DELETE, path, include_auth)).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Single funnel every response goes through. Success with a JSON body
/// yields that body; success without one yields an empty object so
/// callers expecting nothing still decode. Failures become
/// [`ApiClientError::Status`] with the most specific payload available.
async fn handle_response(response: Response) -> Result<Value, ApiClientError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);

    let text = response.text().await?;

    if !status.is_success() {
        let error = if is_json {
            parse_error_body(&text, status)
        } else {
            ApiError::unknown(status)
        };
        warn!("request failed with {}: {}", status, error);
        return Err(ApiClientError::Status { status, error });
    }

    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(Value::Object(serde_json::Map::new()))
    }
}

/// The backend wraps errors in `{"detail": {...}}` for HTTP-level failures
/// and returns the payload bare everywhere else; accept both. Bodies that
/// fit neither shape fall back to the synthesized unknown error.
fn parse_error_body(text: &str, status: StatusCode) -> ApiError {
    let Ok(body) = serde_json::from_str::<Value>(text) else {
        return ApiError::unknown(status);
    };
    let payload = match body.get("detail") {
        Some(detail) if detail.is_object() => detail.clone(),
        _ => body,
    };
    serde_json::from_value(payload).unwrap_or_else(|_| ApiError::unknown(status))
}
