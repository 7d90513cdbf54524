//! HTTP Client Wrapper over `reqwest`.
//!
//! Builds requests from an [`ApiRequest`] description and folds the response
//! status into a [`Result`]: 2xx is `Ok`, 4xx is
//! [`ClientError::ClientRejected`], 5xx is [`ClientError::ServerRejected`] and
//! transport failures are [`ClientError::NetworkFailure`]. Nothing is retried.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::session::SessionStore;

/// Description of one backend call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Skip the bearer token (login, register)
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// A response whose status was in the 2xx range
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("base URL '{}' cannot carry paths", base_url)));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL, keeping any base path prefix
    pub fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| ClientError::Config(format!("invalid request path '{}': {}", path, e)))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        Ok(url)
    }

    fn build(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder> {
        let url = self.url(&request.path, &request.query)?;
        let mut builder = self.http.request(request.method.clone(), url);

        if request.authenticated {
            match self.session.token() {
                Some(token) => builder = builder.bearer_auth(token),
                None => tracing::debug!(path = %request.path, "no session token, sending without Authorization"),
            }
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder)
    }

    /// Issue the request and return the body of a 2xx response
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let builder = self.build(&request)?;
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %request.method, path = %request.path, "transport failure: {}", e);
            ClientError::NetworkFailure(e.to_string())
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::warn!(method = %request.method, path = %request.path, status, "request rejected");
            return Err(ClientError::from_status(status));
        }

        let body = response.text().await?;
        tracing::debug!(method = %request.method, path = %request.path, status, "request succeeded");
        Ok(ApiResponse { status, body })
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig::for_base_url(base);
        ApiClient::new(&config.api, Arc::new(SessionStore::in_memory())).unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = client("http://localhost:8081/api/");
        let url = client.url("/recipes", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/api/recipes");
    }

    #[test]
    fn test_url_encodes_query() {
        let client = client("http://localhost:8081");
        let url = client
            .url("/recipes", &[("name".to_string(), "mac & cheese".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/recipes?name=mac+%26+cheese");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ClientConfig::for_base_url("not a url");
        let err = ApiClient::new(&config.api, Arc::new(SessionStore::in_memory())).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_authorization_omitted_without_token() {
        let client = client("http://localhost:8081");
        let request = client.build(&ApiRequest::get("/recipes")).unwrap().build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_authorization_sent_with_token() {
        let client = client("http://localhost:8081");
        client.session().set_session("abc123", false).unwrap();
        let request = client.build(&ApiRequest::get("/recipes")).unwrap().build().unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer abc123"
        );

        let anonymous = client
            .build(&ApiRequest::post("/login").anonymous())
            .unwrap()
            .build()
            .unwrap();
        assert!(anonymous.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
