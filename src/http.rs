//! HTTP transport for the remote library-management API
//!
//! Thin wrapper over `reqwest`: attaches the bearer token, unwraps the
//! `{ "result": ... }` envelope and maps error bodies onto [`AppError`].
//! Token refresh is NOT handled here; callers go through
//! [`crate::auth::AuthSession`] first.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::store::TokenStore;
use crate::error::{AppError, AppResult};

pub struct HttpService {
    client: Client,
    base_url: String,
    store: Arc<TokenStore>,
}

impl HttpService {
    pub fn new(endpoint: &str, timeout_secs: u64, store: Arc<TokenStore>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.store.access() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// POST without authentication (login, refresh, registration).
    pub async fn post_anon<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> AppResult<T> {
        let response = self.authed(Method::GET, path).query(query).send().await?;
        decode(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.authed(Method::POST, path).json(body).send().await?;
        decode(response).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.authed(Method::PUT, path).json(body).send().await?;
        decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.authed(Method::DELETE, path).send().await?;
        decode(response).await
    }
}

/// Unwrap the success envelope or map the error body onto [`AppError`],
/// keeping the server's `message` verbatim when it sent one.
async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    if status.is_success() {
        let envelope: crate::models::HttpResponse<T> = response.json().await?;
        return Ok(envelope.result);
    }

    let message = response
        .json::<crate::models::ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| default_message(status));

    tracing::warn!(status = %status, "API request rejected: {}", message);
    Err(AppError::ServerRejection {
        status: status.as_u16(),
        message,
    })
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
