//! Resource service contract and its HTTP implementation
//!
//! The engine depends only on this trait; resource pages get an
//! [`HttpResourceService`] bound to their collection path. Every call goes
//! through the session first so the access token is usable (refreshing at
//! most once) before the request leaves.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::auth::AuthSession;
use crate::error::AppResult;
use crate::http::HttpService;
use crate::models::PagedResult;

use super::{FormValues, Row};

/// Listing query: filter values merged verbatim, plus pagination.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: FormValues,
    pub page: i64,
    pub page_size: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: FormValues::new(),
            page: 1,
            page_size: 10,
        }
    }
}

impl ListQuery {
    /// Flatten into request query parameters. Null filter values are
    /// dropped; arrays repeat the key per element.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for (name, value) in &self.filter {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        params.push((name.clone(), scalar_param(item)));
                    }
                }
                other => params.push((name.clone(), scalar_param(other))),
            }
        }
        params.push(("page".to_string(), self.page.to_string()));
        params.push(("pageSize".to_string(), self.page_size.to_string()));
        params
    }
}

fn scalar_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The abstraction the CRUD engine depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceService: Send + Sync {
    async fn list(&self, query: &ListQuery) -> AppResult<PagedResult<Row>>;
    async fn create(&self, values: &FormValues) -> AppResult<Row>;
    async fn update(&self, id: i64, values: &FormValues) -> AppResult<Row>;
    async fn delete(&self, id: i64) -> AppResult<()>;
    async fn delete_many(&self, ids: &[i64]) -> AppResult<()>;
}

/// `ResourceService` over the remote API's generic per-resource endpoints.
pub struct HttpResourceService {
    session: Arc<AuthSession>,
    http: Arc<HttpService>,
    path: &'static str,
}

impl HttpResourceService {
    pub fn new(session: Arc<AuthSession>, http: Arc<HttpService>, path: &'static str) -> Self {
        Self {
            session,
            http,
            path,
        }
    }
}

#[async_trait]
impl ResourceService for HttpResourceService {
    async fn list(&self, query: &ListQuery) -> AppResult<PagedResult<Row>> {
        self.session.ensure_access().await?;
        self.http.get(self.path, &query.to_params()).await
    }

    async fn create(&self, values: &FormValues) -> AppResult<Row> {
        self.session.ensure_access().await?;
        self.http.post(self.path, values).await
    }

    async fn update(&self, id: i64, values: &FormValues) -> AppResult<Row> {
        self.session.ensure_access().await?;
        self.http
            .put(&format!("{}/{}", self.path, id), values)
            .await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.session.ensure_access().await?;
        let _: Option<Value> = self.http.delete(&format!("{}/{}", self.path, id)).await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[i64]) -> AppResult<()> {
        self.session.ensure_access().await?;
        let _: Option<Value> = self
            .http
            .post(&format!("{}/batchDelete", self.path), &json!({ "ids": ids }))
            .await?;
        Ok(())
    }
}
