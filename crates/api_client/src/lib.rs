use http::Method;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use veery_database::{
    common::SiteStats,
    error::{BackendError, BackendResult},
};

pub mod comment;
pub mod post;
pub mod user;

/// Typed client for the HTTP API. Keeps the auth cookie from login or
/// registration in an internal cookie store, so one client represents one
/// logged in user.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    pub hostname: String,
}

impl ApiClient {
    pub fn new(hostname: String) -> BackendResult<Self> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client, hostname })
    }

    pub async fn site_stats(&self) -> BackendResult<SiteStats> {
        self.get("/api/v1/site/stats", None::<()>).await
    }

    async fn get<T, R>(&self, endpoint: &str, query: Option<R>) -> BackendResult<T>
    where
        T: for<'de> Deserialize<'de>,
        R: Serialize + Debug,
    {
        self.send(Method::GET, endpoint, query).await
    }

    async fn post<T, R>(&self, endpoint: &str, params: Option<R>) -> BackendResult<T>
    where
        T: for<'de> Deserialize<'de>,
        R: Serialize + Debug,
    {
        self.send(Method::POST, endpoint, params).await
    }

    async fn delete<T>(&self, endpoint: &str) -> BackendResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.send(Method::DELETE, endpoint, None::<()>).await
    }

    async fn send<P, T>(&self, method: Method, path: &str, params: Option<P>) -> BackendResult<T>
    where
        P: Serialize + Debug,
        T: for<'de> Deserialize<'de>,
    {
        debug!("{method} {path} {params:?}");
        let mut req = self
            .client
            .request(method.clone(), format!("http://{}{path}", self.hostname));
        req = if method == Method::GET {
            req.query(&params)
        } else {
            req.json(&params)
        };
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&text)
                .map_err(|e| anyhow::anyhow!("Json error on {text}: {e}"))?)
        } else {
            Err(BackendError {
                kind: status_to_kind(status),
                inner: anyhow::anyhow!("API error: {text}"),
            })
        }
    }
}

fn status_to_kind(status: http::StatusCode) -> veery_database::error::ErrorKind {
    use veery_database::error::ErrorKind::*;
    match status.as_u16() {
        404 => NotFound,
        400 | 401 | 403 => InvalidArgument,
        503 => ConflictOrTransient,
        _ => Internal,
    }
}
