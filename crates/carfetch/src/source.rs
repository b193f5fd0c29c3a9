//! Where the car data comes from.
//!
//! [`HttpDataSource`] issues one GET for `mtcars.json` relative to a base URL.
//! [`StaticDataSource`] hands back a fixed body and is what tests and
//! embedders use when no server is around.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::types::{FetchError, FetchResult};

/// Path of the dataset, relative to the base URL.
pub const RESOURCE_PATH: &str = "mtcars.json";

/// The 32-car dataset shipped with the crate.
pub const BUNDLED_MTCARS: &str = include_str!("../data/mtcars.json");

/// A source of the raw car dataset.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Retrieve and parse the dataset.
    async fn fetch_car_data(&self) -> FetchResult<Value>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Fetches the dataset over HTTP.
///
/// The base is only parsed when fetching, so a malformed base surfaces as a
/// fetch failure like any other.
#[derive(Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
    base: String,
}

impl HttpDataSource {
    /// Fetch [`RESOURCE_PATH`] relative to `base`.
    pub fn from_base(base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, base: &str) -> Self {
        Self {
            client,
            base: base.to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve [`RESOURCE_PATH`] against the base the way a page resolves a
    /// relative fetch: `http://host/app/` becomes `http://host/app/mtcars.json`
    /// and `http://host/app/index.html` becomes the same.
    pub fn resource_url(&self) -> FetchResult<Url> {
        Ok(Url::parse(&self.base)?.join(RESOURCE_PATH)?)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_car_data(&self) -> FetchResult<Value> {
        let url = self.resource_url()?;
        tracing::debug!("GET {url}");

        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        tracing::debug!("{url} responded {}", status.as_u16());

        // Never look at the body of a failed response.
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn location(&self) -> String {
        match self.resource_url() {
            Ok(url) => url.to_string(),
            Err(_) => self.base.clone(),
        }
    }
}

/// Serves a fixed body, parsed on every fetch.
#[derive(Debug, Clone)]
pub struct StaticDataSource {
    body: String,
}

impl StaticDataSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// The bundled mtcars dataset.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_MTCARS)
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch_car_data(&self) -> FetchResult<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    fn location(&self) -> String {
        "static".to_string()
    }
}
