//! Configuration loading and resolution.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use carfetch::{
    DataSource, DecodePolicy, HttpDataSource, Pipeline, RenderTarget, BUNDLED_MTCARS,
};

/// Environment variable consulted when no `--base-url` is given.
pub const BASE_URL_ENV: &str = "CARFETCH_BASE_URL";

/// Where `carfetch serve` listens by default, so the two line up.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3100";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3100/";

/// Resolve the base URL the dataset is fetched relative to.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    resolve_base_url_with(explicit, std::env::var(BASE_URL_ENV).ok())
}

/// Flag first, then the environment value, then the default.
pub fn resolve_base_url_with(explicit: Option<&str>, env_value: Option<String>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Some(url) = env_value.filter(|v| !v.trim().is_empty()) {
        return url;
    }

    DEFAULT_BASE_URL.to_string()
}

/// Everything needed to build a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub policy: DecodePolicy,
}

impl Settings {
    pub fn resolve(explicit_base: Option<&str>, policy: DecodePolicy) -> Self {
        Self {
            base_url: resolve_base_url(explicit_base),
            policy,
        }
    }

    /// Build a pipeline writing into `target`.
    ///
    /// A malformed base is not rejected here; every fetch through the
    /// pipeline fails and renders the error instead.
    pub fn pipeline(&self, target: RenderTarget) -> Pipeline {
        let source = HttpDataSource::from_base(&self.base_url);
        tracing::debug!("Resource: {}", source.location());
        Pipeline::new(Arc::new(source), target).with_policy(self.policy)
    }
}

/// Load the dataset to serve: the file at `path`, or the bundled copy.
///
/// The file must at least be valid JSON.
pub fn load_dataset(path: Option<&Path>) -> anyhow::Result<String> {
    let Some(path) = path else {
        return Ok(BUNDLED_MTCARS.to_string());
    };

    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str::<serde_json::Value>(&body)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(body)
}
