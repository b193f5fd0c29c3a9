//! Fetch, decode, filter and render, reached through three asynchronous
//! idioms.
//!
//! All three orchestrators share [`Pipeline`]'s decode and presentation
//! steps and differ only in how they wait for the fetch:
//!
//! - [`Pipeline::fetch_with_callbacks`] spawns the fetch and hands the
//!   result to success/failure continuations.
//! - [`Pipeline::fetch_with_promises`] chains combinators on the fetch future.
//! - [`Pipeline::fetch_with_async_await`] awaits each step in sequence.

use std::fmt::Display;
use std::sync::Arc;

use futures::future::{self, TryFutureExt};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::decode::decode_records;
use crate::filter::efficient;
use crate::render;
use crate::source::DataSource;
use crate::target::RenderTarget;
use crate::types::{CarRecord, DecodePolicy, FetchError, FetchMethod, FetchResult, Outcome};

/// One data source wired to one render target.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn DataSource>,
    policy: DecodePolicy,
    target: RenderTarget,
}

impl Pipeline {
    pub fn new(source: Arc<dyn DataSource>, target: RenderTarget) -> Self {
        Self {
            source,
            policy: DecodePolicy::default(),
            target,
        }
    }

    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// Fetch and decode without touching the target.
    pub async fn load(&self) -> FetchResult<Vec<CarRecord>> {
        let value = self.source.fetch_car_data().await?;
        decode_records(value, self.policy)
    }

    /// Write the result of a fetch to the target.
    pub fn present(&self, result: FetchResult<Vec<CarRecord>>, method: FetchMethod) -> Outcome {
        match result {
            Ok(records) => self.present_records(&records, method),
            Err(e) => self.present_failure(&e),
        }
    }

    /// Run the orchestrator for `method`.
    pub async fn run(&self, method: FetchMethod) -> Outcome {
        match method {
            FetchMethod::Callback => match self.fetch_with_callbacks().await {
                Ok(outcome) => outcome,
                Err(e) => self.present_failure(&e),
            },
            FetchMethod::Promise => self.fetch_with_promises().await,
            FetchMethod::AsyncAwait => self.fetch_with_async_await().await,
        }
    }

    /// Spawn the fetch and register continuations for both outcomes.
    ///
    /// The continuations run on the spawned task and write the target
    /// directly; the handle resolves once they have.
    pub fn fetch_with_callbacks(&self) -> JoinHandle<Outcome> {
        self.announce(FetchMethod::Callback);

        let on_success = {
            let pipeline = self.clone();
            move |value: Value| {
                decode_records(value, pipeline.policy)
                    .map(|records| pipeline.present_records(&records, FetchMethod::Callback))
            }
        };
        let on_failure = {
            let pipeline = self.clone();
            move |error: FetchError| pipeline.present_failure(&error)
        };

        fetch_car_data_then(Arc::clone(&self.source), on_success, on_failure)
    }

    /// Chain decoding and presentation onto the fetch future.
    pub async fn fetch_with_promises(&self) -> Outcome {
        self.announce(FetchMethod::Promise);

        let policy = self.policy;
        self.source
            .fetch_car_data()
            .and_then(|value| future::ready(decode_records(value, policy)))
            .map_ok(|records| self.present_records(&records, FetchMethod::Promise))
            .unwrap_or_else(|error| self.present_failure(&error))
            .await
    }

    /// Await each step in turn.
    pub async fn fetch_with_async_await(&self) -> Outcome {
        self.announce(FetchMethod::AsyncAwait);

        match self.load().await {
            Ok(records) => self.present_records(&records, FetchMethod::AsyncAwait),
            Err(error) => self.present_failure(&error),
        }
    }

    fn announce(&self, method: FetchMethod) {
        tracing::info!("Fetching {} using {method}", self.source.location());
    }

    fn present_records(&self, records: &[CarRecord], method: FetchMethod) -> Outcome {
        let rows = render::show(&self.target, efficient(records), method);
        tracing::info!(
            "{method}: {rows} of {} cars above the MPG threshold",
            records.len()
        );
        Outcome::Rendered { rows }
    }

    fn present_failure(&self, error: &dyn Display) -> Outcome {
        tracing::error!("Error fetching data: {error}");
        render::show_error(&self.target, error);
        Outcome::Failed {
            message: error.to_string(),
        }
    }
}

/// Fetch on a spawned task, then call `on_success` with the parsed value or
/// `on_failure` with the error.
///
/// An error returned by `on_success` is routed to `on_failure` as well, so a
/// failure anywhere in the chain ends up in the same place.
pub fn fetch_car_data_then<T, S, F>(
    source: Arc<dyn DataSource>,
    on_success: S,
    on_failure: F,
) -> JoinHandle<T>
where
    T: Send + 'static,
    S: FnOnce(Value) -> FetchResult<T> + Send + 'static,
    F: FnOnce(FetchError) -> T + Send + 'static,
{
    tokio::spawn(async move {
        match source.fetch_car_data().await.and_then(on_success) {
            Ok(value) => value,
            Err(error) => on_failure(error),
        }
    })
}
