//! Core data types for car records, fetch methods, and failures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One vehicle from the mtcars dataset.
///
/// Only `model`, `mpg`, `cyl` and `hp` are rendered. Every other field is
/// carried through untouched in `extra`. The four rendered fields are
/// optional so the lenient decode policy can represent a record with holes;
/// the strict policy rejects such records before they get this far.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CarRecord {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub mpg: Option<Number>,
    #[serde(default)]
    pub cyl: Option<Number>,
    #[serde(default)]
    pub hp: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CarRecord {
    /// Build a fully populated record.
    pub fn new(model: &str, mpg: f64, cyl: u64, hp: u64) -> Self {
        Self {
            model: Some(model.to_string()),
            mpg: Number::from_f64(mpg),
            cyl: Some(Number::from(cyl)),
            hp: Some(Number::from(hp)),
            extra: Map::new(),
        }
    }

    /// Fuel efficiency as a float, if present.
    pub fn mpg_value(&self) -> Option<f64> {
        self.mpg.as_ref().and_then(Number::as_f64)
    }

    /// Names of the rendered fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.model.is_none() {
            missing.push("model");
        }
        if self.mpg.is_none() {
            missing.push("mpg");
        }
        if self.cyl.is_none() {
            missing.push("cyl");
        }
        if self.hp.is_none() {
            missing.push("hp");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// The asynchronous idiom an orchestrator used to obtain the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMethod {
    /// Completion continuation registered on a spawned fetch.
    Callback,
    /// Combinator chain on the fetch future.
    Promise,
    /// Sequential `async`/`await`.
    AsyncAwait,
}

impl FetchMethod {
    pub const ALL: [FetchMethod; 3] = [
        FetchMethod::Callback,
        FetchMethod::Promise,
        FetchMethod::AsyncAwait,
    ];

    /// Label shown in the rendered heading.
    pub fn label(self) -> &'static str {
        match self {
            FetchMethod::Callback => "Callback",
            FetchMethod::Promise => "Promise",
            FetchMethod::AsyncAwait => "Async/Await",
        }
    }
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FetchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "callback" | "callbacks" => Ok(FetchMethod::Callback),
            "promise" | "promises" => Ok(FetchMethod::Promise),
            "async" | "await" | "async-await" | "async/await" => Ok(FetchMethod::AsyncAwait),
            other => Err(format!(
                "unknown fetch method '{other}' (expected callback, promise or async)"
            )),
        }
    }
}

/// How malformed individual records are treated during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Any malformed record fails the whole batch.
    #[default]
    Strict,
    /// Malformed records are dropped with a warning.
    Skip,
    /// Missing fields are tolerated and render as empty cells.
    Lenient,
}

impl DecodePolicy {
    pub fn name(self) -> &'static str {
        match self {
            DecodePolicy::Strict => "strict",
            DecodePolicy::Skip => "skip",
            DecodePolicy::Lenient => "lenient",
        }
    }
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DecodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(DecodePolicy::Strict),
            "skip" => Ok(DecodePolicy::Skip),
            "lenient" => Ok(DecodePolicy::Lenient),
            other => Err(format!(
                "unknown decode policy '{other}' (expected strict, skip or lenient)"
            )),
        }
    }
}

/// What an orchestrator left in the render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A heading plus either a table of `rows` cars or the no-results notice.
    Rendered { rows: usize },
    /// The error paragraph carrying `message`.
    Failed { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Rendered { .. })
    }
}

/// Errors that can occur while fetching and decoding car data.
///
/// Presentation only ever uses the `Display` message, so transport and
/// response failures look the same downstream.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP Error! Status: {0}")]
    Status(u16),

    #[error("Malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid resource URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Expected a sequence of car records, found {0}")]
    NotASequence(&'static str),

    #[error("Record {index} is malformed: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Convenience result type.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_labels() {
        assert_eq!(FetchMethod::Callback.label(), "Callback");
        assert_eq!(FetchMethod::Promise.label(), "Promise");
        assert_eq!(FetchMethod::AsyncAwait.label(), "Async/Await");
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("callback".parse::<FetchMethod>(), Ok(FetchMethod::Callback));
        assert_eq!("Promise".parse::<FetchMethod>(), Ok(FetchMethod::Promise));
        assert_eq!("async".parse::<FetchMethod>(), Ok(FetchMethod::AsyncAwait));
        assert_eq!("Async/Await".parse::<FetchMethod>(), Ok(FetchMethod::AsyncAwait));
        assert!("xhr".parse::<FetchMethod>().is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("STRICT".parse::<DecodePolicy>(), Ok(DecodePolicy::Strict));
        assert_eq!("skip".parse::<DecodePolicy>(), Ok(DecodePolicy::Skip));
        assert_eq!("lenient".parse::<DecodePolicy>(), Ok(DecodePolicy::Lenient));
        assert!("loose".parse::<DecodePolicy>().is_err());
        assert_eq!(DecodePolicy::default(), DecodePolicy::Strict);
    }

    #[test]
    fn test_status_message() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP Error! Status: 404");
        assert_eq!(FetchError::Status(500).to_string(), "HTTP Error! Status: 500");
    }

    #[test]
    fn test_record_extras_survive_deserialize() {
        let record: CarRecord = serde_json::from_str(
            r#"{"model":"Valiant","mpg":18.1,"cyl":6,"hp":105,"gear":3}"#,
        )
        .unwrap();
        assert!(record.is_complete());
        assert_eq!(record.extra.get("gear"), Some(&Value::from(3)));
        assert_eq!(record.mpg_value(), Some(18.1));
    }

    #[test]
    fn test_missing_fields() {
        let record: CarRecord = serde_json::from_str(r#"{"model":"Ghost","cyl":null}"#).unwrap();
        assert_eq!(record.missing_fields(), vec!["mpg", "cyl", "hp"]);
        assert!(!record.is_complete());
    }
}
