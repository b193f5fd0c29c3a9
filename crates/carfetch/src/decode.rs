//! Decoding of fetched JSON into typed car records.

use serde_json::Value;

use crate::types::{CarRecord, DecodePolicy, FetchError, FetchResult};

/// Decode a parsed JSON document into car records.
///
/// The document must be an array. What happens to an element that does not
/// decode depends on `policy`; see [`DecodePolicy`].
pub fn decode_records(value: Value, policy: DecodePolicy) -> FetchResult<Vec<CarRecord>> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(FetchError::NotASequence(json_kind(&other))),
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        match decode_one(item, policy) {
            Ok(record) => records.push(record),
            Err(reason) if policy == DecodePolicy::Skip => {
                tracing::warn!("Skipping record {index}: {reason}");
            }
            Err(reason) => return Err(FetchError::InvalidRecord { index, reason }),
        }
    }

    tracing::debug!(
        "Decoded {} of {} records (policy: {policy})",
        records.len(),
        total
    );

    Ok(records)
}

fn decode_one(item: Value, policy: DecodePolicy) -> Result<CarRecord, String> {
    if !item.is_object() {
        return Err(format!("expected an object, found {}", json_kind(&item)));
    }

    let record: CarRecord = serde_json::from_value(item).map_err(|e| e.to_string())?;

    if policy != DecodePolicy::Lenient {
        let missing = record.missing_fields();
        if !missing.is_empty() {
            return Err(format!("missing {}", missing.join(", ")));
        }
    }

    Ok(record)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
