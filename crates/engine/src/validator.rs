//! Response validator: structural checks on the raw homework API payload.
//!
//! Nothing downstream reads a field that has not passed through here. The
//! checks are pure: no I/O, no logging of payload contents beyond the error
//! value itself.

use serde_json::{Map, Value};

use homework_common::error::ShapeError;
use homework_common::types::{PollResponse, Submission, Verdict, json_kind};

const HOMEWORKS: &str = "homeworks";
const CURRENT_DATE: &str = "current_date";
const HOMEWORK_NAME: &str = "homework_name";
const STATUS: &str = "status";

const RESPONSE: &str = "ответе API";
const ITEM: &str = "\"homeworks\"";

/// Validate the top-level payload: a mapping with a `homeworks` array and an
/// integer `current_date`.
pub fn validate(raw: Value) -> Result<PollResponse, ShapeError> {
    let mut map = match raw {
        Value::Object(map) => map,
        other => {
            return Err(ShapeError::NotAMapping {
                context: RESPONSE,
                observed: json_kind(&other),
            });
        }
    };

    if !map.contains_key(HOMEWORKS) {
        return Err(missing_key(&map, HOMEWORKS, RESPONSE));
    }
    let current_date = field(&map, CURRENT_DATE, RESPONSE)?.clone();

    let homeworks = match map.remove(HOMEWORKS) {
        Some(Value::Array(items)) => items,
        other => {
            return Err(ShapeError::WrongType {
                key: HOMEWORKS,
                expected: "array",
                observed: other.as_ref().map_or("null", json_kind),
            });
        }
    };
    let cursor = current_date.as_i64().ok_or(ShapeError::WrongType {
        key: CURRENT_DATE,
        expected: "integer",
        observed: json_kind(&current_date),
    })?;

    Ok(PollResponse { homeworks, cursor })
}

/// Validate one element of `homeworks`: a mapping with `homework_name` and a
/// `status` from the closed verdict set.
pub fn validate_submission(item: &Value) -> Result<Submission, ShapeError> {
    let map = item.as_object().ok_or(ShapeError::NotAMapping {
        context: ITEM,
        observed: json_kind(item),
    })?;

    let name = field(map, HOMEWORK_NAME, ITEM)?;
    let status = field(map, STATUS, ITEM)?;

    let name = as_string(name, HOMEWORK_NAME)?;
    let status_key = as_string(status, STATUS)?;
    let status = Verdict::from_key(status_key)
        .ok_or_else(|| ShapeError::UnknownStatus(status_key.to_string()))?;

    Ok(Submission {
        name: name.to_string(),
        status,
    })
}

fn field<'a>(
    map: &'a Map<String, Value>,
    key: &'static str,
    context: &'static str,
) -> Result<&'a Value, ShapeError> {
    map.get(key).ok_or_else(|| missing_key(map, key, context))
}

/// Most keys listed in a missing-key diagnostic.
const MAX_LISTED_KEYS: usize = 20;

fn missing_key(map: &Map<String, Value>, key: &'static str, context: &'static str) -> ShapeError {
    let mut present: Vec<&str> = map
        .keys()
        .take(MAX_LISTED_KEYS)
        .map(|k| truncate(k, 64))
        .collect();
    if map.len() > MAX_LISTED_KEYS {
        present.push("...");
    }
    ShapeError::MissingKey {
        context,
        key,
        present: present.join(", "),
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

fn as_string<'a>(value: &'a Value, key: &'static str) -> Result<&'a str, ShapeError> {
    value.as_str().ok_or(ShapeError::WrongType {
        key,
        expected: "string",
        observed: json_kind(value),
    })
}
