//! Utility helpers shared by built-in tools.

use friday_rs_protocol::ToolError;
use log::warn;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

/// Parse JSON args into a typed struct for tool calls.
pub(super) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

/// Decode a derived argument schema, falling back to an open object.
pub(super) fn schema_of(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        warn!("invalid tool argument schema: {err}");
        json!({ "type": "object", "properties": {} })
    })
}

/// Schema for capabilities that take no arguments.
pub(super) fn no_args_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Pluralize a count: `1 click`, `2 clicks`.
pub(super) fn plural(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientBool {
    Bool(bool),
    Text(String),
}

fn number_to_i64<E: serde::de::Error>(value: LenientNumber) -> Result<i64, E> {
    match value {
        LenientNumber::Int(value) => Ok(value),
        LenientNumber::Float(value) if value.fract() == 0.0 && value.is_finite() => {
            Ok(value as i64)
        }
        LenientNumber::Float(value) => Err(E::custom(format!("invalid integer '{value}'"))),
        LenientNumber::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("invalid integer '{text}'"))),
    }
}

fn number_to_f64<E: serde::de::Error>(value: LenientNumber) -> Result<f64, E> {
    match value {
        LenientNumber::Int(value) => Ok(value as f64),
        LenientNumber::Float(value) => Ok(value),
        LenientNumber::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid number '{text}'"))),
    }
}

/// Accept an integer natively or as a string such as `"42"`.
pub(super) fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    number_to_i64(LenientNumber::deserialize(deserializer)?)
}

/// Optional variant of [`lenient_int`]; `null` and `""` are absent.
pub(super) fn lenient_opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LenientNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LenientNumber::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => number_to_i64(value).map(Some),
    }
}

/// Accept a number natively or as a string such as `"0.5"`.
pub(super) fn lenient_float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    number_to_f64(LenientNumber::deserialize(deserializer)?)
}

/// Accept a boolean natively or as `"true"`/`"false"` (also `yes`/`no`, `1`/`0`).
pub(super) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientBool::deserialize(deserializer)? {
        LenientBool::Bool(value) => Ok(value),
        LenientBool::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(D::Error::custom(format!("invalid boolean '{text}'"))),
        },
    }
}
