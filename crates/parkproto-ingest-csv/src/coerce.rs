//! Raw cell text -> typed JSON values.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use parkproto_document::{format_timestamp, Day};
use parkproto_schema::{SchemaTable, TagKind};
use serde_json::{Number, Value};

/// List tags whose elements are day tokens.
const DAY_TAGS: &[&str] = &["days", "validDays"];

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Converts `raw` to the JSON value `tag` expects.
///
/// Anything that does not parse for its kind is kept as trimmed text, so the
/// document writer still sees the original cell.
pub fn coerce(schema: &SchemaTable, tag: &str, raw: &str) -> Value {
    let raw = raw.trim();
    let coerced = match schema.kind(tag) {
        TagKind::Boolean => parse_bool(raw).map(Value::Bool),
        TagKind::Timestamp => parse_timestamp(raw).map(Value::String),
        TagKind::List if DAY_TAGS.contains(&tag) => Day::from_str(raw)
            .ok()
            .map(|day| Value::String(day.as_str().to_string())),
        _ => parse_number(raw),
    };
    coerced.unwrap_or_else(|| Value::String(raw.to_string()))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// RFC 3339 keeps its offset; naive dates and times are read as local time.
fn parse_timestamp(raw: &str) -> Option<String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(format_timestamp(&at));
    }
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| format_timestamp(&at))
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
}
