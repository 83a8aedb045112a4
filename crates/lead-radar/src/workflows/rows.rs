//! Field readers over untyped backend rows.

use super::crm::LeadDate;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub(crate) type Row = Map<String, Value>;

/// First alias present with a non-null value.
pub(crate) fn lookup<'a>(row: &'a Row, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .find(|value| !value.is_null())
}

/// Non-empty trimmed string; numbers are rendered so numeric ids survive.
pub(crate) fn text(row: &Row, aliases: &[&str]) -> Option<String> {
    match lookup(row, aliases)? {
        Value::String(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Finite number from a JSON number or a numeric string.
pub(crate) fn number(row: &Row, aliases: &[&str]) -> Option<f64> {
    let value = match lookup(row, aliases)? {
        Value::Number(number) => number.as_f64()?,
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

pub(crate) fn flag(row: &Row, aliases: &[&str]) -> Option<bool> {
    match lookup(row, aliases)? {
        Value::Bool(value) => Some(*value),
        Value::String(raw) => parse_flag(raw),
        Value::Number(number) => number.as_i64().map(|value| value != 0),
        _ => None,
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "sim" => Some(true),
        "false" | "f" | "0" | "no" | "nao" => Some(false),
        _ => None,
    }
}

pub(crate) fn date(row: &Row, aliases: &[&str]) -> Option<LeadDate> {
    match lookup(row, aliases)? {
        Value::String(raw) => LeadDate::parse(raw),
        _ => None,
    }
}

/// String set from a JSON array or a comma separated string; blanks are skipped.
pub(crate) fn string_set(row: &Row, aliases: &[&str]) -> BTreeSet<String> {
    match lookup(row, aliases) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(raw)) => split_list(raw, ','),
        _ => BTreeSet::new(),
    }
}

pub(crate) fn split_list(raw: &str, separator: char) -> BTreeSet<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
