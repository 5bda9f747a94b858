//! # Boundary Coercions
//!
//! Form state reaches the pricing engine half-typed: numbers typed as
//! strings, flags as `"true"`, blank inputs as `null`. This module is the
//! single place where those loose values are normalised. Nothing past this
//! boundary deals with strings or missing values.
//!
//! ## Coercion Table
//! ```text
//! ┌──────────────────────┬──────────────┬──────────────┬───────────────┐
//! │ JSON input           │ to_bool      │ decimal      │ integer       │
//! ├──────────────────────┼──────────────┼──────────────┼───────────────┤
//! │ true / "true"        │ true         │ 0            │ 0             │
//! │ false / "false"      │ false        │ 0            │ 0             │
//! │ 12.5                 │ false        │ 12.5         │ 12            │
//! │ "12.5"               │ false        │ 12.5         │ 12            │
//! │ "12abc"              │ false        │ 0            │ 12            │
//! │ null / missing / []  │ false        │ 0            │ 0             │
//! └──────────────────────┴──────────────┴──────────────┴───────────────┘
//! ```
//!
//! Non-numeric input becomes zero. Decimals have no NaN, so a blank field
//! prices as zero instead of poisoning the whole document.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Normalises a loosely typed flag: only `true` and `"true"` are truthy.
///
/// ## Example
/// ```rust
/// use ledgerly_core::lenient::to_bool;
/// use serde_json::json;
///
/// assert!(to_bool(&json!(true)));
/// assert!(to_bool(&json!("true")));
/// assert!(!to_bool(&json!("false")));
/// assert!(!to_bool(&json!(1)));
/// ```
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text == "true",
        _ => false,
    }
}

/// Parses decimal text, accepting plain and scientific notation.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Coerces a JSON value to a decimal, zero when it is not numeric.
pub fn to_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()).unwrap_or_default(),
        Value::String(text) => parse_decimal(text).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

/// Coerces a JSON value to an integer the way integer parsing of form
/// input behaves: fractions truncate, leading digits of a string win.
///
/// ## Example
/// ```rust
/// use ledgerly_core::lenient::to_integer;
/// use serde_json::json;
///
/// assert_eq!(to_integer(&json!(3.7)), 3);
/// assert_eq!(to_integer(&json!(" 12abc")), 12);
/// assert_eq!(to_integer(&json!("-4")), -4);
/// assert_eq!(to_integer(&json!("abc")), 0);
/// ```
pub fn to_integer(value: &Value) -> i64 {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(int) => int,
            // `as` saturates and maps NaN to zero
            None => number.as_f64().map(|f| f.trunc() as i64).unwrap_or_default(),
        },
        Value::String(text) => leading_integer(text),
        _ => 0,
    }
}

fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

// =============================================================================
// Serde Adapters
// =============================================================================

/// Lenient `#[serde(with = "...")]` adapter for `Decimal` fields.
///
/// Writes a JSON number, reads anything [`to_decimal`] accepts.
pub mod decimal {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(to_decimal(&value))
    }
}

/// Lenient adapter for integer quantities, see [`to_integer`].
pub mod integer {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(to_integer(&value))
    }
}

/// Lenient adapter for boolean flags, see [`to_bool`].
pub mod flag {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(to_bool(&value))
    }
}

/// Lenient adapter for opaque text ids: numbers are stringified, anything
/// else that is not a string becomes empty.
pub mod text {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            _ => String::new(),
        })
    }
}

/// Reads a list where a non-list (or `null` entries) may appear.
///
/// Non-arrays become an empty list and entries that fail to deserialize are
/// dropped, which prices the same as a zero-valued row.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter(|entry| !entry.is_null())
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================
