//! Raw string → typed value conversion.

use crate::error::ParamfigError;
use crate::types::{ParamType, Value};

const TRUTHY: [&str; 4] = ["y", "yes", "1", "true"];
const FALSY: [&str; 4] = ["n", "no", "0", "false"];

/// Convert a raw string from a config file, environment variable, or
/// command-line option into a value of type `ty`.
///
/// Strings pass through unchanged, ints are parsed base-10, and bools accept
/// `y/yes/1/true` and `n/no/0/false` in any case. `key` only labels the
/// error.
pub fn coerce(key: &str, raw: &str, ty: ParamType) -> Result<Value, ParamfigError> {
    let err = || ParamfigError::Coercion {
        key: key.to_string(),
        raw: raw.to_string(),
        expected: ty,
    };
    match ty {
        ParamType::String => Ok(Value::Str(raw.to_string())),
        ParamType::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| err()),
        ParamType::Bool => parse_bool(raw).map(Value::Bool).ok_or_else(err),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSY.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}
