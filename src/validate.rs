//! Value validation and strict-mode unknown-key detection.
//!
//! [`validate_value`] checks a typed value against a parameter's allowed
//! values or allowed range. It runs after every successful coercion and on
//! every [`ParameterStore::set`](crate::ParameterStore::set).
//!
//! [`validate_unknown_keys`] reports config-file entries that no parameter
//! is bound to, with their file path and line.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ParamfigError;
use crate::file::ConffileEntry;
use crate::param::{Constraint, ParameterSpec};
use crate::types::Value;

/// Check `value` against the constraint declared on `spec`, if any.
pub fn validate_value(value: &Value, spec: &ParameterSpec) -> Result<(), ParamfigError> {
    let Some(constraint) = spec.constraint() else {
        return Ok(());
    };
    let allowed = match constraint {
        Constraint::Values(values) => values.contains(value),
        Constraint::Range { min, max } => value.as_int().is_some_and(|i| *min <= i && i <= *max),
        Constraint::Both { .. } => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(ParamfigError::Validation {
            key: spec.name().to_string(),
            value: value.clone(),
            reason: format!("must be {constraint}"),
        })
    }
}

/// Reject config-file entries whose name is not in `known`.
///
/// Every unknown entry is reported, not just the first.
pub fn validate_unknown_keys(
    entries: &[ConffileEntry],
    known: &HashSet<&str>,
    path: &Path,
) -> Result<(), ParamfigError> {
    let errors: Vec<ParamfigError> = entries
        .iter()
        .filter(|entry| !known.contains(entry.name.as_str()))
        .map(|entry| ParamfigError::UnknownKey {
            key: entry.name.clone(),
            path: path.to_path_buf(),
            line: entry.line,
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ParamfigError::UnknownKeys(errors))
    }
}
