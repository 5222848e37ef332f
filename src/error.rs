use std::path::PathBuf;
use thiserror::Error;

use crate::types::{ParamType, Value};

/// Inconsistencies in a schema, detected by
/// [`SchemaBuilder::build`](crate::SchemaBuilder::build) before any
/// resolution runs.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Parameter name must not be empty")]
    EmptyName,

    #[error("Invalid parameter name '{0}': names must not contain whitespace")]
    InvalidName(String),

    #[error("Parameter '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("Flag '{flag}' is bound to both '{first}' and '{second}'")]
    DuplicateFlag {
        flag: String,
        first: String,
        second: String,
    },

    #[error("Config file name '{conffile}' is bound to both '{first}' and '{second}'")]
    DuplicateConffileName {
        conffile: String,
        first: String,
        second: String,
    },

    #[error("Invalid config file name '{conffile}' for '{key}'")]
    InvalidConffileName { key: String, conffile: String },

    #[error("Invalid flag '{flag}' for '{key}'")]
    InvalidFlag { key: String, flag: String },

    #[error("Parameter '{key}' declares an allowed range but is of type {ty}")]
    RangeOnNonInt { key: String, ty: ParamType },

    #[error("Bool parameter '{0}' cannot declare allowed values or an allowed range")]
    ConstraintOnBool(String),

    #[error("Parameter '{0}' declares both allowed values and an allowed range")]
    ConflictingConstraints(String),

    #[error("Parameter '{key}' has an empty allowed range {min}..={max}")]
    InvalidRange { key: String, min: i64, max: i64 },

    #[error("Allowed value '{value}' of '{key}' is not of type {expected}")]
    ConstraintTypeMismatch {
        key: String,
        value: Value,
        expected: ParamType,
    },

    #[error("Invalid default for '{key}': {reason}")]
    InvalidDefault { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ParamfigError {
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid value '{raw}' for '{key}': expected {expected}")]
    Coercion {
        key: String,
        raw: String,
        expected: ParamType,
    },

    #[error("Value '{value}' is not allowed for '{key}': {reason}")]
    Validation {
        key: String,
        value: Value,
        reason: String,
    },

    #[error("Type mismatch for '{key}': expected {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: ParamType,
        found: ParamType,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Parameters without a value: {}", .0.join(", "))]
    UnsetValues(Vec<String>),

    #[error("{} parameter errors", .0.len())]
    InvalidValues(Vec<ParamfigError>),

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<ParamfigError>),

    #[error("Failed to parse {path} (line {line}): {reason}")]
    ParseError {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    CommandLine(#[from] clap::Error),

    #[error("App name is required: call .app_name() on the builder")]
    AppNameRequired,
}

impl ParamfigError {
    /// Parameter names this error is about, if any.
    ///
    /// Flattens [`InvalidValues`](Self::InvalidValues) so callers can report
    /// every offending parameter of a failed acquisition.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            ParamfigError::Coercion { key, .. }
            | ParamfigError::Validation { key, .. }
            | ParamfigError::TypeMismatch { key, .. } => vec![key.as_str()],
            ParamfigError::KeyNotFound(key) => vec![key.as_str()],
            ParamfigError::UnsetValues(keys) => keys.iter().map(String::as_str).collect(),
            ParamfigError::InvalidValues(errors) => errors.iter().flat_map(|e| e.keys()).collect(),
            _ => vec![],
        }
    }
}
