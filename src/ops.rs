//! Parameter operations: template generation, key lookup, listing, and result types.
//!
//! Provides the logic behind `params list`, `params gen`, `params get`,
//! `params set`, and the `ParamResult` enum that callers use to display
//! results.

use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::builder::Schema;
use crate::env;
use crate::error::ParamfigError;
use crate::param::ParameterSpec;
use crate::store::ParameterStore;
use crate::types::{ParamAction, Source};

const NOT_SET: &str = "<not set>";

/// Result of a parameter operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamResult {
    /// A generated config file template.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A parameter's current value, its source, and its help text.
    KeyValue {
        key: String,
        value: String,
        source: Option<Source>,
        doc: Vec<String>,
    },
    /// Confirmation that a value was assigned.
    ValueSet { key: String, value: String },
    /// All parameters with their current values.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ParamResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamResult::Template(t) => write!(f, "{t}"),
            ParamResult::TemplateWritten { path } => {
                write!(f, "Config template written to {}", path.display())
            }
            ParamResult::KeyValue {
                key,
                value,
                source,
                doc,
            } => {
                for line in doc {
                    writeln!(f, "# {line}")?;
                }
                if let Some(source) = source {
                    writeln!(f, "# from {source}")?;
                }
                write!(f, "{key} = {value}")
            }
            ParamResult::ValueSet { key, value } => write!(f, "Set {key} = {value}"),
            ParamResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Handle a [`ParamAction`] against a resolved store.
pub fn handle(store: &mut ParameterStore, action: &ParamAction) -> Result<ParamResult, ParamfigError> {
    match action {
        ParamAction::List => Ok(list_values(store)),
        ParamAction::Gen { output } => {
            let template = generate_template(store.schema());
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent).map_err(|e| ParamfigError::IoError {
                            path: parent.to_path_buf(),
                            source: e,
                        })?;
                    }
                    std::fs::write(path, &template).map_err(|e| ParamfigError::IoError {
                        path: path.clone(),
                        source: e,
                    })?;
                    Ok(ParamResult::TemplateWritten { path: path.clone() })
                }
                None => Ok(ParamResult::Template(template)),
            }
        }
        ParamAction::Get { key } => get_value(store, key),
        ParamAction::Set { key, value } => {
            store.set(key, value.as_str())?;
            let shown = store
                .get(key)?
                .map(ToString::to_string)
                .unwrap_or_else(|| NOT_SET.to_string());
            Ok(ParamResult::ValueSet {
                key: key.clone(),
                value: shown,
            })
        }
    }
}

/// Get a parameter's value, including its help text and source.
pub fn get_value(store: &ParameterStore, key: &str) -> Result<ParamResult, ParamfigError> {
    let value = store
        .get(key)?
        .map(ToString::to_string)
        .unwrap_or_else(|| NOT_SET.to_string());
    let doc = store
        .schema()
        .param(key)
        .and_then(ParameterSpec::help)
        .map(|help| help.lines().map(str::to_string).collect())
        .unwrap_or_default();

    Ok(ParamResult::KeyValue {
        key: key.to_string(),
        value,
        source: store.source(key)?,
        doc,
    })
}

/// List every parameter in declaration order.
pub fn list_values(store: &ParameterStore) -> ParamResult {
    let entries = store
        .items()
        .map(|(key, value)| {
            let display = match value {
                Some(v) => v.to_string(),
                None => NOT_SET.to_string(),
            };
            (key.to_string(), display)
        })
        .collect();
    ParamResult::Listing { entries }
}

/// Generate a commented config file covering every file-bound parameter.
///
/// Every setting line is commented out, so the template loads to the same
/// values as having no file at all.
pub fn generate_template(schema: &Schema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} configuration", schema.app_name());
    let _ = writeln!(out, "#");
    let _ = writeln!(out, "# One setting per line: NAME VALUE");
    let _ = writeln!(out, "# '#' starts a comment; write '\\#' for a literal '#'.");

    for spec in schema.params() {
        let Some(conffile) = spec.conffile_name() else {
            continue;
        };
        let _ = writeln!(out);
        if let Some(help) = spec.help() {
            for line in help.lines() {
                let _ = writeln!(out, "# {line}");
            }
        }
        match spec.constraint() {
            Some(constraint) => {
                let _ = writeln!(out, "# Type: {}, {constraint}", spec.param_type());
            }
            None => {
                let _ = writeln!(out, "# Type: {}", spec.param_type());
            }
        }
        if let Some(prefix) = schema.env_prefix() {
            let _ = writeln!(out, "# Env: {}", env::env_var_name(prefix, conffile));
        }
        if let Some(flags) = spec.cmd_line() {
            let _ = writeln!(out, "# Flags: {flags}");
        }
        match spec.default_value() {
            Some(default) => {
                let escaped = default.to_string().replace('#', "\\#");
                let _ = writeln!(out, "#{conffile} {escaped}");
            }
            None => {
                let _ = writeln!(out, "#{conffile} <{}>", spec.param_type());
            }
        }
    }
    out
}
