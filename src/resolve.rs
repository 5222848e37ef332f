//! Core resolution pipeline: overlay all sources and validate every value.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Parse the config file and, in strict mode, reject unknown names
//! 2. Collect prefixed environment variables
//! 3. Parse argv
//! 4. For each parameter: seed with the default, then overlay config file,
//!    environment and command line, coercing and validating each value
//! 5. Report rejected values together with (unless allowed) parameters
//!    still unset
//!
//! Steps 1-3 fail before any parameter is touched. Step 4 never stops early:
//! a rejected value leaves the previous valid one in place and the pass
//! continues, so one bad source doesn't hide problems in another.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::cmdline::{self, ArgValue};
use crate::coerce::coerce;
use crate::env;
use crate::error::ParamfigError;
use crate::file;
use crate::param::ParameterSpec;
use crate::store::{ParameterStore, Slot};
use crate::types::{Source, Value};
use crate::validate;

/// All pre-loaded data needed for one acquisition. No I/O happens here.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// The config file found during discovery, if any, with its content.
    pub file: Option<(PathBuf, String)>,
    /// Raw environment variable pairs (a `std::env::vars()` snapshot or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"MYAPP_"`). `None` means env disabled.
    pub env_prefix: Option<String>,
    /// Command-line tokens, without the program name.
    pub argv: Vec<String>,
    /// Whether parameters may remain unset.
    pub allow_unset_values: bool,
    /// Whether to reject unknown names in the config file.
    pub strict: bool,
}

/// Resolve every parameter of `store` from `input`, writing results into
/// the store.
///
/// Parameters that resolved cleanly keep their new values even when the call
/// fails on another parameter.
pub(crate) fn resolve(store: &mut ParameterStore, input: ResolveInput) -> Result<(), ParamfigError> {
    let schema = store.schema();

    // 1: Config file
    let file_values = match &input.file {
        Some((path, content)) => {
            let entries = file::parse_conffile(content, path)?;
            let known: HashSet<&str> = schema
                .params()
                .filter_map(ParameterSpec::conffile_name)
                .collect();
            if input.strict {
                validate::validate_unknown_keys(&entries, &known, path)?;
            } else {
                for entry in entries.iter().filter(|e| !known.contains(e.name.as_str())) {
                    warn!(
                        key = %entry.name,
                        path = %path.display(),
                        line = entry.line,
                        "Ignoring unknown key in config file"
                    );
                }
            }
            file::entries_to_map(&entries)
        }
        None => HashMap::new(),
    };

    // 2: Environment
    let env_values = match &input.env_prefix {
        Some(prefix) => env::env_to_map(prefix, input.env_vars),
        None => HashMap::new(),
    };

    // 3: Command line
    let mut args = cmdline::parse_args(schema, &input.argv)?;

    // 4: Per-parameter overlay, lowest precedence first
    let mut errors = Vec::new();
    let mut resolved = Vec::with_capacity(schema.len());
    for spec in schema.params() {
        let mut slot = Slot::seeded(spec);

        if let Some(conffile) = spec.conffile_name() {
            if let Some(raw) = file_values.get(conffile) {
                overlay(&mut slot, spec, from_raw(spec, raw), Source::File, &mut errors);
            }
            if let Some(raw) = env_values.get(conffile) {
                overlay(&mut slot, spec, from_raw(spec, raw), Source::Env, &mut errors);
            }
        }

        match args.values.remove(spec.name()) {
            Some(ArgValue::Raw(raw)) => {
                overlay(&mut slot, spec, from_raw(spec, &raw), Source::CmdLine, &mut errors);
            }
            Some(ArgValue::Present) => {
                let value = Value::Bool(true);
                let checked = validate::validate_value(&value, spec).map(|()| value);
                overlay(&mut slot, spec, checked, Source::CmdLine, &mut errors);
            }
            None => {}
        }

        resolved.push((spec.name().to_string(), slot));
    }

    store.commit(resolved, args.positional);

    // 5: Global checks
    if !input.allow_unset_values {
        let unset: Vec<String> = store.unset_keys().map(str::to_string).collect();
        if !unset.is_empty() {
            errors.push(ParamfigError::UnsetValues(unset));
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ParamfigError::InvalidValues(errors)),
    }
}

fn from_raw(spec: &ParameterSpec, raw: &str) -> Result<Value, ParamfigError> {
    let value = coerce(spec.name(), raw, spec.param_type())?;
    validate::validate_value(&value, spec)?;
    Ok(value)
}

/// Overwrite `slot` with a checked value, or record why it was rejected.
fn overlay(
    slot: &mut Slot,
    spec: &ParameterSpec,
    candidate: Result<Value, ParamfigError>,
    source: Source,
    errors: &mut Vec<ParamfigError>,
) {
    match candidate {
        Ok(value) => {
            debug!(param = spec.name(), %source, "Value applied");
            slot.value = Some(value);
            slot.source = Some(source);
        }
        Err(e) => {
            warn!(param = spec.name(), %source, error = %e, "Value rejected");
            errors.push(e);
        }
    }
}
