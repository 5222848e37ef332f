//! Command-line adapter.
//!
//! The schema's flags are turned into a [`clap::Command`] at runtime. clap
//! does the tokenizing (`--baz 5`, `--baz=5`, `-b5`, `--`), this module only
//! reads back which parameters were given and their raw strings. Coercion
//! and validation happen later, in the same pass as every other source.
//!
//! - Non-bool parameters are options that always consume the following
//!   token, even when it starts with `-`.
//! - Bool parameters are switches: presence means `true`, absence leaves the
//!   lower-precedence value alone.
//! - A repeated flag overrides itself; the last occurrence wins.
//! - Tokens that are not flags are collected as positional arguments.

use std::collections::HashMap;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};

use crate::builder::Schema;
use crate::error::ParamfigError;
use crate::types::ParamType;

/// Contains a space, so no parameter name can collide with it.
const POSITIONAL_ID: &str = "positional args";

/// What the command line said about one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// A non-bool option and the token that followed it.
    Raw(String),
    /// A bool switch was present.
    Present,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Keyed by parameter name. Parameters absent from argv have no entry.
    pub values: HashMap<String, ArgValue>,
    pub positional: Vec<String>,
}

/// Build the clap command for every parameter with a command-line binding.
pub fn build_command(schema: &Schema) -> Command {
    let mut cmd = Command::new(schema.app_name().to_string())
        .no_binary_name(true)
        .args_override_self(true)
        .disable_help_flag(true)
        .disable_version_flag(true);

    for spec in schema.params() {
        let Some(flags) = spec.cmd_line() else {
            continue;
        };
        let mut arg = Arg::new(spec.name().to_string()).overrides_with(spec.name().to_string());
        if let Some(short) = flags.short {
            arg = arg.short(short);
        }
        if let Some(long) = &flags.long {
            arg = arg.long(long.clone());
        }
        if let Some(help) = spec.help() {
            arg = arg.help(help.to_string());
        }
        arg = match spec.param_type() {
            ParamType::Bool => arg.action(ArgAction::SetTrue),
            ty => arg
                .action(ArgAction::Set)
                .value_name(ty.to_string().to_uppercase())
                .allow_hyphen_values(true),
        };
        cmd = cmd.arg(arg);
    }

    cmd.arg(
        Arg::new(POSITIONAL_ID)
            .action(ArgAction::Append)
            .num_args(1..)
            .value_name("ARGS"),
    )
}

/// Parse `argv` (without the program name) against the schema's flags.
pub fn parse_args(schema: &Schema, argv: &[String]) -> Result<ParsedArgs, ParamfigError> {
    let matches = build_command(schema).try_get_matches_from(argv)?;

    let mut values = HashMap::new();
    for spec in schema.params().filter(|s| s.cmd_line().is_some()) {
        let id = spec.name();
        match spec.param_type() {
            ParamType::Bool => {
                if matches.value_source(id) == Some(ValueSource::CommandLine) {
                    values.insert(id.to_string(), ArgValue::Present);
                }
            }
            _ => {
                if let Some(raw) = matches.get_one::<String>(id) {
                    values.insert(id.to_string(), ArgValue::Raw(raw.clone()));
                }
            }
        }
    }

    let positional = matches
        .get_many::<String>(POSITIONAL_ID)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();

    Ok(ParsedArgs { values, positional })
}
