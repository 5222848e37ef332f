//! Clap derive types for a `params` subcommand group.
//!
//! Embed [`ParamArgs`] into a host application's clap `#[derive(Parser)]`
//! struct to get `params list|get|set|gen` subcommands. The only bridge to
//! the core is [`ParamArgs::into_action()`], which converts clap-parsed
//! arguments into a [`ParamAction`](crate::ParamAction) for
//! [`ParameterStore::handle()`](crate::ParameterStore::handle).
//!
//! This is separate from the schema-driven flag parsing in `acquire`: these
//! types describe the host's own subcommands, not the parameters.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::ParamAction;

/// Clap-derived args for the `params` subcommand group.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
///
/// #[derive(Subcommand)]
/// enum Commands {
///     Params(ParamArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ParamArgs {
    #[command(subcommand)]
    pub action: Option<ParamSubcommand>,
}

/// Available parameter subcommands.
#[derive(Debug, Subcommand)]
pub enum ParamSubcommand {
    /// Show every parameter and its resolved value.
    List,
    /// Generate a commented sample config file.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show a parameter's value, where it came from, and its help text.
    Get {
        /// Parameter name.
        key: String,
    },
    /// Assign a value for the rest of this run.
    Set {
        /// Parameter name.
        key: String,
        /// Raw value, coerced to the parameter's type.
        value: String,
    },
}

impl ParamArgs {
    /// Convert clap-parsed args into a framework-agnostic `ParamAction`.
    ///
    /// Bare `params` (no subcommand) and explicit `params list` both map to
    /// `ParamAction::List`.
    pub fn into_action(self) -> ParamAction {
        match self.action {
            None | Some(ParamSubcommand::List) => ParamAction::List,
            Some(ParamSubcommand::Gen { output }) => ParamAction::Gen { output },
            Some(ParamSubcommand::Get { key }) => ParamAction::Get { key },
            Some(ParamSubcommand::Set { key, value }) => ParamAction::Set { key, value },
        }
    }
}
