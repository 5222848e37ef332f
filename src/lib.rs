//! Typed parameters resolved from defaults, a config file, the environment
//! and the command line.
//!
//! Declare each parameter once, with its type, default, constraints and
//! bindings, and paramfig fills a [`ParameterStore`] from every source in
//! precedence order, coercing and validating each value on the way in.
//!
//! ```ignore
//! let schema = Paramfig::builder()
//!     .app_name("myapp")
//!     .param(Param::int("port").default(8080).allowed_range(1, 65535))
//!     .param(Param::bool("verbose").default(false))
//!     .build()?;
//!
//! let mut store = schema.into_store();
//! store.acquire(std::env::args().skip(1), &Overrides::default())?;
//! let port = store.get_int("port")?;
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Default               Param::default()
//!        ↑ overridden by
//! Config file           NAME VALUE lines, first file found wins
//!        ↑ overridden by
//! Environment           {PREFIX}{NAME}
//!        ↑ overridden by
//! Command line          -n VALUE / --name VALUE / --flag
//! ```
//!
//! Every layer is sparse: a parameter a source does not mention keeps the
//! value from the layer below. A raw value that fails coercion or validation
//! is reported and the parameter keeps its previous valid value.
//!
//! # Names
//!
//! Each parameter has one identifier and up to two derived bindings:
//!
//! - **Config file name**: the identifier upper-cased with `-` turned into
//!   `_` (`log-level` becomes `LOG_LEVEL`), unless set with
//!   [`Param::conffile`] or disabled with [`Param::no_conffile`].
//! - **Command line**: `-{first char}` and `--{identifier}`, unless set with
//!   [`Param::cmd_line`] or disabled with [`Param::no_cmd_line`].
//!
//! The environment variable is the env prefix followed by the config file
//! name. The prefix defaults to `{APP_NAME}_`; a parameter without a config
//! file name is read from neither the file nor the environment.
//!
//! # Config file
//!
//! One setting per line, `NAME VALUE`, split on the first run of whitespace.
//! `#` starts a comment; `\#` is a literal `#`. Blank lines are ignored.
//! [`search_paths()`](SchemaBuilder::search_paths) lists the directories to
//! look in (by default the working directory, the home directory, then
//! `/etc`) and the first one holding `{app_name}.conf` is used. Missing files
//! are skipped.
//!
//! With [`strict`](SchemaBuilder::strict) on (the default), a name in the
//! file that no parameter is bound to is an error. Otherwise it is logged
//! and ignored.
//!
//! # Types
//!
//! - **string**: taken as is.
//! - **int**: a signed 64-bit decimal integer.
//! - **bool**: `y`, `yes`, `1`, `true` or `n`, `no`, `0`, `false`, in any
//!   case. On the command line a bool is a switch that takes no value.
//!
//! # Unset parameters
//!
//! A parameter with no default that no source supplies stays unset. Unless
//! [`allow_unset_values`](SchemaBuilder::allow_unset_values) is on,
//! acquisition then fails with [`ParamfigError::UnsetValues`] naming each of
//! them.
//!
//! # Operations
//!
//! [`ParameterStore::handle`] runs a [`ParamAction`] (`list`, `get`, `set`,
//! `gen`) and returns a [`ParamResult`] for display. [`ParamArgs`] provides
//! matching clap subcommands for a host application.

pub mod error;
pub mod types;

mod builder;
mod cli;
mod cmdline;
mod coerce;
mod env;
mod file;
mod ops;
mod param;
mod resolve;
mod store;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{Paramfig, Schema, SchemaBuilder};
pub use cli::{ParamArgs, ParamSubcommand};
pub use coerce::coerce;
pub use error::{ParamfigError, SchemaError};
pub use ops::ParamResult;
pub use param::{Constraint, Param, ParameterSpec, default_cmd_line, default_conffile_name};
pub use resolve::ResolveInput;
pub use store::ParameterStore;
pub use types::{
    Binding, CmdLine, Overrides, ParamAction, ParamType, SearchPath, Source, Value,
};
pub use validate::validate_value;
