use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Declared type of a parameter. Governs coercion and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Int,
    Bool,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::String => write!(f, "string"),
            ParamType::Int => write!(f, "int"),
            ParamType::Bool => write!(f, "bool"),
        }
    }
}

/// A typed parameter value.
///
/// The unset state is not a `Value`: lookups return `Option<&Value>` and
/// `None` means no source supplied anything. An empty string or zero is
/// always a real, set value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Value {
    pub fn param_type(&self) -> ParamType {
        match self {
            Value::Str(_) => ParamType::String,
            Value::Int(_) => ParamType::Int,
            Value::Bool(_) => ParamType::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// An optional per-parameter binding that distinguishes "not specified"
/// from "explicitly absent".
///
/// `Unspecified` lets the name resolver derive a binding from the parameter
/// identifier. `Disabled` means the parameter has no binding for that source
/// at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Binding<T> {
    #[default]
    Unspecified,
    Disabled,
    Explicit(T),
}

/// Short and long command-line flags for a parameter. Either may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdLine {
    pub short: Option<char>,
    pub long: Option<String>,
}

impl CmdLine {
    pub fn new(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            short,
            long: long.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }
}

impl fmt::Display for CmdLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.short, &self.long) {
            (Some(s), Some(l)) => write!(f, "-{s}/--{l}"),
            (Some(s), None) => write!(f, "-{s}"),
            (None, Some(l)) => write!(f, "--{l}"),
            (None, None) => Ok(()),
        }
    }
}

/// The source a resolved value came from, in ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Default,
    File,
    Env,
    CmdLine,
    /// Assigned after acquisition through [`ParameterStore::set`](crate::ParameterStore::set).
    Set,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Default => write!(f, "default"),
            Source::File => write!(f, "config file"),
            Source::Env => write!(f, "environment"),
            Source::CmdLine => write!(f, "command line"),
            Source::Set => write!(f, "set"),
        }
    }
}

/// Where to search for the config file.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Current working directory.
    Cwd,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    /// `Home("")` is the home directory itself.
    Home(&'static str),
    /// An explicit directory, e.g. `/etc`.
    Path(PathBuf),
}

/// Per-call overrides for [`ParameterStore::acquire`](crate::ParameterStore::acquire).
///
/// Each `Some` replaces the schema's own setting for that call only. None of
/// these touch individual parameter values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub config_filename: Option<String>,
    pub env_prefix: Option<String>,
    pub allow_unset_values: Option<bool>,
}

impl Overrides {
    pub fn config_filename(mut self, name: &str) -> Self {
        self.config_filename = Some(name.to_string());
        self
    }

    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    pub fn allow_unset_values(mut self, allow: bool) -> Self {
        self.allow_unset_values = Some(allow);
        self
    }
}

/// A parameter operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamAction {
    List,
    Gen { output: Option<PathBuf> },
    Get { key: String },
    Set { key: String, value: String },
}
