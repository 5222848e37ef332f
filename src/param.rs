//! Parameter declarations and name resolution.
//!
//! A [`Param`] is what the caller writes: a name, a type, and whatever
//! optional pieces they care about. [`Param::resolve`] turns it into a
//! [`ParameterSpec`], filling in the config-file name and command-line flags
//! the caller left unspecified:
//!
//! | Identifier | Config file / env suffix | Command line |
//! |------------|--------------------------|--------------|
//! | `baz` | `BAZ` | `-b`, `--baz` |
//! | `log-level` | `LOG_LEVEL` | `-l`, `--log-level` |
//!
//! A binding set to [`Binding::Disabled`] is never derived.

use crate::types::{Binding, CmdLine, ParamType, Value};

/// Builder-style declaration of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub(crate) name: String,
    pub(crate) ty: ParamType,
    pub(crate) default: Option<Value>,
    pub(crate) allowed_values: Option<Vec<Value>>,
    pub(crate) allowed_range: Option<(i64, i64)>,
    pub(crate) conffile: Binding<String>,
    pub(crate) cmd_line: Binding<CmdLine>,
    pub(crate) help: Option<String>,
}

impl Param {
    pub fn new(name: &str, ty: ParamType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default: None,
            allowed_values: None,
            allowed_range: None,
            conffile: Binding::Unspecified,
            cmd_line: Binding::Unspecified,
            help: None,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, ParamType::String)
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, ParamType::Int)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, ParamType::Bool)
    }

    /// Set the built-in default, the lowest-precedence source.
    pub fn default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict the parameter to an explicit set of values.
    pub fn allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict an int parameter to `min..=max`.
    pub fn allowed_range(mut self, min: i64, max: i64) -> Self {
        self.allowed_range = Some((min, max));
        self
    }

    /// Bind the parameter to an explicit config-file name. The same name,
    /// prefixed, is the environment variable.
    pub fn conffile(mut self, name: &str) -> Self {
        self.conffile = Binding::Explicit(name.to_string());
        self
    }

    /// Do not read this parameter from the config file or the environment.
    pub fn no_conffile(mut self) -> Self {
        self.conffile = Binding::Disabled;
        self
    }

    /// Bind explicit command-line flags. Passing `None` for both is the same
    /// as [`no_cmd_line`](Self::no_cmd_line).
    pub fn cmd_line(mut self, short: Option<char>, long: Option<&str>) -> Self {
        let flags = CmdLine::new(short, long);
        self.cmd_line = if flags.is_empty() {
            Binding::Disabled
        } else {
            Binding::Explicit(flags)
        };
        self
    }

    /// Do not read this parameter from the command line.
    pub fn no_cmd_line(mut self) -> Self {
        self.cmd_line = Binding::Disabled;
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derive missing bindings and produce the immutable spec.
    ///
    /// Constraint consistency is not checked here; the schema builder does
    /// that for the whole schema at once.
    pub fn resolve(self) -> ParameterSpec {
        let conffile_name = match self.conffile {
            Binding::Unspecified => Some(default_conffile_name(&self.name)),
            Binding::Disabled => None,
            Binding::Explicit(name) => Some(name),
        };
        let cmd_line = match self.cmd_line {
            Binding::Unspecified => default_cmd_line(&self.name),
            Binding::Disabled => None,
            Binding::Explicit(flags) => Some(flags),
        };
        let constraint = match (self.allowed_values, self.allowed_range) {
            (Some(values), None) => Some(Constraint::Values(values)),
            (None, Some((min, max))) => Some(Constraint::Range { min, max }),
            (Some(values), Some((min, max))) => Some(Constraint::Both {
                values,
                min,
                max,
            }),
            (None, None) => None,
        };
        ParameterSpec {
            name: self.name,
            ty: self.ty,
            default: self.default,
            constraint,
            conffile_name,
            cmd_line,
            help: self.help,
        }
    }
}

/// `log-level` → `LOG_LEVEL`.
pub fn default_conffile_name(name: &str) -> String {
    name.to_uppercase().replace('-', "_")
}

/// `baz` → `-b` / `--baz`.
pub fn default_cmd_line(name: &str) -> Option<CmdLine> {
    let short = name.chars().next()?;
    Some(CmdLine {
        short: Some(short),
        long: Some(name.to_string()),
    })
}

/// Allowed-values or allowed-range restriction on a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Values(Vec<Value>),
    Range {
        min: i64,
        max: i64,
    },
    /// Both were declared. Never survives schema construction.
    Both {
        values: Vec<Value>,
        min: i64,
        max: i64,
    },
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Values(values) => {
                let list: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "one of {}", list.join(", "))
            }
            Constraint::Range { min, max } => write!(f, "between {min} and {max}"),
            Constraint::Both { .. } => write!(f, "conflicting constraints"),
        }
    }
}

/// Fully resolved declaration of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    ty: ParamType,
    default: Option<Value>,
    constraint: Option<Constraint>,
    conffile_name: Option<String>,
    cmd_line: Option<CmdLine>,
    help: Option<String>,
}

impl ParameterSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// Key in the config file; also the environment variable suffix.
    pub fn conffile_name(&self) -> Option<&str> {
        self.conffile_name.as_deref()
    }

    pub fn cmd_line(&self) -> Option<&CmdLine> {
        self.cmd_line.as_ref()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}
