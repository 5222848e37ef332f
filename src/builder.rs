use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::cmdline;
use crate::error::{ParamfigError, SchemaError};
use crate::file;
use crate::param::{Constraint, Param, ParameterSpec};
use crate::resolve::ResolveInput;
use crate::store::ParameterStore;
use crate::types::{Overrides, ParamType, SearchPath};
use crate::validate;

/// Entry point for declaring a parameter schema.
pub struct Paramfig;

impl Paramfig {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }
}

/// Builder for a [`Schema`]: the application-level knobs plus the ordered
/// parameter declarations.
///
/// Nothing is checked until [`build()`](Self::build), which validates the
/// whole schema at once and fails on the first inconsistency.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    env_prefix: Option<String>,
    env_enabled: bool,
    allow_unset_values: bool,
    strict: bool,
    params: Vec<Param>,
}

impl SchemaBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            env_prefix: None,
            env_enabled: true,
            allow_unset_values: false,
            strict: true,
            params: Vec::new(),
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - `file_name` → `"{app_name}.conf"`
    /// - `env_prefix` → `"{APP_NAME}_"` (uppercased, `-` becomes `_`)
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"{app_name}.conf"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **search order**: the first directory holding the
    /// config file wins.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path after the defaults (or after the list already set).
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(default_search_paths)
            .push(path);
        self
    }

    /// Override the environment variable prefix (default: `"{APP_NAME}_"`).
    ///
    /// The prefix is prepended verbatim to each parameter's config-file name.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable environment variable loading. An `env_prefix` override passed
    /// to `acquire` turns it back on for that call.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Whether `acquire` may leave parameters without a value (default: `false`).
    pub fn allow_unset_values(mut self, allow: bool) -> Self {
        self.allow_unset_values = allow;
        self
    }

    /// Enable or disable strict mode (default: `true`).
    /// In strict mode, config file names not bound to any parameter are errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Declare a parameter. Declaration order is the order of
    /// [`ParameterStore::keys`].
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    fn effective_app_name(&self) -> Result<&str, ParamfigError> {
        self.app_name
            .as_deref()
            .ok_or(ParamfigError::AppNameRequired)
    }

    fn effective_file_name(&self) -> Result<String, ParamfigError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.conf"))
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        if let Some(paths) = &self.search_paths {
            return paths.clone();
        }
        default_search_paths()
    }

    /// Resolve the effective env prefix (None if env disabled).
    fn effective_env_prefix(&self) -> Result<Option<String>, ParamfigError> {
        if !self.env_enabled {
            return Ok(None);
        }
        if let Some(prefix) = &self.env_prefix {
            return Ok(Some(prefix.clone()));
        }
        let app = self.effective_app_name()?;
        Ok(Some(format!("{}_", app.to_uppercase().replace('-', "_"))))
    }

    /// Resolve every parameter's bindings and check the schema for
    /// consistency: unique names, unique flags and config-file names,
    /// constraints that fit the type, and defaults that pass validation.
    pub fn build(self) -> Result<Schema, ParamfigError> {
        let app_name = self.effective_app_name()?.to_string();
        let file_name = self.effective_file_name()?;
        let search_paths = self.effective_search_paths();
        let env_prefix = self.effective_env_prefix()?;

        let mut params: IndexMap<String, ParameterSpec> = IndexMap::new();
        for param in self.params {
            let spec = param.resolve();
            check_spec(&spec)?;
            if params.contains_key(spec.name()) {
                return Err(SchemaError::DuplicateName(spec.name().to_string()).into());
            }
            params.insert(spec.name().to_string(), spec);
        }
        check_unique_bindings(&params)?;

        Ok(Schema {
            app_name,
            file_name,
            search_paths,
            env_prefix,
            allow_unset_values: self.allow_unset_values,
            strict: self.strict,
            params,
        })
    }
}

fn default_search_paths() -> Vec<SearchPath> {
    vec![
        SearchPath::Cwd,
        SearchPath::Home(""),
        SearchPath::Path(PathBuf::from("/etc")),
    ]
}

fn check_spec(spec: &ParameterSpec) -> Result<(), SchemaError> {
    let key = spec.name();
    if key.is_empty() {
        return Err(SchemaError::EmptyName);
    }
    if key.contains(char::is_whitespace) {
        return Err(SchemaError::InvalidName(key.to_string()));
    }
    let ty = spec.param_type();

    match spec.constraint() {
        None => {}
        Some(_) if ty == ParamType::Bool => {
            return Err(SchemaError::ConstraintOnBool(key.to_string()));
        }
        Some(Constraint::Both { .. }) => {
            return Err(SchemaError::ConflictingConstraints(key.to_string()));
        }
        Some(Constraint::Range { min, max }) => {
            if ty != ParamType::Int {
                return Err(SchemaError::RangeOnNonInt {
                    key: key.to_string(),
                    ty,
                });
            }
            if min > max {
                return Err(SchemaError::InvalidRange {
                    key: key.to_string(),
                    min: *min,
                    max: *max,
                });
            }
        }
        Some(Constraint::Values(values)) => {
            if let Some(bad) = values.iter().find(|v| v.param_type() != ty) {
                return Err(SchemaError::ConstraintTypeMismatch {
                    key: key.to_string(),
                    value: bad.clone(),
                    expected: ty,
                });
            }
        }
    }

    if let Some(conffile) = spec.conffile_name()
        && (conffile.is_empty() || conffile.contains(char::is_whitespace))
    {
        return Err(SchemaError::InvalidConffileName {
            key: key.to_string(),
            conffile: conffile.to_string(),
        });
    }

    if let Some(flags) = spec.cmd_line() {
        if let Some(short) = flags.short
            && (short == '-' || short.is_whitespace())
        {
            return Err(SchemaError::InvalidFlag {
                key: key.to_string(),
                flag: format!("-{short}"),
            });
        }
        if let Some(long) = &flags.long
            && (long.is_empty()
                || long.starts_with('-')
                || long.contains('=')
                || long.contains(char::is_whitespace))
        {
            return Err(SchemaError::InvalidFlag {
                key: key.to_string(),
                flag: format!("--{long}"),
            });
        }
    }

    if let Some(default) = spec.default_value() {
        if default.param_type() != ty {
            return Err(SchemaError::InvalidDefault {
                key: key.to_string(),
                reason: format!("expected {ty}, got {}", default.param_type()),
            });
        }
        validate::validate_value(default, spec).map_err(|e| SchemaError::InvalidDefault {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

/// No two parameters may share a short flag, a long flag, or a config-file name.
fn check_unique_bindings(params: &IndexMap<String, ParameterSpec>) -> Result<(), SchemaError> {
    let mut flags: HashMap<String, &str> = HashMap::new();
    let mut conffiles: HashMap<&str, &str> = HashMap::new();

    for spec in params.values() {
        let name = spec.name();
        if let Some(cmd_line) = spec.cmd_line() {
            let spelled = cmd_line
                .short
                .map(|s| format!("-{s}"))
                .into_iter()
                .chain(cmd_line.long.as_ref().map(|l| format!("--{l}")));
            for flag in spelled {
                if let Some(first) = flags.get(&flag) {
                    return Err(SchemaError::DuplicateFlag {
                        flag,
                        first: first.to_string(),
                        second: name.to_string(),
                    });
                }
                flags.insert(flag, name);
            }
        }
        if let Some(conffile) = spec.conffile_name() {
            if let Some(first) = conffiles.get(conffile) {
                return Err(SchemaError::DuplicateConffileName {
                    conffile: conffile.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
            conffiles.insert(conffile, name);
        }
    }
    Ok(())
}

/// A validated, immutable parameter schema.
///
/// Built once at startup by [`SchemaBuilder::build`] and handed to
/// [`ParameterStore::new`].
#[derive(Debug, Clone)]
pub struct Schema {
    app_name: String,
    file_name: String,
    search_paths: Vec<SearchPath>,
    env_prefix: Option<String>,
    allow_unset_values: bool,
    strict: bool,
    params: IndexMap<String, ParameterSpec>,
}

impl Schema {
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn search_paths(&self) -> &[SearchPath] {
        &self.search_paths
    }

    /// `None` when environment loading is disabled.
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    pub fn allows_unset_values(&self) -> bool {
        self.allow_unset_values
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Parameter specs in declaration order.
    pub fn params(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.values()
    }

    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.get(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The clap command that parses this schema's flags. Useful for
    /// rendering help in the host application.
    pub fn command(&self) -> clap::Command {
        cmdline::build_command(self)
    }

    /// Create a store seeded with every parameter's default.
    pub fn into_store(self) -> ParameterStore {
        ParameterStore::new(self)
    }

    /// Gather the config file, environment snapshot and argv for one
    /// acquisition. This is the only place resolution touches the outside
    /// world.
    pub(crate) fn build_input(
        &self,
        argv: Vec<String>,
        overrides: &Overrides,
    ) -> Result<ResolveInput, ParamfigError> {
        let file_name = overrides
            .config_filename
            .as_deref()
            .unwrap_or(&self.file_name);
        let file = file::load_config_file(&self.search_paths, file_name)?;

        let env_prefix = overrides
            .env_prefix
            .clone()
            .or_else(|| self.env_prefix.clone());
        let env_vars = if env_prefix.is_some() {
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect()
        } else {
            Vec::new()
        };

        Ok(ResolveInput {
            file,
            env_vars,
            env_prefix,
            argv,
            allow_unset_values: overrides
                .allow_unset_values
                .unwrap_or(self.allow_unset_values),
            strict: self.strict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn builder() -> SchemaBuilder {
        Paramfig::builder().app_name("myapp")
    }

    fn schema_err(builder: SchemaBuilder) -> SchemaError {
        match builder.build() {
            Err(ParamfigError::Schema(e)) => e,
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn app_name_sets_defaults() {
        let builder = builder();
        assert_eq!(builder.effective_file_name().unwrap(), "myapp.conf");
        assert_eq!(
            builder.effective_env_prefix().unwrap(),
            Some("MYAPP_".to_string())
        );
        assert_eq!(
            builder.effective_search_paths(),
            vec![
                SearchPath::Cwd,
                SearchPath::Home(""),
                SearchPath::Path(PathBuf::from("/etc")),
            ]
        );
    }

    #[test]
    fn dashed_app_name_env_prefix() {
        let builder = Paramfig::builder().app_name("my-app");
        assert_eq!(
            builder.effective_env_prefix().unwrap(),
            Some("MY_APP_".to_string())
        );
    }

    #[test]
    fn override_file_name() {
        let builder = builder().file_name("custom.conf");
        assert_eq!(builder.effective_file_name().unwrap(), "custom.conf");
    }

    #[test]
    fn override_env_prefix() {
        let builder = builder().env_prefix("PREFIX_");
        assert_eq!(
            builder.effective_env_prefix().unwrap(),
            Some("PREFIX_".to_string())
        );
    }

    #[test]
    fn no_env_disables_prefix() {
        let builder = builder().no_env();
        assert_eq!(builder.effective_env_prefix().unwrap(), None);
    }

    #[test]
    fn search_paths_replace() {
        let builder = builder().search_paths(vec![SearchPath::Cwd]);
        assert_eq!(builder.effective_search_paths(), vec![SearchPath::Cwd]);
    }

    #[test]
    fn add_search_path_appends_to_defaults() {
        let builder = builder().add_search_path(SearchPath::Home(".myapp"));
        let paths = builder.effective_search_paths();
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[3], SearchPath::Home(".myapp"));
    }

    #[test]
    fn policy_defaults() {
        let schema = builder().build().unwrap();
        assert!(!schema.allows_unset_values());
        assert!(schema.is_strict());
    }

    #[test]
    fn missing_app_name_errors() {
        let result = Paramfig::builder().param(Param::int("port")).build();
        assert!(matches!(result, Err(ParamfigError::AppNameRequired)));
    }

    #[test]
    fn params_keep_declaration_order() {
        let schema = builder()
            .param(Param::string("zeta"))
            .param(Param::int("alpha"))
            .param(Param::bool("mid"))
            .build()
            .unwrap();
        let names: Vec<&str> = schema.params().map(ParameterSpec::name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn valid_schema_builds() {
        let schema = builder()
            .param(Param::int("baz").allowed_range(1, 200))
            .param(Param::string("mode").allowed_values(["a", "b"]).default("a"))
            .param(Param::bool("verbose").default(false))
            .build()
            .unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.param("baz").unwrap().conffile_name(), Some("BAZ"));
    }

    // --- schema errors ---

    #[test]
    fn empty_name_rejected() {
        assert_eq!(schema_err(builder().param(Param::int(""))), SchemaError::EmptyName);
    }

    #[test]
    fn whitespace_in_name_rejected() {
        assert_eq!(
            schema_err(builder().param(Param::string("two words").no_cmd_line())),
            SchemaError::InvalidName("two words".into())
        );
    }

    #[test]
    fn duplicate_name_rejected() {
        let err = schema_err(
            builder()
                .param(Param::int("port"))
                .param(Param::int("port").no_cmd_line().no_conffile()),
        );
        assert_eq!(err, SchemaError::DuplicateName("port".into()));
    }

    #[test]
    fn duplicate_derived_short_flag_rejected() {
        let err = schema_err(
            builder()
                .param(Param::int("port"))
                .param(Param::string("path")),
        );
        assert_eq!(
            err,
            SchemaError::DuplicateFlag {
                flag: "-p".into(),
                first: "port".into(),
                second: "path".into(),
            }
        );
    }

    #[test]
    fn explicit_flags_resolve_collision() {
        let schema = builder()
            .param(Param::int("port"))
            .param(Param::string("path").cmd_line(Some('P'), Some("path")))
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn duplicate_long_flag_rejected() {
        let err = schema_err(
            builder()
                .param(Param::int("a").cmd_line(None, Some("shared")))
                .param(Param::int("b").cmd_line(None, Some("shared"))),
        );
        assert!(matches!(err, SchemaError::DuplicateFlag { flag, .. } if flag == "--shared"));
    }

    #[test]
    fn duplicate_conffile_name_rejected() {
        let err = schema_err(
            builder()
                .param(Param::int("a").conffile("SAME"))
                .param(Param::int("b").conffile("SAME")),
        );
        assert!(matches!(err, SchemaError::DuplicateConffileName { .. }));
    }

    #[test]
    fn range_on_string_rejected() {
        let err = schema_err(builder().param(Param::string("name").allowed_range(1, 2)));
        assert_eq!(
            err,
            SchemaError::RangeOnNonInt {
                key: "name".into(),
                ty: ParamType::String,
            }
        );
    }

    #[test]
    fn constraint_on_bool_rejected() {
        let err = schema_err(builder().param(Param::bool("flag").allowed_values([true])));
        assert_eq!(err, SchemaError::ConstraintOnBool("flag".into()));

        let err = schema_err(builder().param(Param::bool("flag").allowed_range(0, 1)));
        assert_eq!(err, SchemaError::ConstraintOnBool("flag".into()));
    }

    #[test]
    fn both_constraints_rejected() {
        let err = schema_err(
            builder().param(Param::int("n").allowed_values([1, 2]).allowed_range(1, 2)),
        );
        assert_eq!(err, SchemaError::ConflictingConstraints("n".into()));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = schema_err(builder().param(Param::int("n").allowed_range(10, 1)));
        assert!(matches!(err, SchemaError::InvalidRange { min: 10, max: 1, .. }));
    }

    #[test]
    fn single_point_range_ok() {
        assert!(builder().param(Param::int("n").allowed_range(5, 5)).build().is_ok());
    }

    #[test]
    fn mistyped_allowed_value_rejected() {
        let err = schema_err(
            builder().param(
                Param::int("n").allowed_values([Value::Int(1), Value::Str("two".into())]),
            ),
        );
        assert!(matches!(err, SchemaError::ConstraintTypeMismatch { .. }));
    }

    #[test]
    fn mistyped_default_rejected() {
        let err = schema_err(builder().param(Param::int("n").default("ten")));
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn default_outside_range_rejected() {
        let err = schema_err(builder().param(Param::int("n").allowed_range(1, 10).default(11)));
        match err {
            SchemaError::InvalidDefault { key, reason } => {
                assert_eq!(key, "n");
                assert!(reason.contains("11"));
            }
            other => panic!("Expected InvalidDefault, got {other:?}"),
        }
    }

    #[test]
    fn default_outside_values_rejected() {
        let err = schema_err(
            builder().param(Param::string("mode").allowed_values(["a", "b"]).default("c")),
        );
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn invalid_long_flag_rejected() {
        let err = schema_err(builder().param(Param::int("n").cmd_line(None, Some("--n"))));
        assert!(matches!(err, SchemaError::InvalidFlag { .. }));
        let err = schema_err(builder().param(Param::int("n").cmd_line(None, Some(""))));
        assert!(matches!(err, SchemaError::InvalidFlag { .. }));
    }

    #[test]
    fn invalid_short_flag_rejected() {
        let err = schema_err(builder().param(Param::int("n").cmd_line(Some('-'), None)));
        assert!(matches!(err, SchemaError::InvalidFlag { .. }));
    }

    #[test]
    fn invalid_conffile_name_rejected() {
        let err = schema_err(builder().param(Param::int("n").conffile("TWO WORDS")));
        assert!(matches!(err, SchemaError::InvalidConffileName { .. }));
    }

    #[test]
    fn disabled_bindings_never_collide() {
        let schema = builder()
            .param(Param::int("port").no_cmd_line())
            .param(Param::string("path"))
            .param(Param::string("pid").no_cmd_line().no_conffile())
            .build();
        assert!(schema.is_ok());
    }

    // --- input gathering ---

    #[test]
    fn build_input_applies_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema = builder()
            .search_paths(vec![SearchPath::Path(dir.path().to_path_buf())])
            .no_env()
            .build()
            .unwrap();

        let input = schema
            .build_input(
                vec![],
                &Overrides::default()
                    .env_prefix("OTHER_")
                    .allow_unset_values(true),
            )
            .unwrap();
        assert_eq!(input.env_prefix.as_deref(), Some("OTHER_"));
        assert!(input.allow_unset_values);
        assert!(input.file.is_none());
    }

    #[test]
    fn build_input_without_env_reads_no_vars() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema = builder()
            .search_paths(vec![SearchPath::Path(dir.path().to_path_buf())])
            .no_env()
            .build()
            .unwrap();
        let input = schema.build_input(vec![], &Overrides::default()).unwrap();
        assert!(input.env_prefix.is_none());
        assert!(input.env_vars.is_empty());
        assert!(!input.allow_unset_values);
    }

    #[test]
    fn build_input_uses_override_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("other.conf"), "PORT 1\n").unwrap();
        let schema = builder()
            .search_paths(vec![SearchPath::Path(dir.path().to_path_buf())])
            .no_env()
            .build()
            .unwrap();
        let input = schema
            .build_input(vec![], &Overrides::default().config_filename("other.conf"))
            .unwrap();
        let (path, content) = input.file.unwrap();
        assert!(path.ends_with("other.conf"));
        assert_eq!(content, "PORT 1\n");
    }
}
