use std::collections::HashMap;

/// Collect environment variables named `{prefix}{NAME}` into a map keyed by
/// `NAME`.
///
/// The prefix is matched verbatim, so it carries its own separator
/// (`"MYAPP_"`). No case folding or value parsing happens here: the lookup
/// key is a parameter's config-file name and the value stays raw.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_map(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| {
            let rest = key.strip_prefix(prefix)?;
            if rest.is_empty() {
                return None;
            }
            Some((rest.to_string(), value))
        })
        .collect()
}

/// Full environment variable name for a config-file name.
pub fn env_var_name(prefix: &str, conffile_name: &str) -> String {
    format!("{prefix}{conffile_name}")
}
