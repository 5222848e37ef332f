#[cfg(test)]
pub mod test {
    use crate::builder::{Paramfig, Schema};
    use crate::param::Param;

    /// Shared schema for unit tests.
    ///
    /// | name | type | default | file / env | command line |
    /// |------|------|---------|------------|--------------|
    /// | baz | int, 1..=200 | unset | `BAZ` | `-b`, `--baz` |
    /// | verbose | bool | false | `VERBOSE` | `-v`, `--verbose` |
    /// | level | string, debug/info/warn | info | `LOG_LEVEL` | `-l`, `--log-level` |
    /// | name | string | world | `NAME` | `-n`, `--name` |
    /// | secret | string | unset | `SECRET` | none |
    pub fn test_schema() -> Schema {
        Paramfig::builder()
            .app_name("myapp")
            .env_prefix("PREFIX_")
            .allow_unset_values(true)
            .param(
                Param::int("baz")
                    .allowed_range(1, 200)
                    .help("How much baz to use."),
            )
            .param(Param::bool("verbose").default(false).help("Print more."))
            .param(
                Param::string("level")
                    .default("info")
                    .allowed_values(["debug", "info", "warn"])
                    .conffile("LOG_LEVEL")
                    .cmd_line(Some('l'), Some("log-level"))
                    .help("Log verbosity."),
            )
            .param(Param::string("name").default("world"))
            .param(Param::string("secret").no_cmd_line())
            .build()
            .unwrap()
    }

    #[test]
    fn test_schema_builds() {
        let schema = test_schema();
        assert_eq!(schema.len(), 5);
        assert_eq!(schema.env_prefix(), Some("PREFIX_"));
        assert_eq!(schema.file_name(), "myapp.conf");
    }
}
