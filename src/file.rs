//! Config file discovery and parsing.
//!
//! # Discovery
//!
//! Each [`SearchPath`] resolves to one directory. Directories are checked in
//! **search order** for `{dir}/{file_name}` and the first file found is the
//! only one used; files are never merged. Missing files are silently
//! skipped. Only actual I/O errors (permissions, etc.) are propagated.
//!
//! An absolute file name bypasses the search: joining it onto any directory
//! yields the file name itself.
//!
//! # Format
//!
//! One parameter per line, `NAME<whitespace>VALUE`:
//!
//! ```text
//! # comment
//! LOG_LEVEL   debug     # trailing comment
//! GREETING    hello \# not a comment
//! ```
//!
//! Everything after an unescaped `#` is dropped, the rest of the line is
//! trimmed, and blank lines are skipped. `\#` stands for a literal `#`. The
//! value is the remainder after the name, taken verbatim.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ParamfigError;
use crate::types::SearchPath;

/// One `NAME VALUE` line of a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConffileEntry {
    pub name: String,
    pub value: String,
    /// 1-indexed line number.
    pub line: usize,
}

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath) -> Option<PathBuf> {
    match sp {
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Expand all search paths into concrete directories, in search order.
/// Unresolvable entries are dropped.
pub fn expand_search_paths(search_paths: &[SearchPath]) -> Vec<PathBuf> {
    search_paths.iter().filter_map(resolve_search_path).collect()
}

/// Load the first config file found across `search_paths`.
///
/// Returns `Ok(None)` when no directory holds `file_name`.
pub fn load_config_file(
    search_paths: &[SearchPath],
    file_name: &str,
) -> Result<Option<(PathBuf, String)>, ParamfigError> {
    let dirs = expand_search_paths(search_paths);
    load_first_match(&dirs, file_name)
}

fn load_first_match(
    dirs: &[PathBuf],
    file_name: &str,
) -> Result<Option<(PathBuf, String)>, ParamfigError> {
    for dir in dirs {
        let file_path = dir.join(file_name);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => {
                debug!(path = %file_path.display(), "Config file found");
                return Ok(Some((file_path, content)));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %file_path.display(), "No config file");
                continue;
            }
            Err(e) => {
                return Err(ParamfigError::IoError {
                    path: file_path,
                    source: e,
                });
            }
        }
    }
    Ok(None)
}

/// Parse config file content into entries, in file order.
///
/// `path` only labels errors.
pub fn parse_conffile(content: &str, path: &Path) -> Result<Vec<ConffileEntry>, ParamfigError> {
    let mut entries = Vec::new();
    for (i, raw_line) in content.lines().enumerate() {
        let line = strip_comment(raw_line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once(char::is_whitespace) else {
            return Err(ParamfigError::ParseError {
                path: path.to_path_buf(),
                line: i + 1,
                reason: format!("missing value for '{line}'"),
            });
        };
        entries.push(ConffileEntry {
            name: name.to_string(),
            value: value.trim_start().to_string(),
            line: i + 1,
        });
    }
    Ok(entries)
}

/// Collapse entries into a name → raw value map. Later lines win.
pub fn entries_to_map(entries: &[ConffileEntry]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|e| (e.name.clone(), e.value.clone()))
        .collect()
}

/// Drop everything from the first unescaped `#`, unescaping `\#` on the way.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                out.push('#');
                chars.next();
            }
            '#' => break,
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn path() -> PathBuf {
        PathBuf::from("/test/myapp.conf")
    }

    fn parse(content: &str) -> Vec<ConffileEntry> {
        parse_conffile(content, &path()).unwrap()
    }

    // --- parsing ---

    #[test]
    fn name_and_value() {
        let entries = parse("FOO bar\n");
        assert_eq!(
            entries,
            vec![ConffileEntry {
                name: "FOO".into(),
                value: "bar".into(),
                line: 1,
            }]
        );
    }

    #[test]
    fn value_keeps_inner_whitespace() {
        let entries = parse("GREETING   hello   big world  \n");
        assert_eq!(entries[0].value, "hello   big world");
    }

    #[test]
    fn tab_separated() {
        let entries = parse("FOO\t42\n");
        assert_eq!(entries[0].name, "FOO");
        assert_eq!(entries[0].value, "42");
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let content = "# header\n\n   \nFOO 1 # trailing\n  # indented comment\nBAR 2\n";
        let entries = parse(content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "1");
        assert_eq!(entries[0].line, 4);
        assert_eq!(entries[1].name, "BAR");
        assert_eq!(entries[1].line, 6);
    }

    #[test]
    fn escaped_hash_is_literal() {
        let entries = parse("COLOR \\#ff0000 # red\n");
        assert_eq!(entries[0].value, "#ff0000");
    }

    #[test]
    fn other_backslashes_verbatim() {
        let entries = parse("DIR C:\\temp\n");
        assert_eq!(entries[0].value, "C:\\temp");
    }

    #[test]
    fn name_without_value_errors() {
        let err = parse_conffile("FOO 1\nBAR\n", &path()).unwrap_err();
        match err {
            ParamfigError::ParseError { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("BAR"));
            }
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn value_only_comment_errors() {
        assert!(parse_conffile("FOO # nothing here\n", &path()).is_err());
    }

    #[test]
    fn empty_content_ok() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn later_entry_wins_in_map() {
        let map = entries_to_map(&parse("PORT 1000\nPORT 2000\n"));
        assert_eq!(map["PORT"], "2000");
    }

    // --- discovery ---

    #[test]
    fn resolve_explicit_path() {
        let p = PathBuf::from("/etc");
        assert_eq!(resolve_search_path(&SearchPath::Path(p.clone())), Some(p));
    }

    #[test]
    fn resolve_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_search_path(&SearchPath::Cwd), Some(cwd));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let result =
            load_config_file(&[SearchPath::Path(dir.path().to_path_buf())], "nope.conf").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn first_directory_in_search_order_wins() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();
        fs::write(dir1.path().join("app.conf"), "PORT 1000\n").unwrap();
        fs::write(dir2.path().join("app.conf"), "PORT 2000\n").unwrap();

        let (found, content) = load_config_file(
            &[
                SearchPath::Path(dir1.path().to_path_buf()),
                SearchPath::Path(dir2.path().to_path_buf()),
            ],
            "app.conf",
        )
        .unwrap()
        .unwrap();

        assert_eq!(found, dir1.path().join("app.conf"));
        assert_eq!(content, "PORT 1000\n");
    }

    #[test]
    fn falls_through_to_later_directory() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();
        fs::write(dir2.path().join("app.conf"), "PORT 2000\n").unwrap();

        let (found, _) = load_config_file(
            &[
                SearchPath::Path(dir1.path().to_path_buf()),
                SearchPath::Path(dir2.path().to_path_buf()),
            ],
            "app.conf",
        )
        .unwrap()
        .unwrap();

        assert_eq!(found, dir2.path().join("app.conf"));
    }

    #[test]
    fn absolute_file_name_bypasses_search() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let file = dir.path().join("custom.conf");
        fs::write(&file, "PORT 3000\n").unwrap();

        let (found, _) = load_config_file(
            &[SearchPath::Path(other.path().to_path_buf())],
            file.to_str().unwrap(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(found, file);
    }

    #[test]
    fn directory_in_place_of_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("app.conf")).unwrap();

        let result = load_config_file(&[SearchPath::Path(dir.path().to_path_buf())], "app.conf");
        assert!(matches!(result, Err(ParamfigError::IoError { .. })));
    }
}
