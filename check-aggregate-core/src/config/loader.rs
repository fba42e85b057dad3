use std::path::Path;

use crate::config::schema::Config;
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "check_aggregate.toml";

/// Loads `path` when given, otherwise the default file if it exists,
/// otherwise built-in defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_from_file(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_from_file(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub fn load_from_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Config(format!("failed to read config '{}': {err}", path.display()))
    })?;

    toml::from_str(&content).map_err(|err| {
        Error::Config(format!(
            "failed to parse config '{}': {err}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::{load, load_from_file};
    use crate::config::schema::SourceKind;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("check_aggregate.toml");
        std::fs::write(
            &path,
            "[filters]\nignore_soft_states = true\n\n[source]\nkind = \"json\"\npath = \"/tmp/snap.json\"\n",
        )
        .expect("write temp config");

        let config = load_from_file(&path).expect("config should load");

        assert!(config.filters.ignore_soft_states);
        assert!(config.filters.ignore_downtime);
        assert_eq!(config.output.line_separator, "\n");
        assert_eq!(config.source.kind, SourceKind::Json);
        assert_eq!(config.source.path.as_deref(), Some("/tmp/snap.json"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("missing.toml");
        let error = load(Some(path.as_path())).expect_err("missing file should fail");
        assert!(error.to_string().contains("failed to read config"));
    }
}
