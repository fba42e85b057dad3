pub mod config;
pub mod error;
pub mod logging;
pub mod script;
pub mod snapshot;
pub mod status;

pub use config::Config;
pub use error::{Error, Result};
pub use script::{evaluate, EvaluationContext};
pub use snapshot::{Hostgroups, MemorySnapshot, StatusSnapshot};
pub use status::{Status, StatusItem};

use std::path::Path;

use config::SourceKind;

pub struct Calculator {
    config: Config,
}

impl Calculator {
    pub fn new(config: Config) -> Result<Self> {
        config::validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the configured status source once.
    pub fn load_snapshot(&self) -> Result<MemorySnapshot> {
        let path = self.config.source.path.as_deref().ok_or_else(|| {
            Error::Config("source.path must be set to read host and service status".to_owned())
        })?;
        let path = Path::new(path);
        match self.config.source.kind {
            SourceKind::StatusFile => snapshot::load_status_file(path),
            SourceKind::Json => snapshot::load_json_snapshot(path),
        }
    }

    /// Hostgroups from the configured object file, or none.
    pub fn load_hostgroups(&self) -> Result<Hostgroups> {
        match self.config.source.hostgroups_path.as_deref() {
            Some(path) => snapshot::load_hostgroups(Path::new(path)),
            None => Ok(Hostgroups::new()),
        }
    }

    pub fn evaluate(
        &self,
        script: &str,
        snapshot: &dyn StatusSnapshot,
        hostgroups: &Hostgroups,
    ) -> Result<StatusItem> {
        let context = EvaluationContext {
            snapshot,
            hostgroups,
            filters: self.config.filters,
            line_separator: &self.config.output.line_separator,
        };
        script::evaluate(script, &context)
    }

    /// Loads the status source and hostgroups, then evaluates `script`.
    pub fn run(&self, script: &str) -> Result<StatusItem> {
        let snapshot = self.load_snapshot()?;
        let hostgroups = self.load_hostgroups()?;
        if hostgroups.is_empty() {
            tracing::debug!("no hostgroups defined; hostgroup references resolve to nothing");
        }
        self.evaluate(script, &snapshot, &hostgroups)
    }
}

#[cfg(test)]
mod tests {
    use super::{Calculator, Config, Status};
    use crate::config::SourceKind;

    #[test]
    fn run_reads_configured_json_source() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let snapshot_path = dir.path().join("snapshot.json");
        let groups_path = dir.path().join("hostgroups.cfg");
        std::fs::write(
            &snapshot_path,
            r#"{"hosts": [{"name": "a", "state": "OK"}, {"name": "b", "state": "CRIT", "output": "down"}]}"#,
        )
        .expect("write snapshot");
        std::fs::write(
            &groups_path,
            "define hostgroup {\n hostgroup_name pair\n members a,b\n}\n",
        )
        .expect("write hostgroups");

        let mut config = Config::default();
        config.source.kind = SourceKind::Json;
        config.source.path = Some(snapshot_path.display().to_string());
        config.source.hostgroups_path = Some(groups_path.display().to_string());
        config.output.line_separator = " | ".to_owned();

        let calculator = Calculator::new(config).expect("valid config");
        assert_eq!(calculator.config().source.kind, SourceKind::Json);
        let result = calculator.run("@cluster( /:pair )");

        let result = result.expect("script evaluates");
        assert_eq!(result.state, Status::Warn);
        assert_eq!(result.message, "System performance degraded: | b: down");
    }

    #[test]
    fn run_requires_a_source_path() {
        let calculator = Calculator::new(Config::default()).expect("valid config");
        let error = calculator.run("OK:x").expect_err("no source configured");
        assert!(error.to_string().contains("source.path"));
    }
}
