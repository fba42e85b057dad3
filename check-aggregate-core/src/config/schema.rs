use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub filters: FilterConfig,
    pub output: OutputConfig,
    pub source: SourceConfig,
}

/// Each flag set to true drops matching items from reference resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    pub ignore_downtime: bool,
    pub ignore_disabled_notifications: bool,
    pub ignore_soft_states: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_downtime: true,
            ignore_disabled_notifications: true,
            ignore_soft_states: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub line_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub path: Option<String>,
    pub hostgroups_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    StatusFile,
    Json,
}
