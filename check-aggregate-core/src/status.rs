use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Plugin status with the monitoring exit-code ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok = 0,
    Warn = 1,
    Crit = 2,
    Unknown = 3,
}

impl Status {
    /// Looks a name up in the canonical table. Case-insensitive; accepts the
    /// service names, their long forms, host state names and the raw codes
    /// `0..=4` (4 is PENDING and counts as UNKNOWN).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "OK" | "UP" | "0" => Some(Self::Ok),
            "WARN" | "WARNING" | "1" => Some(Self::Warn),
            "CRIT" | "CRITICAL" | "DOWN" | "2" => Some(Self::Crit),
            "UNKNOWN" | "UNK" | "UNREACHABLE" | "PENDING" | "3" | "4" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Host check results use their own code space: 0 UP, 1 DOWN, 2 UNREACHABLE.
    pub fn from_host_code(code: i64) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Crit,
            _ => Self::Unknown,
        }
    }

    pub fn from_service_code(code: i64) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Warn,
            2 => Self::Crit,
            _ => Self::Unknown,
        }
    }

    /// Maps an ordinal back to a status, saturating at UNKNOWN.
    pub fn from_ordinal(value: u64) -> Self {
        match value {
            0 => Self::Ok,
            1 => Self::Warn,
            2 => Self::Crit,
            _ => Self::Unknown,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn exit_code(self) -> i32 {
        i32::from(self.ordinal())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARNING",
            Self::Crit => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_name(value).ok_or_else(|| Error::BadState(value.to_owned()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The single value type flowing through evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub state: Status,
    pub message: String,
    pub host: Option<String>,
    pub service: Option<String>,
}

impl StatusItem {
    pub fn literal(state: Status, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
            host: None,
            service: None,
        }
    }

    pub fn for_host(state: Status, message: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
            host: Some(host.into()),
            service: None,
        }
    }

    pub fn for_service(
        state: Status,
        message: impl Into<String>,
        host: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            state,
            message: message.into(),
            host: Some(host.into()),
            service: Some(service.into()),
        }
    }

    /// Message prefixed with `host[/service]: ` when the item came from the
    /// status source; literals render their bare message.
    pub fn formatted(&self) -> String {
        match (&self.host, &self.service) {
            (Some(host), Some(service)) => format!("{host}/{service}: {}", self.message),
            (Some(host), None) => format!("{host}: {}", self.message),
            _ => self.message.clone(),
        }
    }
}
