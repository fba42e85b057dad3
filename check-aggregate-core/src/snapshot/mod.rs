pub mod hostgroups;
pub mod json;
pub mod status_file;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::status::Status;

pub use hostgroups::{load_hostgroups, parse_hostgroups, Hostgroups};
pub use json::{load_json_snapshot, parse_json_snapshot};
pub use status_file::{load_status_file, parse_status_file};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub name: String,
    pub state: Status,
    #[serde(default = "enabled")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub downtime_depth: u32,
    #[serde(default)]
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub host: String,
    pub description: String,
    pub state: Status,
    #[serde(default = "enabled")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub downtime_depth: u32,
    #[serde(default)]
    pub output: String,
    #[serde(default = "one")]
    pub current_attempt: u32,
    #[serde(default = "one")]
    pub max_attempts: u32,
}

impl ServiceRecord {
    pub fn is_soft(&self) -> bool {
        self.current_attempt < self.max_attempts
    }
}

fn enabled() -> bool {
    true
}

fn one() -> u32 {
    1
}

/// Point-in-time view of host and service health, read-only for the
/// duration of one evaluation.
pub trait StatusSnapshot {
    fn host(&self, name: &str) -> Option<&HostRecord>;

    /// All host names, in a stable order.
    fn host_names(&self) -> Vec<&str>;

    fn service(&self, host: &str, description: &str) -> Option<&ServiceRecord>;

    /// Service descriptions known for `host`, in a stable order.
    fn service_descriptions(&self, host: &str) -> Vec<&str>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    hosts: BTreeMap<String, HostRecord>,
    services: BTreeMap<String, BTreeMap<String, ServiceRecord>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_host(&mut self, host: HostRecord) {
        self.hosts.insert(host.name.clone(), host);
    }

    pub fn insert_service(&mut self, service: ServiceRecord) {
        self.services
            .entry(service.host.clone())
            .or_default()
            .insert(service.description.clone(), service);
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn service_count(&self) -> usize {
        self.services.values().map(BTreeMap::len).sum()
    }
}

impl StatusSnapshot for MemorySnapshot {
    fn host(&self, name: &str) -> Option<&HostRecord> {
        self.hosts.get(name)
    }

    fn host_names(&self) -> Vec<&str> {
        self.hosts.keys().map(String::as_str).collect()
    }

    fn service(&self, host: &str, description: &str) -> Option<&ServiceRecord> {
        self.services
            .get(host)
            .and_then(|services| services.get(description))
    }

    fn service_descriptions(&self, host: &str) -> Vec<&str> {
        self.services
            .get(host)
            .map(|services| services.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{HostRecord, MemorySnapshot, ServiceRecord, StatusSnapshot};
    use crate::status::Status;

    #[test]
    fn memory_snapshot_orders_names() {
        let mut snapshot = MemorySnapshot::new();
        for name in ["web2", "db1", "web1"] {
            snapshot.insert_host(HostRecord {
                name: name.to_owned(),
                state: Status::Ok,
                notifications_enabled: true,
                downtime_depth: 0,
                output: String::new(),
            });
        }
        snapshot.insert_service(ServiceRecord {
            host: "db1".to_owned(),
            description: "load".to_owned(),
            state: Status::Warn,
            notifications_enabled: true,
            downtime_depth: 0,
            output: "load high".to_owned(),
            current_attempt: 1,
            max_attempts: 3,
        });

        assert_eq!(snapshot.host_names(), vec!["db1", "web1", "web2"]);
        assert_eq!(snapshot.service_descriptions("db1"), vec!["load"]);
        assert!(snapshot.service_descriptions("web1").is_empty());
        let service = snapshot.service("db1", "load").expect("service exists");
        assert!(service.is_soft());
        assert_eq!(snapshot.service_count(), 1);
    }
}
