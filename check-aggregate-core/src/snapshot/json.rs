use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::snapshot::{HostRecord, MemorySnapshot, ServiceRecord};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotDocument {
    hosts: Vec<HostRecord>,
    services: Vec<ServiceRecord>,
}

pub fn load_json_snapshot(path: &Path) -> Result<MemorySnapshot> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Snapshot(format!(
            "failed to read snapshot '{}': {err}",
            path.display()
        ))
    })?;
    parse_json_snapshot(&content)
}

pub fn parse_json_snapshot(content: &str) -> Result<MemorySnapshot> {
    let document: SnapshotDocument = serde_json::from_str(content)
        .map_err(|err| Error::Snapshot(format!("failed to parse JSON snapshot: {err}")))?;

    let mut snapshot = MemorySnapshot::new();
    for host in document.hosts {
        snapshot.insert_host(host);
    }
    for service in document.services {
        snapshot.insert_service(service);
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::parse_json_snapshot;
    use crate::snapshot::StatusSnapshot;
    use crate::status::Status;

    #[test]
    fn parses_hosts_and_services_with_defaults() {
        let snapshot = parse_json_snapshot(
            r#"{
                "hosts": [{ "name": "db1", "state": "OK", "output": "PING OK" }],
                "services": [{ "host": "db1", "description": "disk", "state": "CRIT",
                               "current_attempt": 3, "max_attempts": 3 }]
            }"#,
        )
        .expect("snapshot should parse");

        let host = snapshot.host("db1").expect("host present");
        assert!(host.notifications_enabled);
        assert_eq!(host.downtime_depth, 0);

        let disk = snapshot.service("db1", "disk").expect("service present");
        assert_eq!(disk.state, Status::Crit);
        assert!(!disk.is_soft());
    }

    #[test]
    fn reports_malformed_documents() {
        let error = parse_json_snapshot(r#"{ "hosts": [{ "name": "x" }] }"#)
            .expect_err("state is required");
        assert!(error.to_string().contains("failed to parse JSON snapshot"));
    }
}
