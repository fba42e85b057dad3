use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::snapshot::{HostRecord, MemorySnapshot, ServiceRecord};
use crate::status::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Host,
    Service,
    Other,
}

impl BlockKind {
    fn from_header(name: &str) -> Self {
        match name {
            "hoststatus" | "host" => Self::Host,
            "servicestatus" | "service" => Self::Service,
            _ => Self::Other,
        }
    }
}

pub fn load_status_file(path: &Path) -> Result<MemorySnapshot> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Snapshot(format!(
            "failed to read status file '{}': {err}",
            path.display()
        ))
    })?;
    let snapshot = parse_status_file(&content)?;
    tracing::debug!(
        path = %path.display(),
        hosts = snapshot.host_count(),
        services = snapshot.service_count(),
        "loaded status file"
    );
    Ok(snapshot)
}

/// Parses the daemon's block-structured status file. Blocks other than host
/// and service status (info, program, contact, comment ...) are skipped, as
/// are records missing the fields needed to key them.
pub fn parse_status_file(content: &str) -> Result<MemorySnapshot> {
    let mut snapshot = MemorySnapshot::new();
    let mut current: Option<(BlockKind, usize)> = None;
    let mut fields: HashMap<&str, &str> = HashMap::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_suffix('{').filter(|_| !line.contains('=')) {
            if let Some((_, started)) = current {
                return Err(Error::Snapshot(format!(
                    "line {line_no}: block opened before block from line {started} was closed"
                )));
            }
            current = Some((BlockKind::from_header(header.trim()), line_no));
            fields.clear();
            continue;
        }

        if line == "}" {
            let Some((kind, started)) = current.take() else {
                return Err(Error::Snapshot(format!(
                    "line {line_no}: closing brace without open block"
                )));
            };
            match kind {
                BlockKind::Host => match host_from_fields(&fields) {
                    Some(host) => snapshot.insert_host(host),
                    None => tracing::warn!(line = started, "skipping incomplete host status block"),
                },
                BlockKind::Service => match service_from_fields(&fields) {
                    Some(service) => snapshot.insert_service(service),
                    None => {
                        tracing::warn!(line = started, "skipping incomplete service status block")
                    }
                },
                BlockKind::Other => {}
            }
            continue;
        }

        if current.is_some() {
            if let Some((key, value)) = line.split_once('=') {
                fields.insert(key.trim(), value);
            }
        }
    }

    if let Some((_, started)) = current {
        return Err(Error::Snapshot(format!(
            "block opened on line {started} is never closed"
        )));
    }

    Ok(snapshot)
}

fn host_from_fields(fields: &HashMap<&str, &str>) -> Option<HostRecord> {
    let name = fields.get("host_name")?.trim();
    if name.is_empty() {
        return None;
    }
    let state = int_field(fields, "current_state")?;

    Some(HostRecord {
        name: name.to_owned(),
        state: Status::from_host_code(state),
        notifications_enabled: flag_field(fields, "notifications_enabled"),
        downtime_depth: count_field(fields, "scheduled_downtime_depth", 0),
        output: text_field(fields, "plugin_output"),
    })
}

fn service_from_fields(fields: &HashMap<&str, &str>) -> Option<ServiceRecord> {
    let host = fields.get("host_name")?.trim();
    let description = fields.get("service_description")?.trim();
    if host.is_empty() || description.is_empty() {
        return None;
    }
    let state = int_field(fields, "current_state")?;

    Some(ServiceRecord {
        host: host.to_owned(),
        description: description.to_owned(),
        state: Status::from_service_code(state),
        notifications_enabled: flag_field(fields, "notifications_enabled"),
        downtime_depth: count_field(fields, "scheduled_downtime_depth", 0),
        output: text_field(fields, "plugin_output"),
        current_attempt: count_field(fields, "current_attempt", 1),
        max_attempts: count_field(fields, "max_attempts", 1),
    })
}

fn int_field(fields: &HashMap<&str, &str>, key: &str) -> Option<i64> {
    fields.get(key).and_then(|value| value.trim().parse().ok())
}

fn count_field(fields: &HashMap<&str, &str>, key: &str, default: u32) -> u32 {
    fields
        .get(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

// Absent flag means the daemon never turned it off.
fn flag_field(fields: &HashMap<&str, &str>, key: &str) -> bool {
    fields
        .get(key)
        .map(|value| value.trim() != "0")
        .unwrap_or(true)
}

fn text_field(fields: &HashMap<&str, &str>, key: &str) -> String {
    fields
        .get(key)
        .map(|value| value.trim().to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::parse_status_file;
    use crate::snapshot::StatusSnapshot;
    use crate::status::Status;

    const SAMPLE: &str = r#"
# generated status
info {
	created=1700000000
	version=3.5.1
	}

hoststatus {
	host_name=web1
	current_state=1
	plugin_output=CRITICAL - Host Unreachable (10.0.0.1)
	notifications_enabled=1
	scheduled_downtime_depth=0
	}

hoststatus {
	host_name=web2
	current_state=2
	plugin_output=
	notifications_enabled=0
	scheduled_downtime_depth=1
	}

servicestatus {
	host_name=web1
	service_description=HTTP
	current_state=1
	current_attempt=2
	max_attempts=4
	plugin_output=HTTP WARNING: slow response=2.3s
	notifications_enabled=1
	scheduled_downtime_depth=0
	}

servicestatus {
	host_name=web1
	current_state=0
	}
"#;

    #[test]
    fn parses_host_and_service_blocks() {
        let snapshot = parse_status_file(SAMPLE).expect("sample should parse");

        let web1 = snapshot.host("web1").expect("web1 present");
        assert_eq!(web1.state, Status::Crit);
        assert_eq!(web1.output, "CRITICAL - Host Unreachable (10.0.0.1)");

        let web2 = snapshot.host("web2").expect("web2 present");
        assert_eq!(web2.state, Status::Unknown);
        assert!(!web2.notifications_enabled);
        assert_eq!(web2.downtime_depth, 1);

        let http = snapshot.service("web1", "HTTP").expect("service present");
        assert_eq!(http.state, Status::Warn);
        assert!(http.is_soft());
        assert_eq!(http.output, "HTTP WARNING: slow response=2.3s");

        assert_eq!(snapshot.service_count(), 1);
    }

    #[test]
    fn accepts_legacy_block_names() {
        let content = "host {\nhost_name=legacy\ncurrent_state=0\n}\nservice {\nhost_name=legacy\nservice_description=PING\ncurrent_state=2\n}\n";
        let snapshot = parse_status_file(content).expect("legacy blocks parse");
        assert_eq!(
            snapshot.service("legacy", "PING").map(|s| s.state),
            Some(Status::Crit)
        );
    }

    #[test]
    fn rejects_unclosed_block() {
        let error = parse_status_file("hoststatus {\nhost_name=a\n").expect_err("unclosed block");
        assert!(error.to_string().contains("never closed"));
    }
}
