use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Group name to member host names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hostgroups {
    groups: BTreeMap<String, Vec<String>>,
}

impl Hostgroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, name: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.groups.entry(name.into()).or_default();
        for member in members {
            let member = member.into();
            if !entry.contains(&member) {
                entry.push(member);
            }
        }
    }

    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn define_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^define\s+([A-Za-z_]+)\s*\{\s*$").expect("define header regex is valid")
    })
}

pub fn load_hostgroups(path: &Path) -> Result<Hostgroups> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Config(format!(
            "failed to read hostgroup config '{}': {err}",
            path.display()
        ))
    })?;
    let groups = parse_hostgroups(&content)?;
    tracing::debug!(path = %path.display(), groups = groups.len(), "loaded hostgroups");
    Ok(groups)
}

/// Collects `define hostgroup { ... }` objects from an object configuration
/// file. Other object types are skipped.
pub fn parse_hostgroups(content: &str) -> Result<Hostgroups> {
    let mut groups = Hostgroups::new();
    let mut in_block: Option<(bool, usize)> = None;
    let mut name: Option<String> = None;
    let mut members: Vec<String> = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        match in_block {
            None => {
                let Some(captures) = define_header().captures(line) else {
                    return Err(Error::Config(format!(
                        "line {line_no}: expected 'define <type> {{', found '{line}'"
                    )));
                };
                in_block = Some((&captures[1] == "hostgroup", line_no));
                name = None;
                members.clear();
            }
            Some((is_hostgroup, started)) => {
                if line == "}" {
                    if is_hostgroup {
                        let Some(group) = name.take() else {
                            return Err(Error::Config(format!(
                                "hostgroup defined on line {started} has no hostgroup_name"
                            )));
                        };
                        groups.insert(group, members.drain(..));
                    }
                    in_block = None;
                    continue;
                }
                if !is_hostgroup {
                    continue;
                }

                let (key, value) = line
                    .split_once(char::is_whitespace)
                    .map(|(key, value)| (key, value.trim()))
                    .unwrap_or((line, ""));
                match key {
                    "hostgroup_name" => name = Some(value.to_owned()),
                    "members" => members.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|member| !member.is_empty())
                            .map(str::to_owned),
                    ),
                    _ => {}
                }
            }
        }
    }

    if let Some((_, started)) = in_block {
        return Err(Error::Config(format!(
            "definition opened on line {started} is never closed"
        )));
    }

    Ok(groups)
}

fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return "";
    }
    match line.find(';') {
        Some(index) => &line[..index],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_hostgroups;

    #[test]
    fn parses_hostgroup_definitions() {
        let groups = parse_hostgroups(
            r#"
# web tier
define hostgroup {
    hostgroup_name  web       ; front ends
    alias           Web servers
    members         web1, web2,web3
}

define host {
    host_name web1
}

define hostgroup{
    hostgroup_name db
    members db1
    members db2
}
"#,
        )
        .expect("config should parse");

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups.members("web"),
            Some(&["web1".to_owned(), "web2".to_owned(), "web3".to_owned()][..])
        );
        assert_eq!(groups.members("db").map(<[String]>::len), Some(2));
        assert!(groups.members("mail").is_none());
    }

    #[test]
    fn file_without_hostgroups_is_empty() {
        let groups = parse_hostgroups("define host {\n host_name web1\n}\n")
            .expect("config should parse");
        assert!(groups.is_empty());
        assert!(!parse_hostgroups("define hostgroup {\n hostgroup_name g\n}\n")
            .expect("config should parse")
            .is_empty());
    }

    #[test]
    fn rejects_hostgroup_without_name() {
        let error = parse_hostgroups("define hostgroup {\n members a\n}\n")
            .expect_err("name is required");
        assert!(error.to_string().contains("has no hostgroup_name"));
    }
}
