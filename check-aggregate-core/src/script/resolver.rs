use regex::Regex;

use crate::config::schema::FilterConfig;
use crate::error::{Error, Result};
use crate::script::tokenizer::Lexeme;
use crate::script::Token;
use crate::snapshot::{Hostgroups, StatusSnapshot};
use crate::status::{Status, StatusItem};

const REFERENCE_PREFIX: char = '/';
const WILDCARD_PREFIX: char = '%';
const HOSTGROUP_PREFIX: char = ':';

/// How the host part of a reference was written. Only explicit hosts raise
/// lookup errors; wildcard and hostgroup expansion drop what is missing.
#[derive(Debug)]
enum HostSelection {
    Explicit(String),
    Expanded(Vec<String>),
}

pub struct Resolver<'a> {
    snapshot: &'a dyn StatusSnapshot,
    hostgroups: &'a Hostgroups,
    filters: FilterConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(
        snapshot: &'a dyn StatusSnapshot,
        hostgroups: &'a Hostgroups,
        filters: FilterConfig,
    ) -> Self {
        Self {
            snapshot,
            hostgroups,
            filters,
        }
    }

    /// Replaces every word with the items it refers to. Function names and
    /// parentheses pass through unchanged.
    pub fn resolve(&self, lexemes: Vec<Lexeme>) -> Result<Vec<Token>> {
        let mut tokens = Vec::with_capacity(lexemes.len());
        for lexeme in lexemes {
            match lexeme {
                Lexeme::Function(name) => tokens.push(Token::Function(name)),
                Lexeme::Open => tokens.push(Token::Open),
                Lexeme::Close => tokens.push(Token::Close),
                Lexeme::Word(word) => {
                    tokens.extend(self.resolve_word(&word)?.into_iter().map(Token::Item))
                }
            }
        }
        Ok(tokens)
    }

    pub fn resolve_word(&self, word: &str) -> Result<Vec<StatusItem>> {
        if let Some(reference) = word.strip_prefix(REFERENCE_PREFIX) {
            return match reference.split_once(REFERENCE_PREFIX) {
                Some((host_part, service_part)) => self.resolve_services(host_part, service_part),
                None => self.resolve_hosts(reference),
            };
        }

        if word.contains(':') {
            return parse_literal(word).map(|item| vec![item]);
        }

        Err(Error::Syntax(format!("unexpected constant '{word}' in parameters")))
    }

    fn resolve_hosts(&self, host_part: &str) -> Result<Vec<StatusItem>> {
        let names = match self.select_hosts(host_part)? {
            HostSelection::Explicit(name) => vec![name],
            HostSelection::Expanded(names) => names,
        };

        let mut items = Vec::with_capacity(names.len());
        for name in names {
            let Some(host) = self.snapshot.host(&name) else {
                continue;
            };
            if self.excluded(host.downtime_depth, host.notifications_enabled, false) {
                tracing::debug!(host = %name, "host filtered out");
                continue;
            }
            items.push(StatusItem::for_host(host.state, &host.output, &host.name));
        }
        Ok(items)
    }

    fn resolve_services(&self, host_part: &str, service_part: &str) -> Result<Vec<StatusItem>> {
        let (names, explicit_host) = match self.select_hosts(host_part)? {
            HostSelection::Explicit(name) => (vec![name], true),
            HostSelection::Expanded(names) => (names, false),
        };

        let wildcard = match service_part.strip_prefix(WILDCARD_PREFIX) {
            Some(pattern) => Some(compile_wildcard(pattern)?),
            None => None,
        };

        let mut items = Vec::new();
        for host in &names {
            let descriptions: Vec<&str> = match &wildcard {
                Some(regex) => self
                    .snapshot
                    .service_descriptions(host)
                    .into_iter()
                    .filter(|description| regex.is_match(description))
                    .collect(),
                None => {
                    if self.snapshot.service(host, service_part).is_none() {
                        if explicit_host {
                            return Err(Error::UnknownService {
                                host: host.clone(),
                                service: service_part.to_owned(),
                            });
                        }
                        continue;
                    }
                    vec![service_part]
                }
            };

            for description in descriptions {
                let Some(service) = self.snapshot.service(host, description) else {
                    continue;
                };
                if self.excluded(
                    service.downtime_depth,
                    service.notifications_enabled,
                    service.is_soft(),
                ) {
                    tracing::debug!(host = %host, service = %description, "service filtered out");
                    continue;
                }
                items.push(StatusItem::for_service(
                    service.state,
                    &service.output,
                    &service.host,
                    &service.description,
                ));
            }
        }
        Ok(items)
    }

    fn select_hosts(&self, host_part: &str) -> Result<HostSelection> {
        if let Some(pattern) = host_part.strip_prefix(WILDCARD_PREFIX) {
            let regex = compile_wildcard(pattern)?;
            let names = self
                .snapshot
                .host_names()
                .into_iter()
                .filter(|name| regex.is_match(name))
                .map(str::to_owned)
                .collect();
            return Ok(HostSelection::Expanded(names));
        }

        if let Some(group) = host_part.strip_prefix(HOSTGROUP_PREFIX) {
            let Some(members) = self.hostgroups.members(group) else {
                tracing::debug!(hostgroup = %group, "hostgroup is not defined");
                return Ok(HostSelection::Expanded(Vec::new()));
            };
            let names = members
                .iter()
                .filter(|member| {
                    let known = self.snapshot.host(member).is_some();
                    if !known {
                        tracing::debug!(hostgroup = %group, host = %member, "hostgroup member has no status");
                    }
                    known
                })
                .cloned()
                .collect();
            return Ok(HostSelection::Expanded(names));
        }

        if self.snapshot.host(host_part).is_none() {
            return Err(Error::UnknownHost(host_part.to_owned()));
        }
        Ok(HostSelection::Explicit(host_part.to_owned()))
    }

    fn excluded(&self, downtime_depth: u32, notifications_enabled: bool, soft: bool) -> bool {
        (self.filters.ignore_downtime && downtime_depth > 0)
            || (self.filters.ignore_disabled_notifications && !notifications_enabled)
            || (self.filters.ignore_soft_states && soft)
    }
}

/// Parses `STATUS:text` into a host-less item.
pub fn parse_literal(word: &str) -> Result<StatusItem> {
    let (state, text) = word
        .split_once(':')
        .ok_or_else(|| Error::Syntax(format!("'{word}' is not a STATUS:text literal")))?;
    let state: Status = state.parse()?;
    Ok(StatusItem::literal(state, text))
}

// An empty pattern matches everything.
fn compile_wildcard(pattern: &str) -> Result<Regex> {
    let pattern = if pattern.is_empty() { "." } else { pattern };
    Regex::new(pattern)
        .map_err(|err| Error::Syntax(format!("invalid wildcard pattern '{pattern}': {err}")))
}
