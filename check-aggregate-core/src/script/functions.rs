use std::sync::OnceLock;

use regex::Regex;

use crate::status::{Status, StatusItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Max,
    Min,
    Avg,
    Median,
    Cluster,
    Map,
    MapStatus,
    Threshold,
}

// Matched as case-insensitive substrings, first hit wins, so `mapstatus`
// has to be tried before `map`.
const NAME_TABLE: &[(&str, Function)] = &[
    ("mapstatus", Function::MapStatus),
    ("map", Function::Map),
    ("max", Function::Max),
    ("min", Function::Min),
    ("median", Function::Median),
    ("average", Function::Avg),
    ("avg", Function::Avg),
    ("clus", Function::Cluster),
    ("thresh", Function::Threshold),
];

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        NAME_TABLE
            .iter()
            .find(|(key, _)| name.contains(key))
            .map(|(_, function)| *function)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
            Self::Avg => "avg",
            Self::Median => "median",
            Self::Cluster => "cluster",
            Self::Map => "map",
            Self::MapStatus => "mapstatus",
            Self::Threshold => "threshold",
        }
    }

    /// Reduces `params` to one item. Concatenated messages are joined with
    /// `separator`.
    pub fn apply(self, params: &[StatusItem], separator: &str) -> StatusItem {
        match self {
            Self::Max => max(params, separator),
            Self::Min => min(params, separator),
            Self::Avg => avg(params),
            Self::Median => StatusItem::literal(Status::Unknown, "Function not yet written"),
            Self::Cluster => cluster(params, separator),
            Self::Map => map(params, separator),
            Self::MapStatus => map_status(params),
            Self::Threshold => threshold(params),
        }
    }
}

fn push_fragment(buffer: &mut String, fragment: &str, separator: &str) {
    if fragment.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push_str(separator);
    }
    buffer.push_str(fragment);
}

/// Worst known state. UNKNOWN items never win.
fn max(params: &[StatusItem], separator: &str) -> StatusItem {
    let Some(state) = params
        .iter()
        .map(|item| item.state)
        .filter(|state| *state != Status::Unknown)
        .max()
    else {
        return StatusItem::literal(Status::Unknown, "Unknown status");
    };

    let mut message = String::new();
    for item in params.iter().filter(|item| item.state == state) {
        push_fragment(&mut message, &item.formatted(), separator);
    }
    if message.is_empty() {
        message = "All parameters OK".to_owned();
    }
    StatusItem::literal(state, message)
}

/// Best state. Every item that ties or lowers the running minimum is kept in
/// the message, including ones later undercut.
fn min(params: &[StatusItem], separator: &str) -> StatusItem {
    if params.is_empty() {
        return StatusItem::literal(Status::Unknown, "All values unknown");
    }

    let mut state = Status::Unknown;
    let mut trace = String::new();
    for item in params {
        if item.state <= state {
            state = item.state;
            push_fragment(&mut trace, &item.formatted(), separator);
        }
    }

    if state == Status::Ok {
        return StatusItem::literal(Status::Ok, "All parameters OK");
    }
    StatusItem::literal(state, trace)
}

fn avg(params: &[StatusItem]) -> StatusItem {
    if params.is_empty() {
        return StatusItem::literal(Status::Unknown, "No items in list");
    }

    let sum: u32 = params.iter().map(|item| u32::from(item.state.ordinal())).sum();
    let mean = f64::from(sum) / params.len() as f64;
    let rounded = (mean + 0.500001).floor() as u64;
    StatusItem::literal(Status::from_ordinal(rounded), "Average status")
}

fn cluster(params: &[StatusItem], separator: &str) -> StatusItem {
    let mut lowest = Status::Unknown;
    let mut highest = Status::Ok;
    let mut trace = String::new();

    for item in params {
        lowest = lowest.min(item.state);
        highest = highest.max(item.state);
        if item.state > Status::Ok {
            trace.push_str(separator);
            trace.push_str(&item.formatted());
        }
    }

    if lowest == Status::Unknown {
        StatusItem::literal(Status::Unknown, "All status unknown")
    } else if lowest == Status::Crit {
        StatusItem::literal(Status::Crit, format!("System Critical:{trace}"))
    } else if highest > Status::Ok {
        StatusItem::literal(
            Status::Warn,
            format!("System performance degraded:{trace}"),
        )
    } else {
        StatusItem::literal(Status::Ok, "All items OK")
    }
}

/// Takes the first item's state. Later items sharing that state replace the
/// first item's message with their own.
fn map(params: &[StatusItem], separator: &str) -> StatusItem {
    let Some((first, rest)) = params.split_first() else {
        return StatusItem::literal(Status::Unknown, "No parameters given");
    };

    let mut matches = String::new();
    for item in rest.iter().filter(|item| item.state == first.state) {
        push_fragment(&mut matches, &item.formatted(), separator);
    }

    let message = if matches.is_empty() {
        first.message.clone()
    } else {
        matches
    };
    StatusItem::literal(first.state, message)
}

/// Each rule after the first item is a `FROM:TO` literal: its state is FROM
/// and its message names TO. Rules apply in order; unrecognised targets map
/// to UNKNOWN.
fn map_status(params: &[StatusItem]) -> StatusItem {
    let Some((first, rules)) = params.split_first() else {
        return StatusItem::literal(Status::Unknown, "No parameters given");
    };

    let mut state = first.state;
    for rule in rules {
        if rule.state == state {
            state = Status::from_name(&rule.message).unwrap_or(Status::Unknown);
        }
    }
    StatusItem::literal(state, first.message.clone())
}

fn threshold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)/(\d+)/(\d+)/(\d+)$").expect("threshold regex is valid")
    })
}

fn parse_thresholds(spec: &str) -> Option<[u64; 4]> {
    let captures = threshold_pattern().captures(spec)?;
    let mut bounds = [0u64; 4];
    for (slot, bound) in bounds.iter_mut().enumerate() {
        *bound = captures[slot + 1].parse().ok()?;
    }
    Some(bounds)
}

/// First item's message holds `minc/minw/maxw/maxc`; the remaining states are
/// summed as plain integers and compared against those bounds.
fn threshold(params: &[StatusItem]) -> StatusItem {
    let (spec, values) = match params.split_first() {
        Some((first, rest)) => (first.message.as_str(), rest),
        None => ("", params),
    };
    let Some([min_crit, min_warn, max_warn, max_crit]) = parse_thresholds(spec) else {
        return StatusItem::literal(
            Status::Unknown,
            format!("Wrong format for thresholds:{spec}"),
        );
    };

    let total: u64 = values
        .iter()
        .map(|item| u64::from(item.state.ordinal()))
        .sum();

    if total < min_crit || total > max_crit {
        StatusItem::literal(Status::Crit, format!("Status is CRITICAL ({total})"))
    } else if total < min_warn || total > max_warn {
        StatusItem::literal(Status::Warn, format!("Status is WARNING ({total})"))
    } else {
        StatusItem::literal(Status::Ok, format!("Status is OK ({total})"))
    }
}
