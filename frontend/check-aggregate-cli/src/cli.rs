use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "check_aggregate",
    about = "Reduce host and service status to a single plugin result"
)]
pub struct Cli {
    /// TOML configuration file. Defaults to ./check_aggregate.toml when present.
    #[arg(long, env = "CHECK_AGGREGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read the script from a file instead of the command line.
    #[arg(short = 'f', long, conflicts_with = "expression")]
    pub script: Option<PathBuf>,

    #[arg(short = 's', long, conflicts_with = "snapshot_json")]
    pub status_file: Option<PathBuf>,

    #[arg(long)]
    pub snapshot_json: Option<PathBuf>,

    /// Object configuration file holding hostgroup definitions.
    #[arg(short = 'g', long)]
    pub hostgroups: Option<PathBuf>,

    #[arg(long)]
    pub include_downtime: bool,

    #[arg(long)]
    pub include_disabled_notifications: bool,

    #[arg(long)]
    pub ignore_soft_states: bool,

    /// Separator placed between concatenated messages.
    #[arg(long)]
    pub separator: Option<String>,

    #[arg(short, long)]
    pub verbose: bool,

    /// Inline script; arguments are joined with spaces.
    pub expression: Vec<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
