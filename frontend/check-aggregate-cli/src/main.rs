mod cli;

use check_aggregate_core::config::{self, Config, SourceKind};
use check_aggregate_core::script::join_script_lines;
use check_aggregate_core::{Calculator, Error, Status, StatusItem};

fn main() {
    let code = match run() {
        Ok(result) => {
            println!("{}", result.message);
            result.state.exit_code()
        }
        Err(error) => {
            println!("{} - {error}", Status::Unknown);
            Status::Unknown.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> check_aggregate_core::Result<StatusItem> {
    let args = cli::Cli::parse_args();
    check_aggregate_core::logging::init_tracing(if args.verbose { "debug" } else { "warn" });

    let mut config = config::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let script = read_script(&args)?;
    let calculator = Calculator::new(config)?;
    tracing::debug!(
        source = ?calculator.config().source.kind,
        filters = ?calculator.config().filters,
        "configuration ready"
    );
    let result = calculator.run(&script)?;
    tracing::debug!(state = %result.state, "evaluation finished");
    Ok(result)
}

fn apply_overrides(config: &mut Config, args: &cli::Cli) {
    if let Some(path) = &args.status_file {
        config.source.kind = SourceKind::StatusFile;
        config.source.path = Some(path.display().to_string());
    }
    if let Some(path) = &args.snapshot_json {
        config.source.kind = SourceKind::Json;
        config.source.path = Some(path.display().to_string());
    }
    if let Some(path) = &args.hostgroups {
        config.source.hostgroups_path = Some(path.display().to_string());
    }
    if args.include_downtime {
        config.filters.ignore_downtime = false;
    }
    if args.include_disabled_notifications {
        config.filters.ignore_disabled_notifications = false;
    }
    if args.ignore_soft_states {
        config.filters.ignore_soft_states = true;
    }
    if let Some(separator) = &args.separator {
        config.output.line_separator = separator.clone();
    }
}

fn read_script(args: &cli::Cli) -> check_aggregate_core::Result<String> {
    if let Some(path) = &args.script {
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("failed to read script '{}': {err}", path.display()))
        })?;
        return Ok(join_script_lines(&content));
    }

    if args.expression.is_empty() {
        return Err(Error::Config(
            "no script given: pass --script FILE or an inline expression".to_owned(),
        ));
    }
    Ok(args.expression.join(" "))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{apply_overrides, cli::Cli, read_script};
    use check_aggregate_core::config::{Config, SourceKind};

    #[test]
    fn flags_override_config_values() {
        let args = Cli::try_parse_from([
            "check_aggregate",
            "--snapshot-json",
            "/tmp/snap.json",
            "--include-downtime",
            "--ignore-soft-states",
            "--separator",
            ", ",
            "@max(",
            "/%",
            ")",
        ])
        .expect("arguments parse");

        let mut config = Config::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.source.kind, SourceKind::Json);
        assert_eq!(config.source.path.as_deref(), Some("/tmp/snap.json"));
        assert!(!config.filters.ignore_downtime);
        assert!(config.filters.ignore_disabled_notifications);
        assert!(config.filters.ignore_soft_states);
        assert_eq!(config.output.line_separator, ", ");
        assert_eq!(read_script(&args).expect("inline script"), "@max( /% )");
    }

    #[test]
    fn missing_script_is_reported() {
        let args = Cli::try_parse_from(["check_aggregate"]).expect("arguments parse");
        let error = read_script(&args).expect_err("no script");
        assert!(error.to_string().contains("no script given"));
    }
}
