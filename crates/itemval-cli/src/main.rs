//! # itemval CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use itemval_cli::check::{run_check_settings, CheckSettingsArgs};
use itemval_cli::validate::{run_validate, ValidateArgs};

/// Item validation pipeline: checks scraped records against JSON schemas
/// and models declared in a settings file.
#[derive(Parser, Debug)]
#[command(name = "itemval", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON-lines item stream.
    Validate(ValidateArgs),

    /// Build the declared validators and list them per type.
    CheckSettings(CheckSettingsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::CheckSettings(args) => run_check_settings(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_validate_defaults() {
        let cli = Cli::try_parse_from(["itemval", "validate", "--settings", "s.yaml"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.settings.to_str(), Some("s.yaml"));
        assert_eq!(args.items.to_str(), Some("-"));
        assert_eq!(args.type_field, "_type");
        assert!(args.out.is_none());
        assert!(args.stats.is_none());
    }

    #[test]
    fn cli_parse_check_settings() {
        let cli = Cli::try_parse_from([
            "itemval",
            "-vv",
            "check-settings",
            "--settings",
            "s.json",
            "--catalog",
            "c.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::CheckSettings(_)));
    }

    #[test]
    fn cli_requires_settings() {
        assert!(Cli::try_parse_from(["itemval", "validate"]).is_err());
    }
}
