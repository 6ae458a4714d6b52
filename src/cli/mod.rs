//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for xdr-sweep using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// xdr-sweep - XDR alert fetcher and bulk closer
#[derive(Parser, Debug)]
#[command(name = "xdr-sweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "xdr-sweep.toml", env = "XDR_SWEEP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "XDR_SWEEP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all alerts, then optionally filter and close them
    Fetch(commands::fetch::FetchArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_fetch() {
        let cli = Cli::parse_from(["xdr-sweep", "fetch"]);
        assert_eq!(cli.config, "xdr-sweep.toml");
        assert!(matches!(cli.command, Commands::Fetch(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["xdr-sweep", "--config", "custom.toml", "fetch"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_fetch_overrides() {
        let cli = Cli::parse_from([
            "xdr-sweep",
            "fetch",
            "--page",
            "3",
            "--max-concurrent-pages",
            "8",
            "--filter",
            "--no-close",
            "--yes",
        ]);

        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(args.page, Some(3));
        assert_eq!(args.max_concurrent_pages, Some(8));
        assert!(args.filter);
        assert!(args.no_close);
        assert!(args.yes);
    }

    #[test]
    fn test_cli_rejects_conflicting_filter_flags() {
        let result = Cli::try_parse_from(["xdr-sweep", "fetch", "--filter", "--no-filter"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["xdr-sweep", "--log-level", "debug", "fetch"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["xdr-sweep", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["xdr-sweep", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
