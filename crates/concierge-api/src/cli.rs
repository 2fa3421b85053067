//! CLI definitions for the `concierge` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hotel concierge chat relay.
#[derive(Parser)]
#[command(name = "concierge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "CONCIERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP relay.
    Serve {
        /// Port to listen on (overrides `server.port`).
        #[arg(short, long, env = "CONCIERGE_PORT")]
        port: Option<u16>,

        /// Host to bind to (overrides `server.host`).
        #[arg(long, env = "CONCIERGE_HOST")]
        host: Option<String>,
    },

    /// Send a minimal request to the configured model and print the reply.
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "concierge", "-vv", "--config", "alt.toml", "serve", "--port", "9000", "--host", "0.0.0.0",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("alt.toml")));
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
            }
            Commands::Check => panic!("expected serve"),
        }
    }

    #[test]
    fn check_takes_no_arguments() {
        let cli = Cli::try_parse_from(["concierge", "--quiet", "check"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Check));
        assert!(Cli::try_parse_from(["concierge", "check", "--port", "1"]).is_err());
    }
}
