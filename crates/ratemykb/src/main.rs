//! ratemykb command-line entry point

use anyhow::Result;
use clap::Parser;
use ratemykb::ai::Provider;
use ratemykb::cli::rate::{self, RateArgs};
use ratemykb_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "ratemykb",
    version,
    about = "Rate the quality of notes in a Markdown vault",
    long_about = "Scans a vault for notes, classifies the ones not yet rated and keeps \
                  a categorized quality report in the vault. Interrupted runs resume \
                  from the report."
)]
struct Cli {
    /// Vault directory to rate
    #[arg(value_name = "TARGET", conflicts_with = "target")]
    target_positional: Option<PathBuf>,

    /// Vault directory to rate (alternative to the positional argument)
    #[arg(short = 't', long)]
    target: Option<PathBuf>,

    /// Config file, or a directory containing config.toml / config.yaml
    #[arg(short = 'c', long, env = "RATEMYKB_CONFIG")]
    config: Option<PathBuf>,

    /// Classifier backend, overriding the config file (ollama, heuristic)
    #[arg(long)]
    provider: Option<Provider>,

    /// Print the run summary as JSON instead of progress lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn run_command(cli: Cli) -> Result<()> {
    rate::run(RateArgs {
        target: cli.target.or(cli.target_positional),
        config: cli.config,
        provider: cli.provider,
        json: cli.json,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match init_logging(LogConfig {
        app_name: "ratemykb",
        verbose: cli.verbose,
    }) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_target_flag_or_positional() {
        let cli = Cli::try_parse_from(["ratemykb", "vault"]).unwrap();
        assert_eq!(cli.target_positional, Some(PathBuf::from("vault")));

        let cli = Cli::try_parse_from(["ratemykb", "-t", "vault", "--provider", "heuristic"]).unwrap();
        assert_eq!(cli.target, Some(PathBuf::from("vault")));
        assert_eq!(cli.provider, Some(Provider::Heuristic));

        assert!(Cli::try_parse_from(["ratemykb", "a", "-t", "b"]).is_err());
        assert!(Cli::try_parse_from(["ratemykb", "--provider", "gpt"]).is_err());
    }
}
