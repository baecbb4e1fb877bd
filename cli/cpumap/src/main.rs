//! cpumap CLI: inspect board profiles and check board description files.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "cpumap", version, about = "Pin and resource maps for motion-control boards")]
struct Cli {
    /// Log resolution details
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in board profiles
    List,
    /// Print the resolved table of a built-in profile
    Show {
        /// Profile name (default: the profile compiled into this build)
        #[arg(long)]
        profile: Option<String>,
        /// Limit trigger edge (any-edge, falling-edge, rising-edge)
        #[arg(long)]
        limit_trigger: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resolve a .board.toml file and report the first inconsistency
    Check {
        /// Board description file
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a .board.toml template seeded from a built-in profile
    Template {
        /// Board name
        name: String,
        /// Profile to copy (default: the profile compiled into this build)
        #[arg(long)]
        profile: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::List => commands::list::run(),
        Commands::Show {
            profile,
            limit_trigger,
            json,
        } => commands::show::run(profile.as_deref(), limit_trigger.as_deref(), json),
        Commands::Check { file, json } => commands::check::run(&file, json),
        Commands::Template { name, profile } => commands::template::run(&name, profile.as_deref()),
    }
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
    fn parses_show_flags() {
        let cli = Cli::parse_from([
            "cpumap",
            "show",
            "--profile",
            "cpu-map-2560-initial",
            "--limit-trigger",
            "rising-edge",
            "--json",
        ]);
        match cli.command {
            Commands::Show {
                profile,
                limit_trigger,
                json,
            } => {
                assert_eq!(profile.as_deref(), Some("cpu-map-2560-initial"));
                assert_eq!(limit_trigger.as_deref(), Some("rising-edge"));
                assert!(json);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["cpumap", "list", "-v"]);
        assert!(cli.verbose);
    }
}
