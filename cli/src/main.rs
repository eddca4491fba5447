use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod command;
mod error;
mod ui;

use threadwatch::config::ThreadwatchConfig;

use crate::error::*;

#[derive(Debug, Parser)]
#[command(name = "Threadwatch", version = env!("CARGO_PKG_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
struct Opt {
    #[arg(short = 'v', action = ArgAction::Count, help = "Verbosity")]
    verbosity: u8,

    #[command(flatten)]
    general_options: GeneralOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
pub struct GeneralOptions {
    #[arg(long = "config-path", global = true, help = "Specify config file to use")]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "generate-config", about = "Generate default configuration file")]
    GenerateConfig,

    #[command(name = "check", about = "Check watched threads for new posts and send a notification")]
    Check {
        #[arg(long = "dry-run", help = "Print the notification instead of sending it")]
        dry_run: bool,
    },
}

fn main() {
    let opt = Opt::parse();

    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'myprog -v -v -v' or 'myprog -vvv' vs 'myprog -v'
    let log_level = match opt.verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Initialize logging
    initialize_logging(log_level);

    debug!("Debug logging enabled.");

    let cmd_result = match opt.command {
        Command::GenerateConfig => command::generate_config(),
        Command::Check { dry_run } => {
            load_config(&opt.general_options).and_then(|config| command::check(config, dry_run))
        }
    };

    match cmd_result {
        Ok(_) => {}
        Err(err) => {
            // Print error description to stderr
            eprintln!("{}", err.description);

            // Return the exit code that corresponds to the error kind
            std::process::exit(err.kind.exit_code());
        }
    };
}

fn initialize_logging(our_level_filter: LevelFilter) {
    const LIB_MODULE: &str = "threadwatch";

    // RUST_LOG takes precedence over the verbosity flag.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("error,{LIB_MODULE}={our_level_filter}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(general_options: &GeneralOptions) -> Result<ThreadwatchConfig, CliError> {
    let Some(config_path) = &general_options.config_path else {
        return Ok(ThreadwatchConfig::from_default_location()?);
    };

    if !config_path.exists() {
        return Err(CliError::new(
            CliErrorKind::Config,
            format!("Config file not found: {}", config_path.display()),
        ));
    }

    debug!("Loading config from {}", config_path.display());

    Ok(ThreadwatchConfig::from_file(config_path)?)
}
