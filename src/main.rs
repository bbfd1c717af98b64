use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nettrack::Settings;

/// Contact tracker with lead follow-ups.
#[derive(Debug, Parser)]
#[command(name = "nettrack", version, about)]
struct Args {
    /// Contacts document (JSON)
    #[arg(short, long, env = "NETTRACK_FILE", default_value = ".data/contacts.json")]
    file: PathBuf,

    /// Settings file (TOML); defaults are used when it does not exist
    #[arg(short, long, env = "NETTRACK_CONFIG", default_value = ".data/settings.toml")]
    config: PathBuf,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose);

    let settings = match Settings::load(&args.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings from {}: {}", args.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    nettrack::cli::run(&args.file, &args.config, settings);
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("nettrack=debug")
    } else {
        EnvFilter::new("nettrack=info")
    };

    // stderr keeps log lines out of the REPL's own output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
