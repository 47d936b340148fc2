//! CLI frontend for the speedmath arithmetic drill.

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sm_cli::commands::{self, SessionArgs};

#[derive(Parser)]
#[command(
    name = "speedmath",
    about = "Speed Math: answer arithmetic expressions against the clock",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play on a full-screen terminal display
    Play {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Read answers line by line from standard input
    Drill {
        #[command(flatten)]
        session: SessionArgs,

        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Play { session } => session.to_config().and_then(commands::play::run),
        Commands::Drill { session, json } => session
            .to_config()
            .and_then(|config| commands::drill::run(config, json)),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
