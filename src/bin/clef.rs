//! Entry point for **clef**, the chord resolver.
//!
//! Opens the FIFO for reading (waiting for the observer if necessary),
//! dispatches one command per chord line and exits when the observer closes
//! its end.

use clap::Parser;
use clef::config::{default_config_path, Config, ConfigError};
use clef::dispatch::{ActionDispatcher, ProcessLauncher};
use clef::ipc::fifo::{open_reader, TransportError};
use clef::resolver;
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clef", version, about = "Keyboard chord resolver", long_about = None)]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/clef/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// FIFO path, overriding the configuration
    #[arg(long)]
    fifo: Option<PathBuf>,

    /// Read chord lines from standard input instead of the FIFO
    #[arg(long, conflicts_with = "fifo")]
    stdin: bool,
}

#[derive(Debug, thiserror::Error)]
enum ResolverError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to read chord stream: {0}")]
    Read(#[from] std::io::Error),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ResolverError> {
    let path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load(&path)?;
    let table = config.binding_table()?;
    if table.is_empty() {
        warn!("{} declares no bindings", path.display());
    } else {
        info!("loaded {} binding(s) from {}", table.len(), path.display());
    }

    let mut dispatcher = ActionDispatcher::new(table, ProcessLauncher::new());

    let stats = if cli.stdin {
        resolver::run(std::io::stdin().lock(), &mut dispatcher)?
    } else {
        let fifo = cli.fifo.unwrap_or(config.fifo_path);
        info!("waiting for chords on {}", fifo.display());
        resolver::run(open_reader(&fifo)?, &mut dispatcher)?
    };

    info!("clef stopped after {} chord(s)", stats.launched + stats.unbound + stats.failed);
    Ok(())
}
