//! Entry point for **clefd**, the chord observer.
//!
//! Waits for a resolver to open the FIFO, then reads keyboard input and
//! writes one line per fired chord until SIGINT/SIGTERM.  With
//! `--standalone` the chords are dispatched in-process instead and no FIFO
//! is created.

use clap::Parser;
use clef::config::{default_config_path, Config, ConfigError};
use clef::dispatch::{ActionDispatcher, ProcessLauncher};
use clef::input::device::{EvdevSource, InputError};
use clef::ipc::fifo::{FifoWriter, TransportError};
use clef::observer::Observer;
use clef::shutdown::ShutdownToken;
use clef::traits::SymbolTranslator;
use log::{error, info};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "clefd", version, about = "Keyboard chord observer", long_about = None)]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/clef/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// FIFO path, overriding the configuration
    #[arg(long)]
    fifo: Option<PathBuf>,

    /// Maximum number of keys tracked at once
    #[arg(long)]
    max_keys: Option<usize>,

    /// Run bound commands directly instead of writing chords to the FIFO
    #[arg(long)]
    standalone: bool,
}

#[derive(Debug, thiserror::Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[cfg(feature = "xkb")]
    #[error(transparent)]
    Xkb(#[from] clef::input::xkb::XkbError),
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

/// Load the configuration.  Without `--config`, a missing default file
/// means defaults.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return Config::load(path);
    }
    let path = default_config_path();
    if path.exists() {
        let config = Config::load(&path)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    } else {
        info!("no config file at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

#[cfg(feature = "xkb")]
fn translator() -> Result<impl SymbolTranslator, DaemonError> {
    Ok(clef::input::xkb::XkbTranslator::new()?)
}

#[cfg(not(feature = "xkb"))]
fn translator() -> Result<impl SymbolTranslator, DaemonError> {
    Ok(clef::input::keymap::UsKeymap)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), DaemonError> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(fifo) = cli.fifo {
        config.fifo_path = fifo;
    }
    let capacity = cli.max_keys.unwrap_or(config.max_pressed_keys);
    if capacity == 0 {
        return Err(ConfigError::ZeroCapacity.into());
    }

    let shutdown = ShutdownToken::new();
    let _signals = shutdown.install_signal_handler().map_err(DaemonError::Signal)?;

    let mut observer = Observer::new(translator()?, capacity);
    info!("clefd {} starting", env!("CARGO_PKG_VERSION"));

    if cli.standalone {
        let table = config.binding_table()?;
        info!("standalone mode with {} binding(s)", table.len());
        let mut source = EvdevSource::open()?;
        let mut dispatcher = ActionDispatcher::new(table, ProcessLauncher::new());
        observer.run(&mut source, &mut dispatcher, &shutdown)?;
    } else {
        // Nothing is read from the keyboard until a resolver is connected.
        let mut writer = match FifoWriter::connect(&config.fifo_path, &shutdown) {
            Ok(writer) => writer,
            Err(TransportError::Cancelled { .. }) => {
                info!("shut down before a reader connected");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let mut source = EvdevSource::open()?;
        observer.run(&mut source, &mut writer, &shutdown)?;
    }

    info!("clefd stopped");
    Ok(())
}
