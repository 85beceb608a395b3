//! Named-pipe [`ChordSink`] and reader.
//!
//! # Wire format
//!
//! UTF-8 text, one canonical chord per line, `\n` terminated:
//!
//! ```text
//! F9
//! Control_L F3
//! Shift_L Super_L w
//! ```
//!
//! The writer owns the rendezvous path: it creates it (idempotently) and
//! removes it when dropped.  Writes are non-blocking, so a stalled reader
//! costs a logged, dropped chord instead of stalling input processing.

use crate::chord::Chord;
use crate::shutdown::ShutdownToken;
use crate::traits::ChordSink;
use log::{debug, info, warn};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use std::fs::{File, OpenOptions, Permissions};
use std::io::{BufReader, ErrorKind, Write};
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How often the writer retries while no reader is connected.
const CONNECT_RETRY: Duration = Duration::from_millis(100);

/// Permissions of a freshly created FIFO.
const FIFO_MODE: u32 = 0o666;

/// Errors produced by the FIFO transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to create fifo {}: {source}", .path.display())]
    Create { path: PathBuf, source: Errno },
    #[error("{} exists and is not a fifo", .path.display())]
    NotAFifo { path: PathBuf },
    #[error("failed to open fifo {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("shutdown requested while waiting for a reader on {}", .path.display())]
    Cancelled { path: PathBuf },
    #[error("reader disconnected")]
    Disconnected,
    #[error("pipe is full, reader is not keeping up")]
    Full,
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
}

/// Create a FIFO at `path` unless one already exists.
///
/// A pre-existing FIFO is not an error; any other file type is.
pub fn ensure_fifo(path: &Path) -> Result<(), TransportError> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_fifo() => return Ok(()),
        Ok(_) => {
            return Err(TransportError::NotAFifo {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(TransportError::Open {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    match mkfifo(path, Mode::from_bits_truncate(FIFO_MODE)) {
        Ok(()) => {
            // mkfifo honours the umask; widen to the intended mode.
            if let Err(e) = std::fs::set_permissions(path, Permissions::from_mode(FIFO_MODE)) {
                warn!("could not set permissions on {}: {}", path.display(), e);
            }
            debug!("created fifo {}", path.display());
            Ok(())
        }
        Err(Errno::EEXIST) => Ok(()),
        Err(source) => Err(TransportError::Create {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write end of the chord FIFO.
pub struct FifoWriter {
    path: PathBuf,
    file: File,
}

impl FifoWriter {
    /// Create the FIFO and wait until a reader opens it.
    ///
    /// This **blocks** the caller, polling `shutdown` every
    /// [`CONNECT_RETRY`].  On failure or cancellation the path is removed
    /// again (unless it was not a FIFO to begin with).
    pub fn connect(path: impl AsRef<Path>, shutdown: &ShutdownToken) -> Result<Self, TransportError> {
        let path = path.as_ref().to_path_buf();
        ensure_fifo(&path)?;

        let mut announced = false;
        loop {
            if shutdown.is_triggered() {
                let _ = std::fs::remove_file(&path);
                return Err(TransportError::Cancelled { path });
            }

            let opened = OpenOptions::new()
                .write(true)
                .custom_flags(OFlag::O_NONBLOCK.bits())
                .open(&path);

            match opened {
                Ok(file) => {
                    info!("reader connected to {}", path.display());
                    return Ok(Self { path, file });
                }
                // No reader yet.
                Err(e) if e.raw_os_error() == Some(Errno::ENXIO as i32) => {
                    if !announced {
                        info!("waiting for a reader on {}", path.display());
                        announced = true;
                    }
                    std::thread::sleep(CONNECT_RETRY);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(source) => {
                    let _ = std::fs::remove_file(&path);
                    return Err(TransportError::Open { path, source });
                }
            }
        }
    }

    /// The rendezvous path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one chord line.
    pub fn write_line(&mut self, chord: &str) -> Result<(), TransportError> {
        let mut line = String::with_capacity(chord.len() + 1);
        line.push_str(chord);
        line.push('\n');
        match self.file.write_all(line.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(TransportError::Disconnected),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(TransportError::Full),
            Err(e) => Err(TransportError::Write(e)),
        }
    }
}

impl ChordSink for FifoWriter {
    type Error = TransportError;

    fn deliver(&mut self, chord: &Chord) -> Result<(), TransportError> {
        self.write_line(&chord.to_string())
    }
}

impl Drop for FifoWriter {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("removed {}", self.path.display()),
            Err(e) => warn!("failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Open the read end of the FIFO at `path`, creating it if needed.
///
/// Blocks until a writer has the FIFO open.
pub fn open_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, TransportError> {
    let path = path.as_ref();
    ensure_fifo(path)?;
    let file = File::open(path).map_err(|source| TransportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!("connected to {}", path.display());
    Ok(BufReader::new(file))
}

//  Tests
