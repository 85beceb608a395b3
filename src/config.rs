//! Application configuration and the binding table.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/clef/config.json`.  Every top-level field is optional.
//!
//! # Example
//!
//! ```json
//! {
//!   "fifo_path": "/tmp/clefd.fifo",
//!   "max_pressed_keys": 16,
//!   "bindings": [
//!     { "keys": "F9", "command": ["guix", "shell", "--help"] },
//!     { "keys": ["Control_L", "F3"], "command": ["echo", "Hello Keychording!"] },
//!     { "keys": "Super_L + w", "command": "firefox" }
//!   ]
//! }
//! ```
//!
//! Files without a `.json` extension are read in the line format instead,
//! one `keys : command` binding per line:
//!
//! ```text
//! # comment
//! Super_L + w : firefox
//! Control_L + Shift_L + n : newsboat -r
//! ```

use crate::chord::{Chord, ChordError};
use crate::command::Command;
use crate::tracker::DEFAULT_MAX_PRESSED_KEYS;
use log::warn;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Rendezvous path used when none is configured.
pub const DEFAULT_FIFO_PATH: &str = "/tmp/clefd.fifo";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Well-known path of the observer → resolver FIFO.
    pub fifo_path: PathBuf,
    /// Upper bound on simultaneously tracked keys.
    pub max_pressed_keys: usize,
    /// Declared bindings, in file order.
    pub bindings: Vec<Binding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fifo_path: PathBuf::from(DEFAULT_FIFO_PATH),
            max_pressed_keys: DEFAULT_MAX_PRESSED_KEYS,
            bindings: Vec::new(),
        }
    }
}

/// One declared `(keys, command)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub keys: BindingKeys,
    pub command: Command,
}

/// Key symbols of a binding, in declaration order.
///
/// Accepts a string (`"F5"`, `"Super_L + w"`, `"Control_L F3"`) or an array
/// of symbol strings.  Order is irrelevant for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingKeys(pub Vec<String>);

impl BindingKeys {
    /// Split a key specifier on `+` and whitespace.
    pub fn parse(s: &str) -> Self {
        BindingKeys(
            s.split(|c: char| c == '+' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Normalise to the canonical chord form.
    pub fn to_chord(&self) -> Result<Chord, ChordError> {
        Chord::from_symbols(&self.0)
    }
}

impl fmt::Display for BindingKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" + "))
    }
}

impl<'de> Deserialize<'de> for BindingKeys {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = BindingKeys;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a key symbol string or an array of key symbols")
            }
            fn visit_str<E>(self, s: &str) -> Result<BindingKeys, E>
            where
                E: DeError,
            {
                Ok(BindingKeys::parse(s))
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<BindingKeys, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut keys = Vec::new();
                while let Some(key) = seq.next_element::<String>()? {
                    let key = key.trim();
                    if key.is_empty() {
                        return Err(DeError::custom("keys: empty key symbol"));
                    }
                    keys.push(key.to_string());
                }
                Ok(BindingKeys(keys))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Error from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid binding on line {line}: '{text}'")]
    Line { line: usize, text: String },
    #[error("binding '{keys}' can never fire: {source}")]
    Binding { keys: BindingKeys, source: ChordError },
    #[error("max_pressed_keys must be at least 1")]
    ZeroCapacity,
}

impl Config {
    /// Load configuration from `path`, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_lines(&contents)
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the line format.  Only bindings can be set this way.
    pub fn from_lines(contents: &str) -> Result<Self, ConfigError> {
        let bindings = contents
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| parse_line(line, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let config = Self {
            bindings,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pressed_keys == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        for binding in &self.bindings {
            binding.keys.to_chord().map_err(|source| ConfigError::Binding {
                keys: binding.keys.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Build the lookup table for the declared bindings.
    pub fn binding_table(&self) -> Result<BindingTable, ConfigError> {
        BindingTable::build(&self.bindings)
    }
}

/// Parse one line of the line format.  Blank lines and `#` comments yield
/// `None`.
fn parse_line(line: &str, line_num: usize) -> Option<Result<Binding, ConfigError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let invalid = || ConfigError::Line {
        line: line_num,
        text: line.to_string(),
    };

    let Some((keys, command)) = line.split_once(':') else {
        return Some(Err(invalid()));
    };
    let keys = BindingKeys::parse(keys);
    if keys.0.is_empty() {
        return Some(Err(invalid()));
    }
    let Some(command) = Command::from_parts(command.split_whitespace()) else {
        return Some(Err(invalid()));
    };
    Some(Ok(Binding { keys, command }))
}

/// Read-only map from canonical chord string to [`Command`].
///
/// Built once at start-up.  When two bindings normalise to the same chord
/// the later declaration wins.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: HashMap<String, Command>,
}

impl BindingTable {
    pub fn build(bindings: &[Binding]) -> Result<Self, ConfigError> {
        let mut entries = HashMap::with_capacity(bindings.len());
        for binding in bindings {
            let chord = binding.keys.to_chord().map_err(|source| ConfigError::Binding {
                keys: binding.keys.clone(),
                source,
            })?;
            let key = chord.to_string();
            if let Some(previous) = entries.insert(key.clone(), binding.command.clone()) {
                warn!(
                    "chord '{}' bound more than once, replacing '{}' with '{}'",
                    key, previous, binding.command
                );
            }
        }
        Ok(Self { entries })
    }

    /// Look up a canonical chord string.
    pub fn lookup(&self, chord: &str) -> Option<&Command> {
        self.entries.get(chord)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/clef`).
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("clef")
}

/// `$XDG_CONFIG_HOME/clef/config.json`.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}
