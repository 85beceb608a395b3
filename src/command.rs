//! Commands bound to chords.
//!
//! On the wire (the configuration file) a command is either a bare string,
//! naming a program run without arguments, or a non-empty array whose first
//! element is the program and the rest are its arguments:
//!
//! ```json
//! "firefox"
//! ["guix", "shell", "--help"]
//! ```
//!
//! Anything else is rejected when the configuration is loaded.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An external program to run when a chord fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Program with no arguments.
    Simple(String),
    /// Program with arguments, passed in declared order.
    WithArgs(String, Vec<String>),
}

impl Command {
    /// Build a command from a program followed by its arguments.
    ///
    /// A one-element list is a [`Simple`](Command::Simple) command; an empty
    /// list or an empty program name is `None`.
    pub fn from_parts<I, S>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = parts.into_iter().map(Into::into);
        let program: String = parts.next()?;
        if program.trim().is_empty() {
            return None;
        }
        let args: Vec<String> = parts.collect();
        if args.is_empty() {
            Some(Command::Simple(program))
        } else {
            Some(Command::WithArgs(program, args))
        }
    }

    pub fn program(&self) -> &str {
        match self {
            Command::Simple(p) | Command::WithArgs(p, _) => p,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            Command::Simple(_) => &[],
            Command::WithArgs(_, args) => args,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())?;
        for arg in self.args() {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Command::Simple(p) => serializer.serialize_str(p),
            Command::WithArgs(p, args) => {
                let mut parts = Vec::with_capacity(args.len() + 1);
                parts.push(p);
                parts.extend(args);
                parts.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Command;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a program name or a non-empty array [program, args...]")
            }
            fn visit_str<E>(self, s: &str) -> Result<Command, E>
            where
                E: DeError,
            {
                Command::from_parts([s]).ok_or_else(|| DeError::custom("command: empty program name"))
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Command, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut parts: Vec<String> = Vec::new();
                while let Some(part) = seq.next_element::<String>()? {
                    parts.push(part);
                }
                Command::from_parts(parts)
                    .ok_or_else(|| DeError::custom("command: expected a non-empty program name"))
            }
        }
        deserializer.deserialize_any(V)
    }
}
