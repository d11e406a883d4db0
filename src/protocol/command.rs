//! Command definitions
//!
//! Represents the JSON document commands a client can send.

use crate::path::Path;

/// Command opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Set = 0x01,
    Get = 0x02,
    Del = 0x03,
    Type = 0x04,
}

/// Conditional-write flag for SET
///
/// Carried to the server as a trailing argument; the client never
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistenceModifier {
    /// Unconditional write
    #[default]
    None,

    /// Write only if the target path already exists
    MustExist,

    /// Write only if the target path does not exist
    NotExists,
}

impl ExistenceModifier {
    /// The wire token for this modifier, if any
    pub fn token(&self) -> Option<&'static str> {
        match self {
            ExistenceModifier::None => None,
            ExistenceModifier::MustExist => Some("XX"),
            ExistenceModifier::NotExists => Some("NX"),
        }
    }
}

/// A command ready to be sent
#[derive(Debug, Clone)]
pub enum Command {
    /// Write a JSON value at one path of a key
    Set {
        key: String,
        path: Path,
        json: String,
        modifier: ExistenceModifier,
    },

    /// Read the value(s) at one or more paths of a key
    Get { key: String, paths: Vec<Path> },

    /// Delete one path of a key (the whole key if root)
    Del { key: String, path: Path },

    /// Query the value kind at one path of a key
    Type { key: String, path: Path },
}

impl Command {
    /// Get the command opcode
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Del { .. } => CommandType::Del,
            Command::Type { .. } => CommandType::Type,
        }
    }

    /// Flatten the command into its wire arguments
    ///
    /// Argument order mirrors the textual command form: key, path(s),
    /// then for SET the JSON text and the optional modifier token.
    pub fn args(&self) -> Vec<&str> {
        match self {
            Command::Set {
                key,
                path,
                json,
                modifier,
            } => {
                let mut args = vec![key.as_str(), path.as_str(), json.as_str()];
                if let Some(token) = modifier.token() {
                    args.push(token);
                }
                args
            }
            Command::Get { key, paths } => {
                let mut args = vec![key.as_str()];
                args.extend(paths.iter().map(Path::as_str));
                args
            }
            Command::Del { key, path } => vec![key.as_str(), path.as_str()],
            Command::Type { key, path } => vec![key.as_str(), path.as_str()],
        }
    }
}
