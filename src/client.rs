//! Command Client
//!
//! The stateless façade over a caller-owned connection. Each function
//! builds one command, sends it, and decodes the reply; no state is
//! kept between calls.
//!
//! ## Responsibilities
//! - Serialize host values to JSON text and decode reply JSON
//! - Default the path to the document root when none is given
//! - Reject multi-path calls where at most one path is allowed,
//!   before any bytes are sent
//! - Surface server-reported failures as errors, immediately

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{JsonKvError, Result};
use crate::network::Connection;
use crate::path::Path;
use crate::protocol::{Command, ExistenceModifier, Reply, Status};

/// The kind of value stored at a path, as reported by TYPE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl ValueKind {
    /// The wire word for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = JsonKvError;

    fn from_str(word: &str) -> Result<Self> {
        match word {
            "object" => Ok(ValueKind::Object),
            "array" => Ok(ValueKind::Array),
            "string" => Ok(ValueKind::String),
            "number" => Ok(ValueKind::Number),
            "boolean" => Ok(ValueKind::Boolean),
            "null" => Ok(ValueKind::Null),
            other => Err(JsonKvError::Protocol(format!(
                "Unknown value kind in TYPE reply: {:?}",
                other
            ))),
        }
    }
}

/// Write `value` at one path of `key`
///
/// An empty `paths` slice targets the document root; more than one path
/// is a usage error. The existence modifier is passed through to the
/// server, which rejects the write when its condition is violated.
pub fn set<C: Connection, V: Serialize + ?Sized>(
    conn: &mut C,
    key: &str,
    value: &V,
    modifier: ExistenceModifier,
    paths: &[Path],
) -> Result<()> {
    let path = single_path("set", paths)?;
    let json = serde_json::to_string(value)?;

    let reply = conn.request(&Command::Set {
        key: key.to_string(),
        path,
        json,
        modifier,
    })?;

    expect_ok(reply).map(|_| ())
}

/// Read the value(s) at zero or more paths of `key`
///
/// Zero paths reads the document root. An absent key is `Ok(None)`;
/// a present key decodes to its JSON value. With several paths the
/// server replies with a mapping from each path's text to its resolved
/// value, and any non-resolving path fails the whole read.
pub fn get<C: Connection>(conn: &mut C, key: &str, paths: &[Path]) -> Result<Option<Value>> {
    let paths = if paths.is_empty() {
        vec![Path::root()]
    } else {
        paths.to_vec()
    };

    let reply = conn.request(&Command::Get {
        key: key.to_string(),
        paths,
    })?;

    if reply.status == Status::NotFound {
        return Ok(None);
    }
    let reply = expect_ok(reply)?;

    let payload = reply.payload_str().into_owned();
    if payload.is_empty() {
        return Err(JsonKvError::Protocol(
            "GET reply carried no JSON payload".to_string(),
        ));
    }

    Ok(Some(serde_json::from_str(&payload)?))
}

/// Delete one path of `key`
///
/// An empty `paths` slice deletes the document root, which removes the
/// key entirely; more than one path is a usage error.
pub fn del<C: Connection>(conn: &mut C, key: &str, paths: &[Path]) -> Result<()> {
    let path = single_path("del", paths)?;

    let reply = conn.request(&Command::Del {
        key: key.to_string(),
        path,
    })?;

    expect_ok(reply).map(|_| ())
}

/// Query the kind of value stored at one path of `key`
pub fn value_type<C: Connection>(conn: &mut C, key: &str, paths: &[Path]) -> Result<ValueKind> {
    let path = single_path("type", paths)?;

    let reply = conn.request(&Command::Type {
        key: key.to_string(),
        path,
    })?;
    let reply = expect_ok(reply)?;

    reply.payload_str().trim().parse()
}

/// Pick the single path for an operation, defaulting to the root
fn single_path(op: &str, paths: &[Path]) -> Result<Path> {
    match paths {
        [] => Ok(Path::root()),
        [path] => Ok(path.clone()),
        _ => Err(JsonKvError::Usage(format!(
            "{} accepts at most one path, got {}",
            op,
            paths.len()
        ))),
    }
}

/// Map a reply's status to success or the matching error
fn expect_ok(reply: Reply) -> Result<Reply> {
    match reply.status {
        Status::Ok => Ok(reply),
        Status::NotFound => Err(JsonKvError::KeyNotFound),
        Status::Error => Err(JsonKvError::Server(reply.payload_str().into_owned())),
    }
}
