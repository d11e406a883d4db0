//! Test support
//!
//! An in-memory stand-in for the document store server, speaking the
//! same command/reply contract. Path resolution here is deliberately
//! minimal (dotted keys plus `[index]`), just enough to exercise the
//! client's observable behavior.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::JoinHandle;

use serde_json::{json, Value};

use jsonkv::protocol::{read_command, write_reply, ExistenceModifier};
use jsonkv::{Command, Connection, Path, Reply, Result};

// =============================================================================
// Path segments
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Parse a dotted path expression into segments
///
/// Accepts a leading dot or none (".str" and "str" resolve alike);
/// returns None for malformed expressions.
fn parse_path(expr: &str) -> Option<Vec<Segment>> {
    let trimmed = expr.strip_prefix('.').unwrap_or(expr);
    if trimmed.is_empty() {
        return Some(Vec::new());
    }

    let mut segments = Vec::new();
    for piece in trimmed.split('.') {
        let (name, rest) = match piece.find('[') {
            Some(pos) => piece.split_at(pos),
            None => (piece, ""),
        };
        if name.is_empty() {
            return None;
        }
        segments.push(Segment::Key(name.to_string()));

        let mut rest = rest;
        while let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped.find(']')?;
            let index: usize = stripped[..end].parse().ok()?;
            segments.push(Segment::Index(index));
            rest = &stripped[end + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }
    Some(segments)
}

fn resolve<'a>(doc: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = doc;
    for segment in segments {
        current = match segment {
            Segment::Key(name) => current.as_object()?.get(name)?,
            Segment::Index(index) => current.as_array()?.get(*index)?,
        };
    }
    Some(current)
}

// =============================================================================
// In-memory document store
// =============================================================================

/// A fake document store applying the four command kinds
#[derive(Default)]
pub struct FakeStore {
    docs: HashMap<String, Value>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one command, producing the reply the server would send
    pub fn apply(&mut self, command: &Command) -> Reply {
        match command {
            Command::Set {
                key,
                path,
                json,
                modifier,
            } => self.apply_set(key, path, json, *modifier),
            Command::Get { key, paths } => self.apply_get(key, paths),
            Command::Del { key, path } => self.apply_del(key, path),
            Command::Type { key, path } => self.apply_type(key, path),
        }
    }

    fn apply_set(
        &mut self,
        key: &str,
        path: &Path,
        json: &str,
        modifier: ExistenceModifier,
    ) -> Reply {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => return Reply::error(&format!("invalid JSON payload: {}", e)),
        };
        let segments = match parse_path(path.as_str()) {
            Some(segments) => segments,
            None => return Reply::error(&format!("invalid path {:?}", path.as_str())),
        };

        if !self.docs.contains_key(key) {
            // A missing key only accepts a root write
            if !segments.is_empty() {
                return Reply::error("new documents must be created at the root");
            }
            if modifier == ExistenceModifier::MustExist {
                return Reply::error("path does not exist, XX condition failed");
            }
            self.docs.insert(key.to_string(), value);
            return Reply::ok(None);
        }
        let doc = self.docs.get_mut(key).expect("key checked above");

        let exists = resolve(doc, &segments).is_some();
        match modifier {
            ExistenceModifier::MustExist if !exists => {
                return Reply::error("path does not exist, XX condition failed")
            }
            ExistenceModifier::NotExists if exists => {
                return Reply::error("path already exists, NX condition failed")
            }
            _ => {}
        }

        if segments.is_empty() {
            *doc = value;
            return Reply::ok(None);
        }

        // Resolve the parent, then write the final segment into it
        let (last, parents) = segments.split_last().expect("non-root path");
        let Some(parent) = parents
            .iter()
            .try_fold(&mut *doc, |current, segment| match segment {
                Segment::Key(name) => current.as_object_mut()?.get_mut(name),
                Segment::Index(index) => current.as_array_mut()?.get_mut(*index),
            })
        else {
            return Reply::error(&format!("path {:?} does not exist", path.as_str()));
        };

        match last {
            Segment::Key(name) => match parent.as_object_mut() {
                Some(map) => {
                    map.insert(name.clone(), value);
                }
                None => return Reply::error(&format!("path {:?} does not exist", path.as_str())),
            },
            Segment::Index(index) => match parent.as_array_mut() {
                Some(items) if *index < items.len() => items[*index] = value,
                _ => return Reply::error(&format!("path {:?} does not exist", path.as_str())),
            },
        }
        Reply::ok(None)
    }

    fn apply_get(&self, key: &str, paths: &[Path]) -> Reply {
        let Some(doc) = self.docs.get(key) else {
            return Reply::not_found();
        };

        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            let value = parse_path(path.as_str())
                .as_deref()
                .and_then(|segments| resolve(doc, segments));
            match value {
                Some(value) => resolved.push((path.as_str(), value.clone())),
                None => {
                    return Reply::error(&format!("path {:?} does not exist", path.as_str()))
                }
            }
        }

        let body = match resolved.as_slice() {
            [(_, value)] => value.clone(),
            many => Value::Object(
                many.iter()
                    .map(|(path, value)| (path.to_string(), value.clone()))
                    .collect(),
            ),
        };
        Reply::ok(Some(body.to_string().into_bytes()))
    }

    fn apply_del(&mut self, key: &str, path: &Path) -> Reply {
        let segments = match parse_path(path.as_str()) {
            Some(segments) => segments,
            None => return Reply::error(&format!("invalid path {:?}", path.as_str())),
        };

        if !self.docs.contains_key(key) {
            return Reply::not_found();
        }
        if segments.is_empty() {
            self.docs.remove(key);
            return Reply::ok(None);
        }

        let doc = self.docs.get_mut(key).expect("key checked above");
        let (last, parents) = segments.split_last().expect("non-root path");
        let Some(parent) = parents
            .iter()
            .try_fold(&mut *doc, |current, segment| match segment {
                Segment::Key(name) => current.as_object_mut()?.get_mut(name),
                Segment::Index(index) => current.as_array_mut()?.get_mut(*index),
            })
        else {
            return Reply::error(&format!("path {:?} does not exist", path.as_str()));
        };

        let removed = match last {
            Segment::Key(name) => parent
                .as_object_mut()
                .and_then(|map| map.remove(name))
                .is_some(),
            Segment::Index(index) => match parent.as_array_mut() {
                Some(items) if *index < items.len() => {
                    items.remove(*index);
                    true
                }
                _ => false,
            },
        };

        if removed {
            Reply::ok(None)
        } else {
            Reply::error(&format!("path {:?} does not exist", path.as_str()))
        }
    }

    fn apply_type(&self, key: &str, path: &Path) -> Reply {
        let Some(doc) = self.docs.get(key) else {
            return Reply::not_found();
        };
        let value = parse_path(path.as_str())
            .as_deref()
            .and_then(|segments| resolve(doc, segments));

        match value {
            Some(Value::Object(_)) => Reply::ok(Some(b"object".to_vec())),
            Some(Value::Array(_)) => Reply::ok(Some(b"array".to_vec())),
            Some(Value::String(_)) => Reply::ok(Some(b"string".to_vec())),
            Some(Value::Number(_)) => Reply::ok(Some(b"number".to_vec())),
            Some(Value::Bool(_)) => Reply::ok(Some(b"boolean".to_vec())),
            Some(Value::Null) => Reply::ok(Some(b"null".to_vec())),
            None => Reply::error(&format!("path {:?} does not exist", path.as_str())),
        }
    }
}

// =============================================================================
// In-process connection
// =============================================================================

/// A `Connection` applied directly to a `FakeStore`, counting requests
/// so tests can assert that usage errors never reach the server
#[derive(Default)]
pub struct MemoryConnection {
    pub store: FakeStore,
    pub requests: usize,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connection for MemoryConnection {
    fn request(&mut self, command: &Command) -> Result<Reply> {
        self.requests += 1;
        Ok(self.store.apply(command))
    }
}

// =============================================================================
// Loopback TCP server
// =============================================================================

/// Spawn a single-connection loopback server backed by a fresh store
///
/// Serves commands until the client disconnects.
pub fn spawn_server() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept client");
        serve_connection(stream, FakeStore::new());
    });

    (addr, handle)
}

fn serve_connection(stream: TcpStream, mut store: FakeStore) {
    let mut reader = std::io::BufReader::new(stream.try_clone().expect("clone stream"));
    let mut writer = std::io::BufWriter::new(stream);

    loop {
        let command = match read_command(&mut reader) {
            Ok(command) => command,
            // Client done
            Err(_) => return,
        };
        let reply = store.apply(&command);
        if write_reply(&mut writer, &reply).is_err() {
            return;
        }
    }
}

/// Seed data used across tests, mirroring a small real-life document
pub fn irl_object() -> Value {
    json!({ "str": "string", "bTrue": true })
}
