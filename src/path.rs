//! Document paths
//!
//! A `Path` locates a position inside a stored JSON document. The root
//! path is `"."`; nested positions use dotted notation with optional
//! array indices (`.user.tags[0]`). The client never inspects the
//! expression, it only carries it to the server.

use std::fmt;

/// An immutable path expression into a JSON document
///
/// Two paths are equal iff their string forms are equal; `".a"` and
/// `"a"` are distinct values even if the server resolves them alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(String);

impl Path {
    /// Create a path from an expression string
    pub fn new(expr: impl Into<String>) -> Self {
        Path(expr.into())
    }

    /// The document root path (`"."`)
    pub fn root() -> Self {
        Path(".".to_string())
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.0 == "."
    }

    /// The raw path expression
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Path {
    fn default() -> Self {
        Path::root()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Path {
    fn from(expr: &str) -> Self {
        Path::new(expr)
    }
}

impl From<String> for Path {
    fn from(expr: String) -> Self {
        Path(expr)
    }
}
