//! # jsonkv
//!
//! Client library for JSON document commands over a key-value wire
//! protocol:
//! - SET / GET / DEL / TYPE with JSONPath-like path arguments
//! - Conditional writes (XX / NX existence modifiers)
//! - Stateless request/reply over a caller-owned connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Command Client                          │
//! │              set / get / del / value_type                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Command / Reply
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Connection (trait)                         │
//! │                TcpConnection (blocking)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  binary frames
//!                       ▼
//!               document store server
//!            (path evaluation, storage)
//! ```
//!
//! The server side (path-query evaluation, document mutation, storage)
//! is an external collaborator and not part of this crate.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;

pub mod path;
pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JsonKvError, Result};
pub use path::Path;
pub use protocol::{Command, ExistenceModifier, Reply, Status};
pub use network::{Connection, TcpConnection};
pub use client::{del, get, set, value_type, ValueKind};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsonkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
