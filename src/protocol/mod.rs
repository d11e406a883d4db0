//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Op (1)   │ Len (4)  │     argc + arguments        │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: SET   - Args: key, path, json text, [XX|NX]
//! - 0x02: GET   - Args: key, path...
//! - 0x03: DEL   - Args: key, path
//! - 0x04: TYPE  - Args: key, path
//!
//! ### Reply Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: ERROR

mod command;
mod reply;
mod codec;

pub use command::{Command, CommandType, ExistenceModifier};
pub use reply::{Reply, Status};
pub use codec::{
    decode_command, decode_reply, encode_command, encode_reply, read_command, read_reply,
    write_command, write_reply, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
