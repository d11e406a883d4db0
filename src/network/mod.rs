//! Network Module
//!
//! Client-side transport: the `Connection` seam and its TCP
//! implementation.

mod connection;

pub use connection::{Connection, TcpConnection};
