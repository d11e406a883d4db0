//! Client connections
//!
//! The `Connection` trait is the seam between the command client and the
//! wire: one synchronous request, one reply. `TcpConnection` is the
//! blocking TCP implementation.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{JsonKvError, Result};
use crate::protocol::{read_reply, write_command, Command, Reply};

/// A connected server endpoint able to carry one command at a time
///
/// Implementations own whatever transport state they need; the command
/// client keeps none. Retries, pooling and timeouts all live behind
/// this seam.
pub trait Connection {
    /// Send a command and block until its reply arrives
    fn request(&mut self, command: &Command) -> Result<Reply>;
}

/// A blocking TCP connection to the server
pub struct TcpConnection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpConnection {
    /// Connect to a server address
    ///
    /// Sets up buffered I/O; timeouts default to none
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 clears the timeout)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_timeout = (read_ms > 0).then(|| Duration::from_millis(read_ms));
        let write_timeout = (write_ms > 0).then(|| Duration::from_millis(write_ms));

        self.reader.get_ref().set_read_timeout(read_timeout)?;
        self.writer.get_ref().set_write_timeout(write_timeout)?;

        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Connection for TcpConnection {
    fn request(&mut self, command: &Command) -> Result<Reply> {
        tracing::trace!("Sending command to {}: {:?}", self.peer_addr, command);

        write_command(&mut self.writer, command)?;

        match read_reply(&mut self.reader) {
            Ok(reply) => {
                tracing::trace!("Received reply from {}: {:?}", self.peer_addr, reply.status);
                Ok(reply)
            }
            Err(JsonKvError::Io(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // Server closed the connection mid-request
                tracing::debug!("Server {} disconnected", self.peer_addr);
                Err(JsonKvError::Protocol(format!(
                    "Connection to {} closed before a reply arrived",
                    self.peer_addr
                )))
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                Err(e)
            }
        }
    }
}
