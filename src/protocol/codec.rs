//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Op (1)   │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! The payload is a counted argument list:
//! argc (4 bytes) + { arg_len (4 bytes) + arg } per argument, every
//! argument a UTF-8 string. Argument order per op:
//! - SET:  key, path, json text, optional modifier token (XX/NX)
//! - GET:  key, zero or more paths
//! - DEL:  key, path
//! - TYPE: key, path
//!
//! ### Reply Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use super::{Command, CommandType, ExistenceModifier, Reply, Status};
use crate::error::{JsonKvError, Result};
use crate::path::Path;

/// Header size: 1 byte op/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: op (1) + payload_len (4) + argc (4) + per-arg len (4) + arg
///
/// Fails with a protocol error when the arguments exceed
/// `MAX_PAYLOAD_SIZE`, so oversized commands are rejected locally
/// instead of being bounced by the peer.
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let op = command.command_type() as u8;
    let args = command.args();

    let args_len: usize = args.iter().map(|a| 4 + a.len()).sum();
    if 4 + args_len > MAX_PAYLOAD_SIZE as usize {
        return Err(JsonKvError::Protocol(format!(
            "Command payload too large: {} bytes (max {})",
            4 + args_len,
            MAX_PAYLOAD_SIZE
        )));
    }
    let mut payload = Vec::with_capacity(4 + args_len);
    payload.extend_from_slice(&(args.len() as u32).to_be_bytes());
    for arg in &args {
        payload.extend_from_slice(&(arg.len() as u32).to_be_bytes());
        payload.extend_from_slice(arg.as_bytes());
    }

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(op);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(&payload);

    Ok(message)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    if bytes.len() < HEADER_SIZE {
        return Err(JsonKvError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let op = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(JsonKvError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(JsonKvError::Protocol(format!(
            "Incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let args = decode_args(&bytes[HEADER_SIZE..total_len])?;

    match op {
        op if op == CommandType::Set as u8 => decode_set_command(args),
        op if op == CommandType::Get as u8 => decode_get_command(args),
        op if op == CommandType::Del as u8 => decode_del_command(args),
        op if op == CommandType::Type as u8 => decode_type_command(args),
        _ => Err(JsonKvError::Protocol(format!(
            "Unknown command opcode: 0x{:02x}",
            op
        ))),
    }
}

/// Decode a counted argument list from a payload
fn decode_args(payload: &[u8]) -> Result<Vec<String>> {
    if payload.len() < 4 {
        return Err(JsonKvError::Protocol(
            "Command payload: missing argument count".to_string(),
        ));
    }

    let argc = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    // Each argument needs at least its 4-byte length prefix
    if argc > (payload.len() - 4) / 4 {
        return Err(JsonKvError::Protocol(format!(
            "Command payload: argument count {} exceeds payload size",
            argc
        )));
    }
    let mut args = Vec::with_capacity(argc);
    let mut offset = 4;

    for i in 0..argc {
        if payload.len() < offset + 4 {
            return Err(JsonKvError::Protocol(format!(
                "Command payload: missing length of argument {}",
                i
            )));
        }
        let arg_len = u32::from_be_bytes([
            payload[offset],
            payload[offset + 1],
            payload[offset + 2],
            payload[offset + 3],
        ]) as usize;
        offset += 4;

        if payload.len() < offset + arg_len {
            return Err(JsonKvError::Protocol(format!(
                "Command payload: incomplete argument {} (expected {}, got {})",
                i,
                arg_len,
                payload.len() - offset
            )));
        }
        let arg = std::str::from_utf8(&payload[offset..offset + arg_len])
            .map_err(|e| JsonKvError::Protocol(format!("Argument {} is not UTF-8: {}", i, e)))?;
        args.push(arg.to_string());
        offset += arg_len;
    }

    if offset != payload.len() {
        return Err(JsonKvError::Protocol(format!(
            "Command payload: {} trailing bytes after {} arguments",
            payload.len() - offset,
            argc
        )));
    }

    Ok(args)
}

/// Decode SET arguments: key, path, json, optional modifier token
fn decode_set_command(mut args: Vec<String>) -> Result<Command> {
    if args.len() < 3 || args.len() > 4 {
        return Err(JsonKvError::Protocol(format!(
            "SET command: expected 3 or 4 arguments, got {}",
            args.len()
        )));
    }

    let modifier = if args.len() == 4 {
        let token = args.pop().unwrap_or_default();
        match token.as_str() {
            "XX" => ExistenceModifier::MustExist,
            "NX" => ExistenceModifier::NotExists,
            other => {
                return Err(JsonKvError::Protocol(format!(
                    "SET command: unknown modifier token {:?}",
                    other
                )))
            }
        }
    } else {
        ExistenceModifier::None
    };

    let json = args.pop().unwrap_or_default();
    let path = Path::new(args.pop().unwrap_or_default());
    let key = args.pop().unwrap_or_default();

    Ok(Command::Set {
        key,
        path,
        json,
        modifier,
    })
}

/// Decode GET arguments: key, zero or more paths
fn decode_get_command(args: Vec<String>) -> Result<Command> {
    let mut args = args.into_iter();
    let key = args
        .next()
        .ok_or_else(|| JsonKvError::Protocol("GET command: missing key".to_string()))?;
    let paths = args.map(Path::from).collect();

    Ok(Command::Get { key, paths })
}

/// Decode DEL arguments: key, path
fn decode_del_command(args: Vec<String>) -> Result<Command> {
    let [key, path] = take_key_path(args, "DEL")?;
    Ok(Command::Del {
        key,
        path: Path::from(path),
    })
}

/// Decode TYPE arguments: key, path
fn decode_type_command(args: Vec<String>) -> Result<Command> {
    let [key, path] = take_key_path(args, "TYPE")?;
    Ok(Command::Type {
        key,
        path: Path::from(path),
    })
}

fn take_key_path(args: Vec<String>, op: &str) -> Result<[String; 2]> {
    <[String; 2]>::try_from(args).map_err(|args| {
        JsonKvError::Protocol(format!(
            "{} command: expected 2 arguments, got {}",
            op,
            args.len()
        ))
    })
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    let payload = reply.payload.as_deref().unwrap_or(&[]);
    let payload_len = payload.len() as u32;

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(reply.status as u8);
    message.extend_from_slice(&payload_len.to_be_bytes());
    message.extend_from_slice(payload);

    message
}

/// Decode a reply from bytes
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    if bytes.len() < HEADER_SIZE {
        return Err(JsonKvError::Protocol(format!(
            "Incomplete reply header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let status_byte = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(JsonKvError::Protocol(format!(
            "Reply payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(JsonKvError::Protocol(format!(
            "Incomplete reply payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        _ => {
            return Err(JsonKvError::Protocol(format!(
                "Unknown reply status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload_len > 0 {
        Some(bytes[HEADER_SIZE..total_len].to_vec())
    } else {
        None
    };

    Ok(Reply { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R, what: &str) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(JsonKvError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader, "Command")?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete reply from a stream
pub fn read_reply<R: Read>(reader: &mut R) -> Result<Reply> {
    let message = read_frame(reader, "Reply")?;
    decode_reply(&message)
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let bytes = encode_reply(reply);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
