//! Reply definitions
//!
//! Represents replies received from the server.

/// Reply status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

/// A reply received from the server
#[derive(Debug, Clone)]
pub struct Reply {
    /// Status code
    pub status: Status,

    /// Optional payload (JSON text for GET, type word for TYPE,
    /// error message for ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Reply {
    /// Create an OK reply with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create a NOT_FOUND reply
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR reply
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// The payload interpreted as UTF-8, empty if absent
    pub fn payload_str(&self) -> std::borrow::Cow<'_, str> {
        match &self.payload {
            Some(bytes) => String::from_utf8_lossy(bytes),
            None => std::borrow::Cow::Borrowed(""),
        }
    }
}
