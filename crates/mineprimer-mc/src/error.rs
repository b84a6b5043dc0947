//! Protocol error types.

use std::io;

use thiserror::Error;

/// Errors that can occur when reading or writing handshake and status data.
///
/// Every variant is fatal to the connection that produced it.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An I/O error occurred (including EOF and deadline expiry).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A `VarInt` was too long (more than 5 bytes).
    #[error("VarInt too long")]
    VarIntTooLong,

    /// A length prefix decoded to a negative value.
    #[error("Negative length: {0}")]
    NegativeLength(i32),

    /// A packet declared a length above the maximum.
    #[error("Packet too large: {len} bytes (max {max})")]
    PacketTooLarge {
        /// The declared length of the packet.
        len: usize,
        /// The maximum allowed length.
        max: usize,
    },

    /// A string exceeded the maximum length.
    #[error("String too long: {len} bytes (max {max})")]
    StringTooLong {
        /// The declared length of the string.
        len: usize,
        /// The maximum allowed length.
        max: usize,
    },

    /// The first packet on a connection was not a handshake.
    #[error("First packet is not a handshake (id=0x{0:02X})")]
    UnexpectedFirstPacket(i32),

    /// A handshake asked for a state other than status or login.
    #[error("Unknown next state: {0}")]
    UnknownNextState(i32),

    /// A typed packet was decoded from a raw packet with another ID.
    #[error("Invalid packet ID: 0x{0:02X}")]
    InvalidPacketId(i32),

    /// The status JSON could not be produced or parsed.
    #[error("Status JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Build the error reported when a connection deadline passes.
    #[must_use]
    pub fn timed_out() -> Self {
        Self::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "connection deadline exceeded",
        ))
    }

    /// Build the error reported when an in-memory buffer runs out.
    #[must_use]
    pub(crate) fn eof() -> Self {
        Self::Io(io::ErrorKind::UnexpectedEof.into())
    }
}

/// Result type alias using [`ProtocolError`].
pub type Result<T> = std::result::Result<T, ProtocolError>;
