//! Packet metadata shared by every typed packet.

use crate::error::{ProtocolError, Result};

/// The connection state for a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Handshaking state (initial connection).
    Handshake = 0,
    /// Status state (server list ping).
    Status = 1,
    /// Login state (authentication).
    Login = 2,
    /// Play state (in-game). Never entered directly from a handshake.
    Play = 3,
}

impl ConnectionState {
    /// Map the `next_state` field of a handshake to a connection state.
    ///
    /// Only status (1) and login (2) may follow a handshake.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownNextState`] for any other value.
    pub const fn from_next_state(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Self::Status),
            2 => Ok(Self::Login),
            _ => Err(ProtocolError::UnknownNextState(value)),
        }
    }
}

/// A protocol packet.
///
/// This trait provides metadata about a packet type, including its ID
/// and the connection state it belongs to.
pub trait Packet: Sized {
    /// The packet ID.
    const ID: i32;

    /// The connection state this packet belongs to.
    const STATE: ConnectionState;
}
