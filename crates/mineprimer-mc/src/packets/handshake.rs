//! Handshake packet definitions.
//!
//! The handshake is the first packet sent by the client and determines
//! whether this is a status ping or a login attempt.

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::codec::{
    MAX_STRING_LENGTH, RawPacket, read_string, read_unsigned_short, write_string,
    write_unsigned_short,
};
use crate::error::{ProtocolError, Result};
use crate::packets::traits::{ConnectionState, Packet};
use crate::varint::{read_varint_from_buf, write_varint_to_buf};

/// Handshake packet sent by the client.
///
/// This is always the first packet in a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// The protocol version the client is using.
    pub protocol_version: i32,
    /// The server address the client connected to.
    pub server_address: String,
    /// The server port the client connected to.
    pub server_port: u16,
    /// The next state: Status or Login.
    pub next_state: ConnectionState,
}

impl Packet for Handshake {
    const ID: i32 = 0x00;
    const STATE: ConnectionState = ConnectionState::Handshake;
}

impl Handshake {
    /// Parse a handshake from the first raw packet of a connection.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnexpectedFirstPacket`] if the packet is not
    /// a handshake, or any error from [`Handshake::decode`].
    pub fn from_raw(packet: &RawPacket) -> Result<Self> {
        if packet.id != Self::ID {
            return Err(ProtocolError::UnexpectedFirstPacket(packet.id));
        }

        Self::decode(&mut packet.payload.clone().freeze())
    }

    /// Decode a handshake payload.
    ///
    /// All four fields are read before `next_state` is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is malformed or truncated, or if the
    /// next state is neither status nor login.
    pub fn decode(buf: &mut impl Buf) -> Result<Self> {
        let protocol_version = read_varint_from_buf(buf)?;
        let server_address = read_string(buf, MAX_STRING_LENGTH)?;
        let server_port = read_unsigned_short(buf)?;
        let next_state = read_varint_from_buf(buf)?;

        debug!(
            protocol = protocol_version,
            address = %server_address,
            port = server_port,
            next_state,
            "Decoded handshake"
        );

        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state: ConnectionState::from_next_state(next_state)?,
        })
    }

    /// Encode the handshake to a raw packet.
    #[must_use]
    pub fn to_raw(&self) -> RawPacket {
        let mut payload = BytesMut::new();

        write_varint_to_buf(&mut payload, self.protocol_version);
        write_string(&mut payload, &self.server_address);
        write_unsigned_short(&mut payload, self.server_port);
        write_varint_to_buf(&mut payload, self.next_state as i32);

        RawPacket::new(Self::ID, payload)
    }
}
