//! Status protocol packets.
//!
//! The status protocol is used by clients to query server information
//! without joining: a status request answered with a JSON description,
//! followed by a ping that is echoed back.

use byteorder::{BigEndian, ReadBytesExt};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::{MAX_STRING_LENGTH, RawPacket, read_string, write_string};
use crate::error::{ProtocolError, Result};
use crate::packets::traits::{ConnectionState, Packet};

/// Status Request packet (client -> server).
///
/// Carries no fields; any payload is ignored.
#[derive(Debug, Clone, Default)]
pub struct StatusRequest;

impl Packet for StatusRequest {
    const ID: i32 = 0x00;
    const STATE: ConnectionState = ConnectionState::Status;
}

impl StatusRequest {
    /// Parse a status request from a raw packet.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet ID is invalid.
    pub const fn from_raw(packet: &RawPacket) -> Result<Self> {
        if packet.id != Self::ID {
            return Err(ProtocolError::InvalidPacketId(packet.id));
        }
        Ok(Self)
    }

    /// Encode to a raw packet.
    #[must_use]
    pub fn to_raw(&self) -> RawPacket {
        RawPacket::empty(Self::ID)
    }
}

/// Status Response packet (server -> client).
///
/// Contains a JSON object with server information.
#[derive(Debug, Clone)]
pub struct StatusResponse {
    /// JSON response containing server status.
    pub json: String,
}

impl Packet for StatusResponse {
    const ID: i32 = 0x00;
    const STATE: ConnectionState = ConnectionState::Status;
}

impl StatusResponse {
    /// Create a new status response with the given JSON.
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }

    /// Serialize a [`Status`] into a response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn from_status(status: &Status) -> Result<Self> {
        Ok(Self::new(serde_json::to_string(status)?))
    }

    /// Parse the JSON body back into a [`Status`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the status schema.
    pub fn status(&self) -> Result<Status> {
        Ok(serde_json::from_str(&self.json)?)
    }

    /// Parse a status response from a raw packet.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet is malformed.
    pub fn from_raw(packet: &RawPacket) -> Result<Self> {
        if packet.id != Self::ID {
            return Err(ProtocolError::InvalidPacketId(packet.id));
        }

        let mut buf = packet.payload.clone().freeze();
        let json = read_string(&mut buf, MAX_STRING_LENGTH)?;

        Ok(Self { json })
    }

    /// Encode to a raw packet.
    #[must_use]
    pub fn to_raw(&self) -> RawPacket {
        let mut payload = BytesMut::new();
        write_string(&mut payload, &self.json);
        RawPacket::new(Self::ID, payload)
    }
}

/// Ping packet (client -> server).
///
/// The payload is opaque; clients normally send an 8-byte timestamp.
#[derive(Debug, Clone)]
pub struct Ping {
    /// Raw payload bytes.
    pub payload: BytesMut,
}

impl Packet for Ping {
    const ID: i32 = 0x01;
    const STATE: ConnectionState = ConnectionState::Status;
}

impl Ping {
    /// Create a ping carrying the given 8-byte token.
    #[must_use]
    pub fn new(token: i64) -> Self {
        Self {
            payload: BytesMut::from(&token.to_be_bytes()[..]),
        }
    }

    /// Parse a ping from a raw packet.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet ID is invalid.
    pub fn from_raw(packet: &RawPacket) -> Result<Self> {
        if packet.id != Self::ID {
            return Err(ProtocolError::InvalidPacketId(packet.id));
        }

        Ok(Self {
            payload: packet.payload.clone(),
        })
    }

    /// The big-endian token, if the payload is exactly 8 bytes.
    #[must_use]
    pub fn token(&self) -> Option<i64> {
        if self.payload.len() != 8 {
            return None;
        }
        (&self.payload[..]).read_i64::<BigEndian>().ok()
    }

    /// Encode to a raw packet.
    #[must_use]
    pub fn to_raw(&self) -> RawPacket {
        RawPacket::new(Self::ID, self.payload.clone())
    }
}

/// Pong packet (server -> client).
///
/// Server echoes back the ping payload byte for byte.
#[derive(Debug, Clone)]
pub struct Pong {
    /// The payload from the ping packet.
    pub payload: BytesMut,
}

impl Packet for Pong {
    const ID: i32 = 0x01;
    const STATE: ConnectionState = ConnectionState::Status;
}

impl Pong {
    /// Answer a ping with its own payload.
    #[must_use]
    pub fn echo(ping: &Ping) -> Self {
        Self {
            payload: ping.payload.clone(),
        }
    }

    /// Parse a pong from a raw packet.
    ///
    /// # Errors
    ///
    /// Returns an error if the packet ID is invalid.
    pub fn from_raw(packet: &RawPacket) -> Result<Self> {
        if packet.id != Self::ID {
            return Err(ProtocolError::InvalidPacketId(packet.id));
        }

        Ok(Self {
            payload: packet.payload.clone(),
        })
    }

    /// Encode to a raw packet.
    #[must_use]
    pub fn to_raw(&self) -> RawPacket {
        RawPacket::new(Self::ID, self.payload.clone())
    }
}

/// JSON body of a [`StatusResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub version: StatusVersion,
    pub players: StatusPlayers,
    pub description: StatusDescription,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforces_secure_chat: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusVersion {
    pub name: String,
    pub protocol: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPlayers {
    pub max: u32,
    pub online: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<PlayerSample>>,
}

/// An entry in the player list hover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSample {
    pub name: String,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDescription {
    pub text: String,
}
