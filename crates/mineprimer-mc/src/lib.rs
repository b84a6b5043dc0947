//! Minecraft handshake and status protocol for mineprimer.
//!
//! This crate provides the `VarInt` and primitive codecs, packet framing,
//! and the typed packets exchanged before login.

pub mod codec;
pub mod error;
pub mod packets;
pub mod varint;

pub use error::ProtocolError;
