//! Protocol packets.
//!
//! Packets are organized by connection state:
//! - Handshake: Initial connection state
//! - Status: Server list ping
//!
//! Login and play packets are not implemented.

pub mod handshake;
pub mod status;
pub mod traits;

pub use handshake::Handshake;
pub use status::{
    Ping, PlayerSample, Pong, Status, StatusDescription, StatusPlayers, StatusRequest,
    StatusResponse, StatusVersion,
};
pub use traits::{ConnectionState, Packet};
