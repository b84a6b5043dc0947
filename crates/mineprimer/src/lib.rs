//! Standby server for the Minecraft server list ping.
//!
//! Accepts connections, reads the handshake, and answers status requests
//! and pings. Login is not served.

pub mod config;
pub mod connection;
pub mod server;
pub mod utils;
