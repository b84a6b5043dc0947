//! Per-connection protocol driver.
//!
//! A connection starts in the handshake state. The first packet must be a
//! handshake; a status request then enters the status loop, which answers
//! status requests and echoes pings until the client goes away. Login is
//! not served: the handshake is handed back to the caller instead.

use std::convert::Infallible;

use mineprimer_mc::ProtocolError;
use mineprimer_mc::codec::{RawPacket, read_packet, write_packet};
use mineprimer_mc::error::Result;
use mineprimer_mc::packets::{
    ConnectionState, Handshake, Packet, Ping, Pong, Status, StatusDescription, StatusPlayers,
    StatusRequest, StatusResponse, StatusVersion,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

/// What the server reports in its status response.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Version name shown in the server list.
    pub version_name: String,
    /// Server description (MOTD).
    pub motd: String,
    /// Maximum players shown in status.
    pub max_players: u32,
    /// Emitted as `enforcesSecureChat` when set.
    pub enforces_secure_chat: Option<bool>,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            version_name: "Server on Standby".to_string(),
            motd: "Server is on standby".to_string(),
            max_players: 20,
            enforces_secure_chat: None,
        }
    }
}

impl ServerInfo {
    /// Build the status body for a client.
    ///
    /// The protocol number echoes the client's own, so every client sees
    /// the server as compatible.
    #[must_use]
    pub fn status_for(&self, handshake: &Handshake) -> Status {
        Status {
            version: StatusVersion {
                name: self.version_name.clone(),
                protocol: handshake.protocol_version,
            },
            players: StatusPlayers {
                max: self.max_players,
                online: 0,
                sample: None,
            },
            description: StatusDescription {
                text: self.motd.clone(),
            },
            favicon: None,
            enforces_secure_chat: self.enforces_secure_chat,
        }
    }
}

/// Drive one connection until it ends.
///
/// Every read and write must complete before `deadline`.
///
/// Returns the handshake if the client asked to log in, so the caller can
/// decide what to do with it.
///
/// # Errors
///
/// Returns the error that ended the connection. A status session always
/// ends this way, usually with an EOF once the client disconnects.
pub async fn serve<S>(stream: &mut S, deadline: Instant, info: &ServerInfo) -> Result<Handshake>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let raw = read_before(stream, deadline).await?;
    if raw.id != Handshake::ID {
        warn!(id = raw.id, "First packet is not a handshake");
    }

    let handshake = Handshake::from_raw(&raw)?;

    match handshake.next_state {
        ConnectionState::Status => match serve_status(stream, deadline, info, &handshake).await {
            Ok(never) => match never {},
            Err(e) => Err(e),
        },
        // Login and anything later belongs to the caller
        _ => Ok(handshake),
    }
}

/// Answer status requests and pings until a read or write fails.
async fn serve_status<S>(
    stream: &mut S,
    deadline: Instant,
    info: &ServerInfo,
    handshake: &Handshake,
) -> Result<Infallible>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let raw = read_before(stream, deadline).await?;

        match raw.id {
            StatusRequest::ID => {
                let response = StatusResponse::from_status(&info.status_for(handshake))?;
                write_before(stream, deadline, &response.to_raw()).await?;

                debug!(json = %response.json, "Sent status response");
            }
            Ping::ID => {
                let ping = Ping::from_raw(&raw)?;
                write_before(stream, deadline, &Pong::echo(&ping).to_raw()).await?;

                debug!(len = ping.payload.len(), token = ?ping.token(), "Echoed ping");
            }
            id => warn!(id, "Unknown status packet"),
        }
    }
}

async fn read_before<S>(stream: &mut S, deadline: Instant) -> Result<RawPacket>
where
    S: AsyncRead + Unpin,
{
    timeout_at(deadline, read_packet(stream))
        .await
        .map_err(|_| ProtocolError::timed_out())?
}

async fn write_before<S>(stream: &mut S, deadline: Instant, packet: &RawPacket) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    timeout_at(deadline, write_packet(stream, packet))
        .await
        .map_err(|_| ProtocolError::timed_out())?
}
