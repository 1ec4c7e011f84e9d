//! mc-ping - Minecraft Server List Ping client.
//!
//! Implements the modern status exchange: a handshake packet (protocol
//! version -1, host, port, next state 1) followed by an empty status
//! request, answered by a single JSON status frame.
//!
//! ```no_run
//! # async fn example() -> Result<(), mc_ping::PingError> {
//! let status = mc_ping::query("mc.example.net").await?;
//! println!("{} players online", status.players.online);
//! # Ok(())
//! # }
//! ```

mod wire;

use std::time::Duration;

use bytes::BytesMut;
use serde::Deserialize;
use thiserror::Error;
use tokio::{io::AsyncWriteExt, net::TcpStream};

pub use wire::{put_string, put_varint, read_frame, read_varint};

/// Default Minecraft server port.
pub const DEFAULT_PORT: u16 = 25565;

/// Status handshake packet id.
const PACKET_HANDSHAKE: i32 = 0x00;
/// Status request/response packet id.
const PACKET_STATUS: i32 = 0x00;
/// Protocol version meaning "status only, any version".
const PROTOCOL_STATUS: i32 = -1;
/// Next-state value selecting the status flow.
const NEXT_STATE_STATUS: i32 = 1;

/// Errors from a status query.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server did not answer within {0:?}")]
    Timeout(Duration),

    #[error("malformed frame: {0}")]
    Frame(String),

    #[error("malformed status json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad server address: {0}")]
    Addr(String),
}

/// Player counts and the optional player sample.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Players {
    #[serde(default)]
    pub online: u32,
    #[serde(default)]
    pub max: u32,
    #[serde(default)]
    pub sample: Vec<PlayerSample>,
}

/// One entry of the player sample.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSample {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// The MOTD. Servers send either a plain string or a chat object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Object {
        #[serde(default)]
        text: String,
    },
}

impl Description {
    /// The plain text of the MOTD, ignoring chat formatting.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Object { text } => text,
        }
    }
}

impl Default for Description {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Decoded status response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub players: Players,
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub favicon: Option<String>,
}

/// Split `host` or `host:port` into its parts, defaulting the port.
pub fn split_host_port(addr: &str) -> Result<(&str, u16), PingError> {
    match addr.rsplit_once(':') {
        None => Ok((addr, DEFAULT_PORT)),
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| PingError::Addr(addr.to_string()))?;
            if host.is_empty() {
                return Err(PingError::Addr(addr.to_string()));
            }
            Ok((host, port))
        }
    }
}

/// Query a server's status with a 5 second deadline.
pub async fn query(addr: &str) -> Result<StatusResponse, PingError> {
    query_timeout(addr, Duration::from_secs(5)).await
}

/// Query a server's status, giving up after `deadline`.
pub async fn query_timeout(addr: &str, deadline: Duration) -> Result<StatusResponse, PingError> {
    let (host, port) = split_host_port(addr)?;
    tokio::time::timeout(deadline, exchange(host, port))
        .await
        .map_err(|_| PingError::Timeout(deadline))?
}

async fn exchange(host: &str, port: u16) -> Result<StatusResponse, PingError> {
    let mut stream = TcpStream::connect((host, port)).await?;

    let mut handshake = BytesMut::new();
    put_varint(&mut handshake, PACKET_HANDSHAKE);
    put_varint(&mut handshake, PROTOCOL_STATUS);
    put_string(&mut handshake, host);
    handshake.extend_from_slice(&port.to_be_bytes());
    put_varint(&mut handshake, NEXT_STATE_STATUS);
    stream.write_all(&wire::frame(&handshake)).await?;

    let mut request = BytesMut::new();
    put_varint(&mut request, PACKET_STATUS);
    stream.write_all(&wire::frame(&request)).await?;
    stream.flush().await?;

    let payload = read_frame(&mut stream).await?;
    decode_status(&payload)
}

/// Decode a status response payload (packet id + JSON string).
fn decode_status(payload: &[u8]) -> Result<StatusResponse, PingError> {
    let mut cursor = std::io::Cursor::new(payload);
    let packet_id = read_varint_sync(&mut cursor)?;
    if packet_id != PACKET_STATUS {
        return Err(PingError::Frame(format!("unexpected packet id {packet_id}")));
    }
    let json_len = read_varint_sync(&mut cursor)? as usize;
    let start = cursor.position() as usize;
    let json = payload
        .get(start..start + json_len)
        .ok_or_else(|| PingError::Frame("status json truncated".into()))?;
    Ok(serde_json::from_slice(json)?)
}

/// Synchronous VarInt read over an in-memory payload.
fn read_varint_sync(cursor: &mut std::io::Cursor<&[u8]>) -> Result<i32, PingError> {
    use std::io::Read;
    let mut value: u32 = 0;
    for i in 0..5 {
        let mut byte = [0u8; 1];
        cursor.read_exact(&mut byte)?;
        value |= u32::from(byte[0] & 0x7f) << (7 * i);
        if byte[0] & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(PingError::Frame("VarInt longer than 5 bytes".into()))
}
