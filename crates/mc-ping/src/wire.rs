//! VarInt framing for the Server List Ping exchange.
//!
//! Packets are length-prefixed: `VarInt(len)` followed by `len` payload
//! bytes. The payload starts with a `VarInt` packet id.

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::PingError;

/// Maximum bytes a VarInt may occupy on the wire.
const VARINT_MAX_BYTES: usize = 5;

/// Upper bound on a single status frame. The vanilla server caps the
/// status JSON well below this; anything larger is a broken peer.
pub(crate) const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Append a VarInt to `buf`.
pub fn put_varint(buf: &mut BytesMut, value: i32) {
    let mut raw = value as u32;
    loop {
        let byte = (raw & 0x7f) as u8;
        raw >>= 7;
        if raw == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | 0x80);
    }
}

/// Append a length-prefixed UTF-8 string to `buf`.
pub fn put_string(buf: &mut BytesMut, value: &str) {
    put_varint(buf, value.len() as i32);
    buf.put_slice(value.as_bytes());
}

/// Read a VarInt from the stream.
pub async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, PingError> {
    let mut value: u32 = 0;
    for i in 0..VARINT_MAX_BYTES {
        let byte = reader.read_u8().await?;
        value |= u32::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(PingError::Frame("VarInt longer than 5 bytes".into()))
}

/// Read one length-prefixed frame and return its payload.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, PingError> {
    let len = read_varint(reader).await?;
    if len < 0 || len as usize > MAX_FRAME_LEN {
        return Err(PingError::Frame(format!("bad frame length {len}")));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Wrap a packet payload in a length prefix.
pub fn frame(payload: &BytesMut) -> BytesMut {
    let mut framed = BytesMut::with_capacity(payload.len() + VARINT_MAX_BYTES);
    put_varint(&mut framed, payload.len() as i32);
    framed.extend_from_slice(payload);
    framed
}
