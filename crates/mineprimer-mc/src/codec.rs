//! Packet framing and primitive field codecs.
//!
//! Packets are framed as:
//! - `[VarInt length][VarInt packet_id][payload...]`
//!
//! The length includes the packet ID and payload, but not itself.

use byteorder::{BigEndian, ReadBytesExt};
use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, Result};
use crate::varint::{read_varint, read_varint_from_buf, varint_len, write_varint_to_buf};

/// Maximum packet size accepted from a peer (9 KiB).
pub const MAX_PACKET_SIZE: usize = 9 * 1024;

/// Maximum string length in bytes.
pub const MAX_STRING_LENGTH: usize = 32767;

/// A raw packet with its ID and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    /// The packet ID.
    pub id: i32,
    /// The packet payload (without the packet ID).
    pub payload: BytesMut,
}

impl RawPacket {
    /// Create a new raw packet with the given ID and payload.
    #[must_use]
    pub const fn new(id: i32, payload: BytesMut) -> Self {
        Self { id, payload }
    }

    /// Create a new raw packet with the given ID and an empty payload.
    #[must_use]
    pub fn empty(id: i32) -> Self {
        Self {
            id,
            payload: BytesMut::new(),
        }
    }
}

/// Read a raw packet from an async reader.
///
/// The declared length is validated before any buffer is allocated.
///
/// # Errors
///
/// Returns an error if:
/// - An I/O error occurs, including a short read
/// - The declared length is negative or exceeds [`MAX_PACKET_SIZE`]
/// - The packet ID is not a valid `VarInt`
pub async fn read_packet<R: AsyncRead + Unpin>(reader: &mut R) -> Result<RawPacket> {
    let length = read_varint(reader).await?;
    let length = usize::try_from(length).map_err(|_| ProtocolError::NegativeLength(length))?;

    if length > MAX_PACKET_SIZE {
        return Err(ProtocolError::PacketTooLarge {
            len: length,
            max: MAX_PACKET_SIZE,
        });
    }

    // Read the entire packet data (packet_id + payload)
    let mut data = BytesMut::zeroed(length);
    reader.read_exact(&mut data[..]).await?;

    // Whatever follows the ID is payload
    let id = read_varint_from_buf(&mut data)?;

    Ok(RawPacket { id, payload: data })
}

/// Write a raw packet to an async writer in a single `write_all`.
///
/// # Errors
///
/// Returns an error if an I/O error occurs, or if the packet is too large
/// for its length to be expressed as a `VarInt`.
pub async fn write_packet<W: AsyncWrite + Unpin>(writer: &mut W, packet: &RawPacket) -> Result<()> {
    let total_len = varint_len(packet.id) + packet.payload.len();
    let total_len_i32 = i32::try_from(total_len).map_err(|_| ProtocolError::PacketTooLarge {
        len: total_len,
        max: i32::MAX as usize,
    })?;

    let mut buf = Vec::with_capacity(varint_len(total_len_i32) + total_len);
    write_varint_to_buf(&mut buf, total_len_i32);
    write_varint_to_buf(&mut buf, packet.id);
    buf.extend_from_slice(&packet.payload);

    writer.write_all(&buf).await?;
    writer.flush().await?;

    Ok(())
}

/// Read a length-prefixed string from a buffer.
///
/// `max_len` is a byte limit. Invalid UTF-8 sequences are replaced with
/// `U+FFFD` rather than rejected.
///
/// # Errors
///
/// Returns an error if the length is negative or exceeds `max_len`, or if
/// the buffer holds fewer bytes than declared.
pub fn read_string(buf: &mut impl Buf, max_len: usize) -> Result<String> {
    let len = read_varint_from_buf(buf)?;
    let len = usize::try_from(len).map_err(|_| ProtocolError::NegativeLength(len))?;

    if len > max_len {
        return Err(ProtocolError::StringTooLong { len, max: max_len });
    }

    if buf.remaining() < len {
        return Err(ProtocolError::eof());
    }

    let bytes = buf.copy_to_bytes(len);
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a length-prefixed string to a buffer.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    let bytes = s.as_bytes();
    write_varint_to_buf(buf, bytes.len() as i32);
    buf.put_slice(bytes);
}

/// Read a big-endian unsigned short from a buffer.
///
/// # Errors
///
/// Returns an error if fewer than 2 bytes remain.
pub fn read_unsigned_short(buf: &mut impl Buf) -> Result<u16> {
    Ok((&mut *buf).reader().read_u16::<BigEndian>()?)
}

/// Write a big-endian unsigned short to a buffer.
pub fn write_unsigned_short(buf: &mut impl BufMut, value: u16) {
    buf.put_u16(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_read_write_packet() {
        let original = RawPacket {
            id: 0x00,
            payload: BytesMut::from(&b"hello"[..]),
        };

        let mut buf = Vec::new();
        write_packet(&mut buf, &original).await.unwrap();
        assert_eq!(buf[0], 6);

        let mut cursor = Cursor::new(buf);
        let read = read_packet(&mut cursor).await.unwrap();

        assert_eq!(read, original);
    }

    #[tokio::test]
    async fn test_empty_packet() {
        let original = RawPacket::empty(0x01);

        let mut buf = Vec::new();
        write_packet(&mut buf, &original).await.unwrap();
        assert_eq!(buf, vec![0x01, 0x01]);

        let mut cursor = Cursor::new(buf);
        let read = read_packet(&mut cursor).await.unwrap();

        assert_eq!(read.id, 0x01);
        assert!(read.payload.is_empty());
    }

    #[tokio::test]
    async fn test_packet_at_size_limit() {
        let id_len = varint_len(0x01);
        let original = RawPacket::new(0x01, BytesMut::zeroed(MAX_PACKET_SIZE - id_len));

        let mut buf = Vec::new();
        write_packet(&mut buf, &original).await.unwrap();

        let mut cursor = Cursor::new(buf);
        let read = read_packet(&mut cursor).await.unwrap();
        assert_eq!(read.payload.len(), MAX_PACKET_SIZE - id_len);
    }

    #[tokio::test]
    async fn test_oversized_packet_rejected_before_body() {
        let mut buf = Vec::new();
        write_varint_to_buf(&mut buf, 9217);
        let header_len = buf.len();

        let mut cursor = Cursor::new(buf);
        let result = read_packet(&mut cursor).await;
        assert!(matches!(
            result,
            Err(ProtocolError::PacketTooLarge { len: 9217, max: MAX_PACKET_SIZE })
        ));
        assert_eq!(cursor.position(), header_len as u64);
    }

    #[tokio::test]
    async fn test_negative_packet_length() {
        let mut buf = Vec::new();
        write_varint_to_buf(&mut buf, -1);

        let mut cursor = Cursor::new(buf);
        let result = read_packet(&mut cursor).await;
        assert!(matches!(result, Err(ProtocolError::NegativeLength(-1))));
    }

    #[tokio::test]
    async fn test_short_packet_body() {
        // Declares 10 bytes but only carries 3
        let mut cursor = Cursor::new(vec![0x0a, 0x00, 0x01, 0x02]);
        let result = read_packet(&mut cursor).await;
        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }

    #[tokio::test]
    async fn test_zero_length_packet_has_no_id() {
        let mut cursor = Cursor::new(vec![0x00]);
        let result = read_packet(&mut cursor).await;
        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }

    #[test]
    fn test_read_write_string() {
        let original = "Hello, Minecraft!";

        let mut buf = BytesMut::new();
        write_string(&mut buf, original);
        assert_eq!(buf[0] as usize, original.len());

        let read = read_string(&mut buf.freeze(), MAX_STRING_LENGTH).unwrap();
        assert_eq!(read, original);
    }

    #[test]
    fn test_string_too_long() {
        let mut buf = BytesMut::new();
        write_varint_to_buf(&mut buf, 32768);

        let result = read_string(&mut buf.freeze(), MAX_STRING_LENGTH);
        assert!(matches!(
            result,
            Err(ProtocolError::StringTooLong { len: 32768, max: MAX_STRING_LENGTH })
        ));
    }

    #[test]
    fn test_string_negative_length() {
        let mut buf = BytesMut::new();
        write_varint_to_buf(&mut buf, -5);

        let result = read_string(&mut buf.freeze(), MAX_STRING_LENGTH);
        assert!(matches!(result, Err(ProtocolError::NegativeLength(-5))));
    }

    #[test]
    fn test_string_truncated() {
        let mut buf = BytesMut::new();
        write_varint_to_buf(&mut buf, 9);
        buf.put_slice(b"local");

        let result = read_string(&mut buf.freeze(), MAX_STRING_LENGTH);
        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }

    #[test]
    fn test_unsigned_short() {
        let mut buf = BytesMut::new();
        write_unsigned_short(&mut buf, 25565);
        assert_eq!(&buf[..], &[0x63, 0xdd]);

        let mut frozen = buf.freeze();
        assert_eq!(read_unsigned_short(&mut frozen).unwrap(), 25565);
        assert!(frozen.is_empty());

        let mut short = &[0x63][..];
        assert!(matches!(
            read_unsigned_short(&mut short),
            Err(ProtocolError::Io(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_string_roundtrip(s in "\\PC{0,2000}") {
            let mut buf = BytesMut::new();
            write_string(&mut buf, &s);
            let read = read_string(&mut buf.freeze(), MAX_STRING_LENGTH).unwrap();
            prop_assert_eq!(read, s);
        }

        #[test]
        fn prop_packet_roundtrip(
            id in any::<i32>(),
            payload in prop::collection::vec(any::<u8>(), 0..(MAX_PACKET_SIZE - 5)),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let original = RawPacket::new(id, BytesMut::from(&payload[..]));

            let read = runtime.block_on(async {
                let mut buf = Vec::new();
                write_packet(&mut buf, &original).await.unwrap();
                read_packet(&mut Cursor::new(buf)).await.unwrap()
            });

            prop_assert_eq!(read, original);
        }
    }
}
