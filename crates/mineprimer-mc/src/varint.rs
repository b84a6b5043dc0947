//! `VarInt` encoding/decoding.
//!
//! Every length and packet ID on the wire is a `VarInt`: each byte carries
//! 7 bits of data, least significant group first, and the high bit is set
//! when another byte follows. A `VarInt` is at most 5 bytes long.

use bytes::{Buf, BufMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{ProtocolError, Result};

/// Segment bits mask (lower 7 bits).
const SEGMENT_BITS: u8 = 0x7F;

/// Continue bit (high bit).
const CONTINUE_BIT: u8 = 0x80;

/// Maximum number of bytes in an encoded `VarInt`.
pub const MAX_VARINT_LEN: usize = 5;

/// Fold one wire byte into the value being decoded.
///
/// Returns `Some(value)` once the terminating byte has been seen.
fn accumulate(value: &mut i32, position: &mut u32, byte: u8) -> Result<Option<i32>> {
    *value |= i32::from(byte & SEGMENT_BITS) << *position;

    if byte & CONTINUE_BIT == 0 {
        return Ok(Some(*value));
    }

    *position += 7;
    if *position >= 32 {
        return Err(ProtocolError::VarIntTooLong);
    }

    Ok(None)
}

/// Read a `VarInt` from an async reader, one byte at a time.
///
/// # Errors
///
/// Returns an error if:
/// - An I/O error occurs (including EOF before the final byte)
/// - The `VarInt` is longer than 5 bytes; the 6th byte is never read
pub async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32> {
    let mut value: i32 = 0;
    let mut position: u32 = 0;

    loop {
        let byte = reader.read_u8().await?;
        if let Some(value) = accumulate(&mut value, &mut position, byte)? {
            return Ok(value);
        }
    }
}

/// Read a `VarInt` from a buffer.
///
/// # Errors
///
/// Returns an error if the buffer ends early or the `VarInt` is too long.
pub fn read_varint_from_buf(buf: &mut impl Buf) -> Result<i32> {
    let mut value: i32 = 0;
    let mut position: u32 = 0;

    loop {
        if !buf.has_remaining() {
            return Err(ProtocolError::eof());
        }

        if let Some(value) = accumulate(&mut value, &mut position, buf.get_u8())? {
            return Ok(value);
        }
    }
}

/// Write a `VarInt` to a buffer.
///
/// Negative values are encoded from their two's complement bits and always
/// take 5 bytes.
///
/// Returns the number of bytes written.
#[allow(clippy::cast_sign_loss)]
pub fn write_varint_to_buf(buf: &mut impl BufMut, value: i32) -> usize {
    let mut value = value as u32;
    let mut bytes_written = 0;

    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (value & u32::from(SEGMENT_BITS)) as u8;
        value >>= 7;

        if value != 0 {
            byte |= CONTINUE_BIT;
        }

        buf.put_u8(byte);
        bytes_written += 1;

        if value == 0 {
            break;
        }
    }

    bytes_written
}

/// Calculate the number of bytes needed to encode a `VarInt`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn varint_len(value: i32) -> usize {
    let value = value as u32;

    if value == 0 {
        return 1;
    }

    let bits_needed = 32 - value.leading_zeros();
    (bits_needed as usize).div_ceil(7)
}
