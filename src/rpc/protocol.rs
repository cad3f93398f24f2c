//! RPC protocol encoding and decoding
//!
//! Message format:
//! - 4 bytes: message length (big-endian u32)
//! - N bytes: JSON payload
//!
//! The same framing is used in both directions.

use bytes::{Buf, BufMut, BytesMut};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{IpQueryError, Result};

/// Maximum allowed message size (64KB)
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Encode a message for transmission
///
/// Returns a byte vector containing:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON-encoded payload
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(msg)?;

    if json.len() > MAX_MESSAGE_SIZE {
        return Err(IpQueryError::protocol(format!(
            "message too large: {} bytes (max: {})",
            json.len(),
            MAX_MESSAGE_SIZE
        )));
    }

    let mut buf = Vec::with_capacity(4 + json.len());
    buf.put_u32(json.len() as u32);
    buf.extend_from_slice(&json);
    Ok(buf)
}

/// Decode a message from a buffer
///
/// Returns:
/// - `Ok(Some(msg))` - Complete message decoded, buffer advanced
/// - `Ok(None)` - Need more data (buffer unchanged)
/// - `Err(e)` - Protocol error
///
/// The buffer is only modified when a complete message is successfully
/// decoded.
pub fn decode<T: DeserializeOwned>(buf: &mut BytesMut) -> Result<Option<T>> {
    // Need at least 4 bytes for the length header
    if buf.len() < 4 {
        return Ok(None);
    }

    // Peek at the length without consuming
    let length = (&buf[..4]).get_u32() as usize;

    if length > MAX_MESSAGE_SIZE {
        return Err(IpQueryError::protocol(format!(
            "message too large: {} bytes (max: {})",
            length, MAX_MESSAGE_SIZE
        )));
    }

    // Check if we have the complete message
    if buf.len() < 4 + length {
        return Ok(None);
    }

    buf.advance(4);
    let json_bytes = buf.split_to(length);

    let msg = serde_json::from_slice(&json_bytes)?;
    Ok(Some(msg))
}
