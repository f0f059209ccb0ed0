// SPDX-License-Identifier: MIT

//! Length-prefixed JSON framing: 4-byte big-endian length, then the JSON
//! payload. Shared by any transport `sessionfs-daemon` chooses to run
//! `Request`/`Response` over.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Messages larger than this are rejected outright rather than causing
/// an unbounded allocation from a malformed length prefix.
pub const MAX_MESSAGE_BYTES: u32 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message of {0} bytes exceeds the {1}-byte limit")]
    TooLarge(u32, u32),

    #[error("connection closed before a full message was received")]
    Eof,
}

/// Serialize `value` into the length-prefixed wire format.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    let body = serde_json::to_vec(value)?;
    let len = u32::try_from(body.len()).map_err(|_| ProtocolError::TooLarge(u32::MAX, MAX_MESSAGE_BYTES))?;
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::TooLarge(len, MAX_MESSAGE_BYTES));
    }
    let mut out = Vec::with_capacity(4 + body.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Deserialize a single length-prefixed message from `bytes`, returning
/// the value and the number of bytes consumed.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<(T, usize), ProtocolError> {
    if bytes.len() < 4 {
        return Err(ProtocolError::Eof);
    }
    let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::TooLarge(len, MAX_MESSAGE_BYTES));
    }
    let end = 4 + len as usize;
    if bytes.len() < end {
        return Err(ProtocolError::Eof);
    }
    let value = serde_json::from_slice(&bytes[4..end])?;
    Ok((value, end))
}

/// Read one length-prefixed message from an async stream.
pub async fn read_message<T, R>(reader: &mut R) -> Result<T, ProtocolError>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ProtocolError::Eof
        } else {
            ProtocolError::Io(e)
        }
    })?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::TooLarge(len, MAX_MESSAGE_BYTES));
    }
    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Write one length-prefixed message to an async stream.
pub async fn write_message<T, W>(writer: &mut W, value: &T) -> Result<(), ProtocolError>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let framed = encode(value)?;
    writer.write_all(&framed).await?;
    writer.flush().await?;
    Ok(())
}

/// Convenience alias used by the daemon listener.
pub async fn read_request<R>(reader: &mut R) -> Result<crate::Request, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    read_message(reader).await
}

/// Convenience alias used by the daemon listener.
pub async fn write_response<W>(writer: &mut W, response: &crate::Response) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    write_message(writer, response).await
}
