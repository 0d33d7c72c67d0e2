//! winpick session guard protocol
//!
//! A running selector session listens on a local socket. Other winpick
//! processes connect to it to learn that a session is active before they
//! open a picker or switch windows. Frames are a little-endian `u32` length
//! followed by a bincode payload.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use winpick_core::SessionInfo;

/// Frames larger than this are rejected before allocating.
pub const MAX_FRAME_LENGTH: u32 = 64 * 1024;

/// Requests sent to the process holding the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Check that the holder is alive
    Ping,
    /// Describe the active session
    GetSession,
}

/// Responses sent by the process holding the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Pong response to ping
    Pong,
    /// The active session
    Session(SessionInfo),
}

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("i/o error: {0}")]
    InputOutput(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("frame of {length} bytes exceeds the size limit")]
    TooLarge { length: u32 },
}

pub fn write_frame<T: Serialize>(writer: &mut impl Write, message: &T) -> Result<(), FrameError> {
    let payload = bincode::serialize(message)?;
    let length = u32::try_from(payload.len()).map_err(|_| FrameError::TooLarge { length: u32::MAX })?;
    if length > MAX_FRAME_LENGTH {
        return Err(FrameError::TooLarge { length });
    }

    writer.write_all(&length.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

pub fn read_frame<T: for<'de> Deserialize<'de>>(reader: &mut impl Read) -> Result<T, FrameError> {
    let mut length_buffer = [0u8; 4];
    reader.read_exact(&mut length_buffer)?;
    let length = u32::from_le_bytes(length_buffer);
    if length > MAX_FRAME_LENGTH {
        return Err(FrameError::TooLarge { length });
    }

    let mut payload = vec![0u8; length as usize];
    reader.read_exact(&mut payload)?;
    Ok(bincode::deserialize(&payload)?)
}
