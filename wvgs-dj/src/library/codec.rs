//! Length-prefixed frame codec
//!
//! A clip file is a concatenation of frames, each a little-endian u16 byte
//! length followed by exactly that many bytes of opaque, pre-encoded audio
//! payload. End of input is only legal at a length-prefix boundary: a lone
//! trailing prefix byte or a payload shorter than its declared length is a
//! fatal decode error, never silently dropped.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};

/// Decode an entire clip into its frame sequence
///
/// Returns an empty sequence for empty input. Zero-length frames are legal.
pub fn read_frames<R: Read>(reader: &mut R) -> Result<Vec<Vec<u8>>> {
    let mut frames = Vec::new();

    loop {
        let mut prefix = [0u8; 2];
        if !read_prefix(reader, &mut prefix, frames.len())? {
            return Ok(frames);
        }

        let len = u16::from_le_bytes(prefix) as usize;
        let mut payload = vec![0u8; len];
        match reader.read_exact(&mut payload) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(Error::Codec(format!(
                    "frame {} truncated: expected {} payload bytes",
                    frames.len(),
                    len
                )));
            }
            Err(e) => return Err(Error::Io(e)),
        }

        frames.push(payload);
    }
}

/// Encode a frame sequence in the length-prefixed format
///
/// Fails if any frame exceeds the u16 length prefix.
pub fn write_frames<W: Write>(writer: &mut W, frames: &[Vec<u8>]) -> Result<()> {
    for frame in frames {
        let len = u16::try_from(frame.len()).map_err(|_| {
            Error::Codec(format!(
                "frame of {} bytes exceeds the u16 length prefix",
                frame.len()
            ))
        })?;
        writer.write_all(&len.to_le_bytes())?;
        writer.write_all(frame)?;
    }
    Ok(())
}

/// Fill a length prefix, distinguishing clean end-of-input from truncation
///
/// Returns false on end-of-input exactly at the boundary.
fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8; 2], frame_index: usize) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(Error::Codec(format!(
                "truncated length prefix before frame {}",
                frame_index
            )));
        }
        filled += n;
    }
    Ok(true)
}
