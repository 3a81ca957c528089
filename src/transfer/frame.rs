//! Chunked binary frame I/O
//!
//! Inbound frames carry a 4-byte little-endian length prefix. Outbound data is
//! written raw; its size was already announced in the command that opened the
//! transfer.

use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{Result, XeError};
use super::cancel::CancelToken;
use super::progress::{ProgressSink, ProgressTracker};

/// Length prefix size
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default bytes per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 0x1000;

/// Upper bound on the buffer reserved from a length prefix before data arrives
const MAX_PREALLOCATION: usize = 1 << 20;

/// Read the length prefix of an inbound frame
pub fn read_frame_len<R: Read>(reader: &mut R) -> Result<u32> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut prefix)?;
    Ok(u32::from_le_bytes(prefix))
}

/// Validate that a buffer fits the 32-bit length limit
pub fn checked_frame_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        XeError::InvalidArgument(format!(
            "Buffer too large: {} bytes (max {})",
            len,
            u32::MAX
        ))
    })
}

/// Read one length-prefixed frame into an owned buffer
pub fn read_frame<R, P>(
    reader: &mut R,
    chunk_size: usize,
    cancel: &CancelToken,
    progress: &mut P,
) -> Result<BytesMut>
where
    R: Read,
    P: ProgressSink + ?Sized,
{
    let total = read_frame_len(reader)? as usize;
    let mut buffer = BytesMut::with_capacity(total.min(MAX_PREALLOCATION));
    let mut chunk = chunk_buffer(chunk_size, total);

    pump(reader, total, &mut chunk, cancel, progress, |data| {
        buffer.put_slice(data);
        Ok(())
    })?;

    Ok(buffer)
}

/// Stream one length-prefixed frame into `sink` without buffering it whole.
///
/// Returns the number of bytes copied.
pub fn copy_frame<R, W, P>(
    reader: &mut R,
    sink: &mut W,
    chunk_size: usize,
    cancel: &CancelToken,
    progress: &mut P,
) -> Result<u64>
where
    R: Read,
    W: Write + ?Sized,
    P: ProgressSink + ?Sized,
{
    let total = read_frame_len(reader)? as usize;
    let mut chunk = chunk_buffer(chunk_size, total);

    let copied = pump(reader, total, &mut chunk, cancel, progress, |data| {
        sink.write_all(data)?;
        Ok(())
    })?;

    sink.flush()?;
    Ok(copied)
}

/// Write `data` in chunks, reporting progress after each
pub fn write_chunked<W, P>(
    writer: &mut W,
    data: &[u8],
    chunk_size: usize,
    cancel: &CancelToken,
    progress: &mut P,
) -> Result<()>
where
    W: Write,
    P: ProgressSink + ?Sized,
{
    let total = checked_frame_len(data.len())?;
    let mut tracker = ProgressTracker::new(progress, total as u64);

    for chunk in data.chunks(chunk_size.max(1)) {
        cancel.check()?;
        writer.write_all(chunk)?;
        tracker.advance(chunk.len());
    }

    writer.flush()?;
    Ok(())
}

/// Scratch buffer for one chunk; a zero chunk size is treated as one byte
fn chunk_buffer(chunk_size: usize, total: usize) -> Vec<u8> {
    vec![0u8; chunk_size.max(1).min(total.max(1))]
}

/// Move `total` bytes from `reader` to `deliver`, one chunk at a time
fn pump<R, P, F>(
    reader: &mut R,
    total: usize,
    chunk: &mut [u8],
    cancel: &CancelToken,
    progress: &mut P,
    mut deliver: F,
) -> Result<u64>
where
    R: Read,
    P: ProgressSink + ?Sized,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut tracker = ProgressTracker::new(progress, total as u64);
    let mut remaining = total;

    while remaining > 0 {
        if cancel.is_cancelled() {
            tracing::warn!(
                "Binary transfer cancelled after {} of {} bytes; stream is desynchronized",
                tracker.transferred(),
                total
            );
            return Err(XeError::Cancelled);
        }

        let len = chunk.len().min(remaining);
        reader.read_exact(&mut chunk[..len])?;
        deliver(&chunk[..len])?;

        remaining -= len;
        tracker.advance(len);
    }

    Ok(tracker.transferred())
}
