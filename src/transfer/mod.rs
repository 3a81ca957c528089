//! Binary Transfer Module
//!
//! Moves raw payloads over the control socket in bounded chunks.
//!
//! ## Frame Format (server → client)
//! ```text
//! ┌──────────────┬──────────────────────────────────┐
//! │ Len (4, LE)  │         Payload (Len bytes)      │
//! └──────────────┴──────────────────────────────────┘
//! ```
//!
//! Uploads carry no prefix: the size travels in the command (`length=N`).
//!
//! ## Cancellation
//! The [`CancelToken`] is checked before every chunk. A cancelled transfer
//! leaves unread bytes on the wire; the session must be reconnected before
//! it is used again.

mod cancel;
mod progress;
mod frame;

pub use cancel::CancelToken;
pub use progress::{ChannelProgress, NoProgress, Progress, ProgressSink};
pub use frame::{
    checked_frame_len, copy_frame, read_frame, read_frame_len, write_chunked,
    DEFAULT_CHUNK_SIZE, LENGTH_PREFIX_SIZE,
};
