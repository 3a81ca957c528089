//! # xedbg
//!
//! Client engine for the Xbox 360 debug monitor (XBDM) protocol:
//! - Line-based commands with status-coded, multi-line and binary responses
//! - Exact status code ↔ result code translation
//! - Chunked binary transfers with progress and cancellation
//! - Typed, big-endian memory reads and writes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Callers (filesystem, debugger, CLI)              │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//! ┌──────────────▼──────────────┐   ┌────────────▼─────────────┐
//! │        RemoteMemory         │   │     Session::upload /    │
//! │   (getmem/setmem, WireValue)│   │        download          │
//! └──────────────┬──────────────┘   └────────────┬─────────────┘
//!                │                               │
//! ┌──────────────▼───────────────────────────────▼──────────────┐
//! │                         Session                             │
//! │       (connect, handshake, send_command, reconnect)         │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//!          ┌─────▼──────┐                 ┌──────▼──────┐
//!          │  Protocol  │                 │  Transfer   │
//!          │ (parser,   │                 │ (frames,    │
//!          │  status)   │                 │  progress)  │
//!          └────────────┘                 └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transfer;
pub mod session;
pub mod memory;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, XeError};
pub use config::Config;
pub use session::{Session, SharedSession};
pub use memory::RemoteMemory;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of xedbg
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
