//! Session Module
//!
//! One connection to one debug monitor.
//!
//! ## Lifecycle
//! ```text
//! Disconnected ──connect──▶ Connecting ──handshake──▶ Connected
//!      ▲                                                │  ▲ │
//!      └──────────── disconnect / "bye" ────────────────┘  └─┘ reconnect
//! ```
//!
//! ## Concurrency
//! Strictly request/response: one command in flight, and any multi-line or
//! binary continuation must be consumed before the next command. `Session`
//! is a single-owner handle; wrap it in [`SharedSession`] to share it.

mod connection;
mod capabilities;
mod files;

pub use connection::Connection;
pub use capabilities::{Capabilities, DebuggerVersion};

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, XeError};
use crate::protocol::{
    parse_response, read_line, write_line, Command, ParseOptions, Response, ResultCode,
    DISCONNECT_KEYWORD,
};
use crate::transfer::{self, CancelToken, ProgressSink};

/// Command used by [`Session::ping`]
const PING_COMMAND: &str = "dbgname";

/// A session shared between threads; the lock serializes commands
pub type SharedSession = Arc<Mutex<Session>>;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Client session with one debug monitor
pub struct Session {
    /// Session configuration
    config: Config,

    /// Host the session was opened against (kept across reconnects)
    host: String,

    /// Live socket, `None` once torn down
    connection: Option<Connection>,

    state: SessionState,

    /// Flags discovered by the handshake
    capabilities: Capabilities,

    /// Most recent parsed response
    last_response: Option<Response>,

    /// Checked between lines and chunks
    cancel: CancelToken,
}

impl Session {
    /// Connect to `host` and run the handshake
    pub fn connect(host: &str, config: Config) -> Result<Self> {
        config.validate()?;

        let mut session = Self {
            config,
            host: host.to_string(),
            connection: None,
            state: SessionState::Disconnected,
            capabilities: Capabilities::default(),
            last_response: None,
            cancel: CancelToken::new(),
        };
        session.open()?;

        Ok(session)
    }

    /// Open the socket, discard the greeting and probe capabilities
    fn open(&mut self) -> Result<()> {
        self.state = SessionState::Connecting;
        self.cancel.reset();
        self.capabilities = Capabilities::default();
        self.last_response = None;

        match self.handshake() {
            Ok(()) => {
                self.state = SessionState::Connected;
                Ok(())
            }
            Err(e) => {
                self.release();
                Err(e)
            }
        }
    }

    fn handshake(&mut self) -> Result<()> {
        self.connection = Some(Connection::open(&self.host, &self.config)?);

        let greeting = self.pop()?;
        tracing::debug!("Greeting from {}: {}", self.host, greeting);

        if self.config.probe_capabilities {
            self.capabilities = Capabilities::probe(self)?;
        }
        self.last_response = None;

        Ok(())
    }

    /// Drop the socket without talking to the server
    fn release(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.shutdown();
        }
        self.state = SessionState::Disconnected;
    }

    /// Tear down the socket and repeat the connect handshake against the same
    /// host. Safe to call repeatedly; discards any unread continuation.
    pub fn reconnect(&mut self) -> Result<()> {
        tracing::warn!("Reconnecting to {}", self.host);
        self.release();
        self.open()
    }

    /// Send `bye` (best effort) and release the socket
    pub fn disconnect(&mut self) {
        if self.is_connected() {
            if let Err(e) = self.send_command(DISCONNECT_KEYWORD, false) {
                tracing::debug!("Disconnect from {} was not acknowledged: {}", self.host, e);
            }
        }
        self.release();
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Send a command line and parse the reply.
    ///
    /// Returns `Ok(None)` when the session is closed. With `strict`, a
    /// failure status is returned as [`XeError::Status`]; callers that expect
    /// routine failures pass `false`.
    pub fn send_command(&mut self, command: &str, strict: bool) -> Result<Option<Response>> {
        let Some(connection) = self.connection.as_mut() else {
            return Ok(None);
        };

        tracing::trace!(">> {}", command);
        if let Err(e) = write_line(connection.writer(), command) {
            return Err(self.on_transport_error(e));
        }

        self.get_response(strict)
    }

    /// Send a built [`Command`]
    pub fn send(&mut self, command: &Command, strict: bool) -> Result<Option<Response>> {
        self.send_command(command.as_str(), strict)
    }

    /// Send a command on a session that must be open
    pub fn execute(&mut self, command: &Command, strict: bool) -> Result<Response> {
        self.send(command, strict)?.ok_or(XeError::NotConnected)
    }

    /// Parse the next response without sending anything first
    pub fn get_response(&mut self, strict: bool) -> Result<Option<Response>> {
        let options = self.parse_options();
        let Some(connection) = self.connection.as_mut() else {
            return Ok(None);
        };

        let response = match parse_response(connection.reader(), &options, &self.cancel) {
            Ok(response) => response,
            Err(e) => return Err(self.on_transport_error(e)),
        };

        if response.is_disconnect() {
            tracing::debug!("Server at {} closed the session", self.host);
            self.release();
        }

        self.last_response = Some(response.clone());

        if strict && response.is_failure() {
            return Err(XeError::Status {
                result: response.result,
                message: response.message,
            });
        }

        Ok(Some(response))
    }

    /// Read one raw line, or an empty string on a closed session
    pub fn pop(&mut self) -> Result<String> {
        let Some(connection) = self.connection.as_mut() else {
            return Ok(String::new());
        };

        match read_line(connection.reader(), &self.cancel) {
            Ok(line) => Ok(line.unwrap_or_default()),
            Err(e) => Err(self.on_transport_error(e)),
        }
    }

    /// Issue a lightweight command under `timeout`.
    ///
    /// Never fails: any error or an elapsed deadline yields `false`.
    pub fn ping(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        let Some(connection) = self.connection.as_mut() else {
            return false;
        };
        if connection.set_timeouts(Some(timeout), Some(timeout)).is_err() {
            return false;
        }

        let outcome = self.send_command(PING_COMMAND, false);

        if let Some(connection) = self.connection.as_mut() {
            let restored =
                connection.set_timeouts(self.config.read_timeout(), self.config.write_timeout());
            if let Err(e) = restored {
                tracing::debug!("Failed to restore socket timeouts: {}", e);
            }
        }

        match outcome {
            Ok(Some(response)) => {
                response.result == ResultCode::NOERR && Instant::now() <= deadline
            }
            Ok(None) => false,
            Err(e) => {
                tracing::debug!("Ping to {} failed: {}", self.host, e);
                false
            }
        }
    }

    /// [`Session::ping`] with the configured deadline
    pub fn ping_default(&mut self) -> bool {
        let timeout = Duration::from_millis(self.config.ping_timeout_ms);
        self.ping(timeout)
    }

    // =========================================================================
    // Binary Transfers
    // =========================================================================

    /// Read a pending binary frame into memory
    pub fn read_binary<P>(&mut self, progress: &mut P) -> Result<Bytes>
    where
        P: ProgressSink + ?Sized,
    {
        let connection = self.connection.as_mut().ok_or(XeError::NotConnected)?;
        let frame = transfer::read_frame(
            connection.reader(),
            self.config.chunk_size,
            &self.cancel,
            progress,
        );
        frame
            .map(|frame| frame.freeze())
            .map_err(|e| self.on_transport_error(e))
    }

    /// Stream a pending binary frame into `sink`, returning the bytes copied
    pub fn copy_binary_to<W, P>(&mut self, sink: &mut W, progress: &mut P) -> Result<u64>
    where
        W: Write + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let connection = self.connection.as_mut().ok_or(XeError::NotConnected)?;
        let copied = transfer::copy_frame(
            connection.reader(),
            sink,
            self.config.chunk_size,
            &self.cancel,
            progress,
        );
        copied.map_err(|e| self.on_transport_error(e))
    }

    /// Write raw bytes after a command announced their length
    pub fn write_binary<P>(&mut self, data: &[u8], progress: &mut P) -> Result<()>
    where
        P: ProgressSink + ?Sized,
    {
        let connection = self.connection.as_mut().ok_or(XeError::NotConnected)?;
        let written = transfer::write_chunked(
            connection.writer(),
            data,
            self.config.chunk_size,
            &self.cancel,
            progress,
        );
        written.map_err(|e| self.on_transport_error(e))
    }

    // =========================================================================
    // Cancellation
    // =========================================================================

    /// Handle for cancelling from another thread or a progress callback
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Cancel the operation in progress
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Clear a cancellation without reconnecting
    pub fn reset_cancel(&self) {
        self.cancel.reset();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wrap in a mutex-guarded handle for multi-threaded callers
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            decoding: self.config.subcode_decoding,
            assume_success_on_invalid_status: self.config.assume_success_on_invalid_status,
            freeboot_dialect: self.capabilities.freeboot_dialect,
        }
    }

    /// A closed socket ends the session; anything else leaves it to the caller
    fn on_transport_error(&mut self, error: XeError) -> XeError {
        if matches!(error, XeError::ConnectionClosed) {
            tracing::debug!("Connection to {} lost", self.host);
            self.release();
        }
        error
    }
}
