//! Configuration for xedbg
//!
//! Centralized session configuration with sensible defaults.

use std::time::Duration;

use crate::error::{Result, XeError};
use crate::protocol::SubCodeDecoding;

/// Main configuration for a debug monitor session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP port the debug monitor listens on
    pub port: u16,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// Deadline for `Session::ping` (milliseconds)
    pub ping_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Transfer Configuration
    // -------------------------------------------------------------------------
    /// Bytes moved per chunk during binary transfers; cancellation and
    /// progress are observed between chunks
    pub chunk_size: usize,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// How the facility-local sub-code is recovered from a status code
    pub subcode_decoding: SubCodeDecoding,

    /// Treat lines without a numeric status as success for every command
    pub assume_success_on_invalid_status: bool,

    /// Query `whomadethis`/`dmversion` on connect
    pub probe_capabilities: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 730,
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            ping_timeout_ms: 1000,
            chunk_size: 0x1000,
            subcode_decoding: SubCodeDecoding::TwoDigit,
            assume_success_on_invalid_status: false,
            probe_capabilities: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings no session could run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(XeError::Config("chunk_size must be non-zero".to_string()));
        }
        if self.port == 0 {
            return Err(XeError::Config("port must be non-zero".to_string()));
        }
        Ok(())
    }

    pub(crate) fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub(crate) fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the ping deadline (in milliseconds)
    pub fn ping_timeout_ms(mut self, ms: u64) -> Self {
        self.config.ping_timeout_ms = ms;
        self
    }

    /// Set the binary transfer chunk size (in bytes)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the sub-code decoding mode
    pub fn subcode_decoding(mut self, mode: SubCodeDecoding) -> Self {
        self.config.subcode_decoding = mode;
        self
    }

    /// Tolerate status lines without a numeric code
    pub fn assume_success_on_invalid_status(mut self, enabled: bool) -> Self {
        self.config.assume_success_on_invalid_status = enabled;
        self
    }

    /// Enable or skip the capability handshake
    pub fn probe_capabilities(mut self, enabled: bool) -> Self {
        self.config.probe_capabilities = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
