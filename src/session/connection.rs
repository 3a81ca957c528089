//! Connection
//!
//! Owns the TCP socket of one session.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, XeError};

/// Buffered socket to one debug monitor
pub struct Connection {
    /// TCP stream reader (lines and binary frames share this buffer)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Open a socket to `host`.
    ///
    /// `host` may carry its own port (`192.168.1.20:730`); otherwise the
    /// configured port is used.
    pub fn open(host: &str, config: &Config) -> Result<Self> {
        let stream = connect_stream(host, config)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        let mut connection = Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        };
        connection.set_timeouts(config.read_timeout(), config.write_timeout())?;

        tracing::debug!("Connected to {}", connection.peer_addr);
        Ok(connection)
    }

    /// Configure socket timeouts (`None` blocks forever)
    pub fn set_timeouts(&mut self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(read)?;
        self.writer.get_ref().set_write_timeout(write)?;
        Ok(())
    }

    pub fn reader(&mut self) -> &mut BufReader<TcpStream> {
        &mut self.reader
    }

    pub fn writer(&mut self) -> &mut BufWriter<TcpStream> {
        &mut self.writer
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Close both directions of the socket
    pub fn shutdown(self) {
        // Peer may already be gone
        let _ = self.reader.get_ref().shutdown(Shutdown::Both);
        tracing::debug!("Connection to {} closed", self.peer_addr);
    }
}

fn connect_stream(host: &str, config: &Config) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = match host.parse::<SocketAddr>() {
        Ok(addr) => vec![addr],
        Err(_) => (host, config.port)
            .to_socket_addrs()
            .map_err(|e| XeError::Config(format!("Cannot resolve {}: {}", host, e)))?
            .collect(),
    };

    let mut last_error = None;
    for addr in addrs {
        let attempt = match config.connect_timeout() {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(match last_error {
        Some(e) => e.into(),
        None => XeError::Config(format!("No addresses found for {}", host)),
    })
}
