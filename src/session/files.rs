//! File transfer commands
//!
//! `getfile` answers with a binary continuation; `sendfile` answers
//! READYFORBIN, takes `length` raw bytes, then sends a final status line.

use std::io::Write;

use bytes::Bytes;

use crate::error::{Result, XeError};
use crate::protocol::{Command, Response, ResultCode};
use crate::transfer::{checked_frame_len, ProgressSink};
use super::Session;

impl Session {
    /// Download a remote file into memory.
    ///
    /// Prefer [`Session::download_to`] for large files.
    pub fn download<P>(&mut self, path: &str, progress: &mut P) -> Result<Bytes>
    where
        P: ProgressSink + ?Sized,
    {
        self.open_download(path)?;
        self.read_binary(progress)
    }

    /// Stream a remote file into `sink`, returning the bytes copied
    pub fn download_to<W, P>(&mut self, path: &str, sink: &mut W, progress: &mut P) -> Result<u64>
    where
        W: Write + ?Sized,
        P: ProgressSink + ?Sized,
    {
        self.open_download(path)?;
        self.copy_binary_to(sink, progress)
    }

    /// Upload `data` to a remote file, returning the final status
    pub fn upload<P>(&mut self, path: &str, data: &[u8], progress: &mut P) -> Result<Response>
    where
        P: ProgressSink + ?Sized,
    {
        let length = checked_frame_len(data.len())?;

        let command = Command::new("sendfile")
            .quoted("name", path)
            .arg("length", length);
        let response = self.execute(&command, false)?;
        expect_result(&response, ResultCode::READYFORBIN)?;

        self.write_binary(data, progress)?;
        self.get_response(true)?.ok_or(XeError::NotConnected)
    }

    fn open_download(&mut self, path: &str) -> Result<()> {
        let command = Command::new("getfile").quoted("name", path);
        let response = self.execute(&command, false)?;
        expect_result(&response, ResultCode::BINRESPONSE)
    }
}

/// Map an unexpected reply to a status or protocol error
fn expect_result(response: &Response, expected: ResultCode) -> Result<()> {
    if response.result == expected {
        return Ok(());
    }

    if response.is_failure() {
        return Err(XeError::Status {
            result: response.result,
            message: response.message.clone(),
        });
    }

    Err(XeError::Protocol(format!(
        "Expected {:?}, server replied {} ({})",
        expected, response.status, response.message
    )))
}
