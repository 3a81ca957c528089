//! Server capability flags discovered during the connect handshake

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use super::Session;

/// `whomadethis` text identifying the freeboot build of the debug monitor
const FREEBOOT_MARKER: &str = "Natelx";

/// Facts about the server that change how responses are parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The server is the freeboot dialect: unprefixed lines and
    /// "... follows" multi-line replies without a 202 status
    pub freeboot_dialect: bool,

    /// Version reported by `dmversion`
    pub debugger_version: DebuggerVersion,
}

impl Capabilities {
    /// Query the identity and version commands.
    ///
    /// Failures are not fatal: a stock server rejects `whomadethis`.
    pub(crate) fn probe(session: &mut Session) -> Result<Self> {
        let freeboot_dialect = session
            .send_command("whomadethis", false)?
            .map(|r| r.is_success() && r.message.contains(FREEBOOT_MARKER))
            .unwrap_or(false);

        let debugger_version = session
            .send_command("dmversion", false)?
            .filter(|r| r.is_success())
            .and_then(|r| r.message.parse().ok())
            .unwrap_or_default();

        tracing::debug!(
            "Server capabilities: freeboot={}, version={}",
            freeboot_dialect,
            debugger_version
        );

        Ok(Self {
            freeboot_dialect,
            debugger_version,
        })
    }
}

/// Four part dotted version (`2.0.20353.0`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebuggerVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl FromStr for DebuggerVersion {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = [0u32; 4];
        for (slot, part) in parts.iter_mut().zip(s.trim().split('.')) {
            *slot = part.trim().parse()?;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            build: parts[2],
            revision: parts[3],
        })
    }
}

impl fmt::Display for DebuggerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}
