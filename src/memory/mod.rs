//! Memory Module
//!
//! Typed access to target memory over `getmem`/`setmem`.
//!
//! ## Wire Format
//! ```text
//! getmem addr=<u32> length=<u32>
//!   202- memory data follows
//!   8200000010??????          two hex characters per byte, "??" if unreadable
//!   .
//! setmem addr=<u32> data=<HEX>
//!   200- set 4 bytes
//! ```
//!
//! Values are byte-reversed on the way in and out (see [`WireValue`]).
//! Writes are sent as a single command; data longer than the 512 byte line
//! limit allows is rejected by the server, not split here.

mod value;
mod text;
mod scan;

pub use value::{Vector4, WireValue};
pub use text::TextEncoding;
pub use scan::{exact_mask, find_pattern, find_pattern_sparse, MASK_MATCH, MASK_WILDCARD};

use crate::error::{Result, XeError};
use crate::protocol::{Command, Response};
use crate::session::Session;

/// Text the server sends for a byte it cannot read
pub const INACCESSIBLE_BYTE: &str = "??";

/// Typed view of target memory through a session
pub struct RemoteMemory<'s> {
    session: &'s mut Session,
}

impl Session {
    /// Borrow the session for memory access
    pub fn memory(&mut self) -> RemoteMemory<'_> {
        RemoteMemory { session: self }
    }
}

impl RemoteMemory<'_> {
    /// Read `length` raw bytes. Unreadable bytes are dropped from the result.
    pub fn read_bytes(&mut self, addr: u32, length: u32) -> Result<Vec<u8>> {
        let response = self.session.execute(&getmem(addr, length), true)?;
        decode_memory_dump(response.lines())
    }

    /// Read one value, or its zero value if the address is unreadable
    pub fn read<T: WireValue>(&mut self, addr: u32) -> Result<T> {
        let data = self.read_bytes(addr, T::SIZE as u32)?;
        if data.len() < T::SIZE {
            return Ok(T::default());
        }
        Ok(T::from_wire(&data))
    }

    /// Write raw bytes in one `setmem`
    pub fn write_bytes(&mut self, addr: u32, data: &[u8]) -> Result<Response> {
        let command = Command::new("setmem")
            .arg("addr", addr)
            .arg("data", hex::encode_upper(data));
        self.session.execute(&command, true)
    }

    /// Write one value in target byte order
    pub fn write<T: WireValue>(&mut self, addr: u32, value: T) -> Result<Response> {
        self.write_bytes(addr, &value.to_wire())
    }

    /// Read a zero-terminated string.
    ///
    /// Reads one unit at a time until a zero unit; there is no length bound.
    pub fn read_c_string(&mut self, addr: u32, encoding: TextEncoding) -> Result<String> {
        let mut cursor = addr;

        if encoding.unit_size() == 2 {
            let mut units = Vec::new();
            loop {
                let unit = self.read::<u16>(cursor)?;
                if unit == 0 {
                    break;
                }
                units.push(unit);
                cursor = cursor.wrapping_add(2);
            }
            return Ok(encoding.decode_units(&units));
        }

        let mut bytes = Vec::new();
        loop {
            let byte = self.read::<u8>(cursor)?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            cursor = cursor.wrapping_add(1);
        }
        Ok(encoding.decode_bytes(&bytes))
    }

    /// True when the byte at `addr` can be read
    pub fn is_accessible(&mut self, addr: u32) -> Result<bool> {
        let response = self.session.execute(&getmem(addr, 1), false)?;
        if response.is_failure() {
            return Ok(false);
        }

        Ok(match response.lines().first() {
            Some(line) => line.trim() != INACCESSIBLE_BYTE,
            None => false,
        })
    }

    /// Follow a chain of 32-bit pointers `count` times
    pub fn dereference(&mut self, addr: u32, count: usize) -> Result<u32> {
        let mut addr = addr;
        for _ in 0..count {
            addr = self.read::<u32>(addr)?;
        }
        Ok(addr)
    }

    /// Read `length` bytes keeping their positions; unreadable bytes are `None`
    pub fn read_region(&mut self, addr: u32, length: u32) -> Result<Vec<Option<u8>>> {
        let response = self.session.execute(&getmem(addr, length), true)?;
        decode_memory_map(response.lines())
    }

    /// Read `length` bytes at `base` and search them for `pattern`.
    ///
    /// Matches never span an unreadable byte.
    pub fn scan(
        &mut self,
        base: u32,
        length: u32,
        pattern: &[u8],
        mask: &str,
        first_only: bool,
    ) -> Result<Vec<u32>> {
        let region = self.read_region(base, length)?;
        find_pattern_sparse(&region, base, pattern, mask, first_only)
    }

    /// Search a region for the wire form of `value`
    pub fn scan_value<T: WireValue>(
        &mut self,
        base: u32,
        length: u32,
        value: T,
        first_only: bool,
    ) -> Result<Vec<u32>> {
        let pattern = value.to_wire();
        let mask = exact_mask(pattern.len());
        self.scan(base, length, &pattern, &mask, first_only)
    }
}

fn getmem(addr: u32, length: u32) -> Command {
    Command::new("getmem").arg("addr", addr).arg("length", length)
}

/// Decode a `getmem` body, dropping unreadable-byte placeholders
pub fn decode_memory_dump(lines: &[String]) -> Result<Vec<u8>> {
    let joined: String = lines.concat();
    let digits: String = joined
        .replace("0x", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '?')
        .collect();

    Ok(hex::decode(digits)?)
}

/// Decode a `getmem` body one byte per position, `None` where unreadable
pub fn decode_memory_map(lines: &[String]) -> Result<Vec<Option<u8>>> {
    let digits: Vec<u8> = lines
        .concat()
        .replace("0x", "")
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if digits.len() % 2 != 0 {
        return Err(XeError::Protocol(format!(
            "Memory dump has an odd number of digits: {}",
            digits.len()
        )));
    }

    digits
        .chunks_exact(2)
        .map(|pair| -> Result<Option<u8>> {
            match pair {
                [b'?', b'?'] => Ok(None),
                _ => {
                    let mut byte = [0u8; 1];
                    hex::decode_to_slice(pair, &mut byte)?;
                    Ok(Some(byte[0]))
                }
            }
        })
        .collect()
}
