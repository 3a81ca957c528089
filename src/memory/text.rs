//! Text encodings for null-terminated strings in target memory

/// Encoding of a string read from target memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
    /// 16-bit units in target (big-endian) order
    Utf16Be,
    /// 16-bit units stored little-endian on the target
    Utf16Le,
}

impl TextEncoding {
    /// Bytes per code unit; the terminator is one zero unit
    pub fn unit_size(self) -> usize {
        match self {
            TextEncoding::Utf16Be | TextEncoding::Utf16Le => 2,
            _ => 1,
        }
    }

    /// Decode single-byte units
    pub fn decode_bytes(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Utf16Be | TextEncoding::Utf16Le => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                self.decode_units(&units)
            }
        }
    }

    /// Decode 16-bit units as read through [`WireValue`](super::WireValue)
    /// (already in host order for `Utf16Be`)
    pub fn decode_units(self, units: &[u16]) -> String {
        match self {
            TextEncoding::Utf16Le => {
                let swapped: Vec<u16> = units.iter().map(|u| u.swap_bytes()).collect();
                String::from_utf16_lossy(&swapped)
            }
            _ => String::from_utf16_lossy(units),
        }
    }
}
