//! Fixed-size values and their big-endian wire form
//!
//! The target is big-endian PowerPC; every value crosses the wire as a
//! byte-reversed copy of its little-endian host representation.

/// A plain value that can be read from or written to target memory
pub trait WireValue: Copy + Default {
    /// Size in bytes on the target
    const SIZE: usize;

    /// Decode from target byte order; `bytes` holds at least `SIZE` bytes
    fn from_wire(bytes: &[u8]) -> Self;

    /// Encode into target byte order
    fn to_wire(self) -> Vec<u8>;
}

macro_rules! impl_wire_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl WireValue for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn from_wire(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$t>::from_be_bytes(raw)
                }

                fn to_wire(self) -> Vec<u8> {
                    self.to_be_bytes().to_vec()
                }
            }
        )*
    };
}

impl_wire_value!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, f32, f64);

/// Four single-precision lanes, as held in a VMX register
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl WireValue for Vector4 {
    const SIZE: usize = 16;

    /// The whole 16 bytes are reversed, so lanes arrive as `w z y x`,
    /// each big-endian
    fn from_wire(bytes: &[u8]) -> Self {
        let lane = |i: usize| f32::from_wire(&bytes[i * 4..]);
        Self {
            w: lane(0),
            z: lane(1),
            y: lane(2),
            x: lane(3),
        }
    }

    fn to_wire(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        for lane in [self.w, self.z, self.y, self.x] {
            bytes.extend_from_slice(&lane.to_be_bytes());
        }
        bytes
    }
}
