use serde::Serialize;

use crate::error::{Result, XrifError};

/// Magic bytes opening every xrif header.
pub const MAGIC: &[u8; 4] = b"xrif";

/// Highest header format version this build writes and reads.
pub const XRIF_VERSION: u32 = 0;

/// Fixed size of the xrif header in bytes.
///   magic[4] + version:u32 + header_size:u32 + width:u32 + height:u32
///   + depth:u32 + frames:u32 + type_code:u16 + difference:i16 + reorder:i16
///   + compress:i16 + lz4_acceleration:u16 + reserved:u16 + reserved:u64
///   = 4 + 4 + 4 + 16 + 2 + 2 + 2 + 2 + 2 + 2 + 8 = 48
pub const HEADER_SIZE: usize = 48;

// ── Handle defaults ────────────────────────────────────────────────────────

pub const DIFFERENCE_DEFAULT: DifferenceMethod = DifferenceMethod::Previous;
pub const REORDER_DEFAULT: ReorderMethod = ReorderMethod::Bytepack;
pub const COMPRESS_DEFAULT: CompressMethod = CompressMethod::Lz4;

pub const LZ4_ACCELERATION_DEFAULT: u16 = 1;
pub const LZ4_ACCELERATION_MIN: u16 = 1;
pub const OMP_NUMTHREADS_DEFAULT: u32 = 1;

// ── Pixel types ────────────────────────────────────────────────────────────

/// Element type of one sample. The discriminant is the on-wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum TypeCode {
    Uint8 = 1,
    Int8 = 2,
    Uint16 = 3,
    Int16 = 4,
    Uint32 = 5,
    Int32 = 6,
    Uint64 = 7,
    Int64 = 8,
    Float = 9,
    Double = 10,
    ComplexFloat = 11,
    ComplexDouble = 12,
    Half = 13,
}

impl TypeCode {
    pub const ALL: [TypeCode; 13] = [
        TypeCode::Uint8,
        TypeCode::Int8,
        TypeCode::Uint16,
        TypeCode::Int16,
        TypeCode::Uint32,
        TypeCode::Int32,
        TypeCode::Uint64,
        TypeCode::Int64,
        TypeCode::Float,
        TypeCode::Double,
        TypeCode::ComplexFloat,
        TypeCode::ComplexDouble,
        TypeCode::Half,
    ];

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Byte width of one sample of this type.
    pub fn size(self) -> usize {
        match self {
            TypeCode::Uint8 | TypeCode::Int8 => 1,
            TypeCode::Uint16 | TypeCode::Int16 | TypeCode::Half => 2,
            TypeCode::Uint32 | TypeCode::Int32 | TypeCode::Float => 4,
            TypeCode::Uint64 | TypeCode::Int64 | TypeCode::Double => 8,
            TypeCode::ComplexFloat => 8,
            TypeCode::ComplexDouble => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeCode::Uint8 => "uint8",
            TypeCode::Int8 => "int8",
            TypeCode::Uint16 => "uint16",
            TypeCode::Int16 => "int16",
            TypeCode::Uint32 => "uint32",
            TypeCode::Int32 => "int32",
            TypeCode::Uint64 => "uint64",
            TypeCode::Int64 => "int64",
            TypeCode::Float => "float",
            TypeCode::Double => "double",
            TypeCode::ComplexFloat => "complex-float",
            TypeCode::ComplexDouble => "complex-double",
            TypeCode::Half => "half",
        }
    }
}

/// Wire code of an optional type: 0 when the handle has none.
#[inline]
pub fn type_code_id(type_code: Option<TypeCode>) -> u16 {
    type_code.map_or(0, TypeCode::code)
}

// ── Pipeline method identifiers ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i16)]
pub enum DifferenceMethod {
    None = -1,
    Previous = 100,
    First = 200,
    Pixel = 300,
}

impl DifferenceMethod {
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            -1 => Some(Self::None),
            100 => Some(Self::Previous),
            200 => Some(Self::First),
            300 => Some(Self::Pixel),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> i16 {
        self as i16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i16)]
pub enum ReorderMethod {
    None = -1,
    Bytepack = 100,
    BytepackRenibble = 200,
    Bitpack = 300,
}

impl ReorderMethod {
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            -1 => Some(Self::None),
            100 => Some(Self::Bytepack),
            200 => Some(Self::BytepackRenibble),
            300 => Some(Self::Bitpack),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> i16 {
        self as i16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i16)]
pub enum CompressMethod {
    None = -1,
    Lz4 = 100,
}

impl CompressMethod {
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            -1 => Some(Self::None),
            100 => Some(Self::Lz4),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Worst-case output length of this method for `raw_len` input bytes.
    pub fn bound(self, raw_len: usize) -> usize {
        match self {
            CompressMethod::None => raw_len,
            CompressMethod::Lz4 => lz4_block_bound(raw_len),
        }
    }
}

/// Largest LZ4 block a `raw_len`-byte input can encode to: one length
/// extension byte per 255 literals plus a fixed overhead of 16.
#[inline]
pub const fn lz4_block_bound(raw_len: usize) -> usize {
    raw_len.saturating_add(raw_len / 255).saturating_add(16)
}

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 48-byte xrif header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XrifHeader {
    pub version: u32,
    /// Declared size of the record; larger than [`HEADER_SIZE`] when a newer
    /// writer appended fields.
    pub header_size: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub frames: u32,
    pub type_code: Option<TypeCode>,
    pub difference_method: DifferenceMethod,
    pub reorder_method: ReorderMethod,
    pub compress_method: CompressMethod,
    pub lz4_acceleration: u16,
}

impl XrifHeader {
    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&self.header_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.width.to_le_bytes());
        buf[16..20].copy_from_slice(&self.height.to_le_bytes());
        buf[20..24].copy_from_slice(&self.depth.to_le_bytes());
        buf[24..28].copy_from_slice(&self.frames.to_le_bytes());
        buf[28..30].copy_from_slice(&type_code_id(self.type_code).to_le_bytes());
        buf[30..32].copy_from_slice(&self.difference_method.id().to_le_bytes());
        buf[32..34].copy_from_slice(&self.reorder_method.id().to_le_bytes());
        buf[34..36].copy_from_slice(&self.compress_method.id().to_le_bytes());
        buf[36..38].copy_from_slice(&self.lz4_acceleration.to_le_bytes());
        // buf[38..40] and buf[40..48] are reserved and stay zero
        buf
    }

    /// Deserialize from the first `HEADER_SIZE` bytes of `buf`.
    ///
    /// Checks the magic, the declared version and header size, and that every
    /// enumerated field holds a known value. Reserved bytes are ignored.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(XrifError::InsufficientSize {
                what: "header input",
                required: HEADER_SIZE,
                supplied: buf.len(),
            });
        }
        if &buf[0..4] != MAGIC {
            return Err(XrifError::BadHeader(
                "invalid magic bytes, expected \"xrif\"".into(),
            ));
        }

        let version = le_u32(buf, 4);
        if version > XRIF_VERSION {
            return Err(XrifError::WrongVersion {
                found: version,
                supported: XRIF_VERSION,
            });
        }

        let header_size = le_u32(buf, 8);
        if (header_size as usize) < HEADER_SIZE {
            return Err(XrifError::BadHeader(format!(
                "declared header size {} is below the minimum {}",
                header_size, HEADER_SIZE
            )));
        }

        let type_id = le_u16(buf, 28);
        let type_code = match type_id {
            0 => None,
            code => Some(TypeCode::from_code(code).ok_or_else(|| {
                XrifError::BadHeader(format!("unknown type code {}", code))
            })?),
        };

        let difference_id = le_u16(buf, 30) as i16;
        let difference_method = DifferenceMethod::from_id(difference_id).ok_or_else(|| {
            XrifError::BadHeader(format!("unknown difference method {}", difference_id))
        })?;
        let reorder_id = le_u16(buf, 32) as i16;
        let reorder_method = ReorderMethod::from_id(reorder_id).ok_or_else(|| {
            XrifError::BadHeader(format!("unknown reorder method {}", reorder_id))
        })?;
        let compress_id = le_u16(buf, 34) as i16;
        let compress_method = CompressMethod::from_id(compress_id).ok_or_else(|| {
            XrifError::BadHeader(format!("unknown compress method {}", compress_id))
        })?;

        Ok(Self {
            version,
            header_size,
            width: le_u32(buf, 12),
            height: le_u32(buf, 16),
            depth: le_u32(buf, 20),
            frames: le_u32(buf, 24),
            type_code,
            difference_method,
            reorder_method,
            compress_method,
            lz4_acceleration: le_u16(buf, 36),
        })
    }
}

#[inline]
fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline]
fn le_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> XrifHeader {
        XrifHeader {
            version: XRIF_VERSION,
            header_size: HEADER_SIZE as u32,
            width: 120,
            height: 240,
            depth: 2,
            frames: 1000,
            type_code: Some(TypeCode::Int16),
            difference_method: DifferenceMethod::Pixel,
            reorder_method: ReorderMethod::None,
            compress_method: CompressMethod::Lz4,
            lz4_acceleration: 10,
        }
    }

    #[test]
    fn test_type_sizes() {
        assert_eq!(TypeCode::Uint8.size(), 1);
        assert_eq!(TypeCode::Int16.size(), 2);
        assert_eq!(TypeCode::Half.size(), 2);
        assert_eq!(TypeCode::Float.size(), 4);
        assert_eq!(TypeCode::Int64.size(), 8);
        assert_eq!(TypeCode::ComplexFloat.size(), 8);
        assert_eq!(TypeCode::ComplexDouble.size(), 16);
    }

    #[test]
    fn test_type_code_lookup() {
        for t in TypeCode::ALL {
            assert_eq!(TypeCode::from_code(t.code()), Some(t));
        }
        assert_eq!(TypeCode::from_code(0), None);
        assert_eq!(TypeCode::from_code(14), None);
    }

    #[test]
    fn test_compress_bound() {
        assert_eq!(CompressMethod::None.bound(1000), 1000);
        let raw = 120 * 120 * 3 * 120 * 2;
        assert!(CompressMethod::Lz4.bound(raw) > raw);
        assert_eq!(CompressMethod::Lz4.bound(0), 16);
    }

    #[test]
    fn test_lz4_bound_matches_block_format() {
        // n + n/255 + 16, the sizing C callers use for their buffers
        assert_eq!(CompressMethod::Lz4.bound(10_368_000), 10_408_674);
        assert_eq!(CompressMethod::Lz4.bound(255), 272);
        assert_eq!(CompressMethod::Lz4.bound(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_byte_layout() {
        let buf = sample_header().to_bytes();
        assert_eq!(&buf[0..4], b"xrif");
        assert_eq!(u32::from_le_bytes(buf[8..12].try_into().unwrap()), 48);
        assert_eq!(u32::from_le_bytes(buf[12..16].try_into().unwrap()), 120);
        assert_eq!(u32::from_le_bytes(buf[24..28].try_into().unwrap()), 1000);
        assert_eq!(u16::from_le_bytes(buf[28..30].try_into().unwrap()), 4);
        assert_eq!(u16::from_le_bytes(buf[30..32].try_into().unwrap()), 300);
        assert_eq!(i16::from_le_bytes(buf[32..34].try_into().unwrap()), -1);
        assert_eq!(u16::from_le_bytes(buf[36..38].try_into().unwrap()), 10);
        assert!(buf[38..48].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_matches_encode() {
        let header = sample_header();
        let decoded = XrifHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut buf = sample_header().to_bytes().to_vec();
        buf.extend_from_slice(&[0xAB; 16]);
        assert_eq!(XrifHeader::from_bytes(&buf).unwrap(), sample_header());
    }

    #[test]
    fn test_decode_invalid_magic() {
        let mut buf = sample_header().to_bytes();
        buf[0] = b'X';
        assert!(matches!(
            XrifHeader::from_bytes(&buf),
            Err(XrifError::BadHeader(_))
        ));
    }

    #[test]
    fn test_decode_short_input() {
        let buf = sample_header().to_bytes();
        assert!(matches!(
            XrifHeader::from_bytes(&buf[..47]),
            Err(XrifError::InsufficientSize { required: 48, supplied: 47, .. })
        ));
    }

    #[test]
    fn test_decode_newer_version() {
        let mut buf = sample_header().to_bytes();
        buf[4..8].copy_from_slice(&(XRIF_VERSION + 1).to_le_bytes());
        assert!(matches!(
            XrifHeader::from_bytes(&buf),
            Err(XrifError::WrongVersion { .. })
        ));
    }

    #[test]
    fn test_decode_undersized_header_size() {
        let mut buf = sample_header().to_bytes();
        buf[8..12].copy_from_slice(&40u32.to_le_bytes());
        assert!(matches!(
            XrifHeader::from_bytes(&buf),
            Err(XrifError::BadHeader(_))
        ));
    }

    #[test]
    fn test_decode_unknown_method() {
        let mut buf = sample_header().to_bytes();
        buf[34..36].copy_from_slice(&7i16.to_le_bytes());
        assert!(matches!(
            XrifHeader::from_bytes(&buf),
            Err(XrifError::BadHeader(_))
        ));

        let mut buf = sample_header().to_bytes();
        buf[28..30].copy_from_slice(&99u16.to_le_bytes());
        assert!(matches!(
            XrifHeader::from_bytes(&buf),
            Err(XrifError::BadHeader(_))
        ));
    }
}
