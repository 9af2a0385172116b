use xrif_core::codec::Codec;
use xrif_core::error::{Result, XrifError};
use xrif_core::format::CompressMethod;

/// No-op codec for `CompressMethod::None`: stores the cube verbatim.
///
/// Useful for verifying the pipeline independently of LZ4, and for data that
/// is already compressed.
pub struct PassThroughCodec;

impl PassThroughCodec {
    fn copy(src: &[u8], dst: &mut [u8]) -> Result<usize> {
        if dst.len() < src.len() {
            return Err(XrifError::InsufficientSize {
                what: "pass-through output",
                required: src.len(),
                supplied: dst.len(),
            });
        }
        dst[..src.len()].copy_from_slice(src);
        Ok(src.len())
    }
}

impl Codec for PassThroughCodec {
    fn method(&self) -> CompressMethod {
        CompressMethod::None
    }

    fn name(&self) -> &'static str {
        "none"
    }

    fn compress_into(&self, src: &[u8], dst: &mut [u8], _acceleration: u16) -> Result<usize> {
        Self::copy(src, dst)
    }

    fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        Self::copy(src, dst)
    }
}
