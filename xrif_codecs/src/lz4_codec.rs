use lz4_flex::block::{compress, compress_into, decompress_into, get_maximum_output_size};
use tracing::trace;
use xrif_core::codec::Codec;
use xrif_core::error::{Result, XrifError};
use xrif_core::format::CompressMethod;

/// LZ4 block codec.
///
/// Fastest decompression of the bundled codecs. The output is a bare LZ4
/// block without a size prefix; the cube shape in the xrif header already
/// tells the decoder how many bytes to expect.
///
/// `lz4_flex` has no acceleration knob, so the handle's `lz4_acceleration`
/// is carried in the header but does not change the output here.
///
/// `lz4_flex` only encodes in place when `dst` holds its own, looser
/// estimate (`20 + 1.1 * n`). A `dst` sized to the block-format bound
/// (`n + n / 255 + 16`) is filled through a scratch block instead.
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn method(&self) -> CompressMethod {
        CompressMethod::Lz4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress_into(&self, src: &[u8], dst: &mut [u8], acceleration: u16) -> Result<usize> {
        let written = if dst.len() >= get_maximum_output_size(src.len()) {
            compress_into(src, dst)
                .map_err(|e| XrifError::LibErr(format!("lz4 compress error: {}", e)))?
        } else {
            let block = compress(src);
            if block.len() > dst.len() {
                return Err(XrifError::InsufficientSize {
                    what: "lz4 output",
                    required: block.len(),
                    supplied: dst.len(),
                });
            }
            dst[..block.len()].copy_from_slice(&block);
            block.len()
        };
        trace!(src = src.len(), written, acceleration, "lz4 block");
        Ok(written)
    }

    fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        decompress_into(src, dst)
            .map_err(|e| XrifError::LibErr(format!("lz4 decompress error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_matches_method() {
        assert_eq!(Lz4Codec.compress_bound(4096), CompressMethod::Lz4.bound(4096));
    }

    #[test]
    fn test_compress_within_bound() {
        let src: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let mut dst = vec![0u8; Lz4Codec.compress_bound(src.len())];
        let n = Lz4Codec.compress_into(&src, &mut dst, 1).unwrap();
        assert!(n <= dst.len());

        let mut back = vec![0u8; src.len()];
        let m = Lz4Codec.decompress_into(&dst[..n], &mut back).unwrap();
        assert_eq!(m, src.len());
        assert_eq!(back, src);
    }

    /// LCG noise: no matches, so the block is almost all literals.
    fn incompressible(len: usize) -> Vec<u8> {
        let mut rng = 0x9e37_79b9_u64;
        (0..len)
            .map(|_| {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (rng >> 56) as u8
            })
            .collect()
    }

    #[test]
    fn test_incompressible_fits_block_bound() {
        let src = incompressible(1 << 20);
        let mut dst = vec![0u8; CompressMethod::Lz4.bound(src.len())];
        assert!(dst.len() < get_maximum_output_size(src.len()));

        let n = Lz4Codec.compress_into(&src, &mut dst, 1).unwrap();
        assert!(n <= dst.len());

        let mut back = vec![0u8; src.len()];
        assert_eq!(Lz4Codec.decompress_into(&dst[..n], &mut back).unwrap(), src.len());
        assert_eq!(back, src);
    }

    #[test]
    fn test_output_below_block_size_is_rejected() {
        let src = incompressible(4096);
        let mut dst = vec![0u8; 1024];
        assert!(matches!(
            Lz4Codec.compress_into(&src, &mut dst, 1),
            Err(XrifError::InsufficientSize { supplied: 1024, .. })
        ));
    }

    #[test]
    fn test_decompress_garbage_is_liberr() {
        let mut out = [0u8; 16];
        let err = Lz4Codec.decompress_into(&[0xF0, 0xFF, 0xFF], &mut out).unwrap_err();
        assert!(matches!(err, XrifError::LibErr(_)));
    }
}
