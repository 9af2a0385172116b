use crate::error::Result;
use crate::format::{CompressMethod, DifferenceMethod, ReorderMethod};
use crate::handle::Handle;

/// Compression stage.
///
/// Each `Codec` implementation:
/// - Is identified by the `CompressMethod` stored in the xrif header.
/// - Never writes more than `compress_bound(src.len())` bytes. The handle
///   validates its output buffers against the same bound, so a validated
///   destination is always large enough.
pub trait Codec: Send + Sync {
    fn method(&self) -> CompressMethod;

    /// Human-readable codec name for CLI display.
    fn name(&self) -> &'static str;

    /// Worst-case output length for `raw_len` input bytes.
    fn compress_bound(&self, raw_len: usize) -> usize {
        self.method().bound(raw_len)
    }

    /// Compress `src` into `dst`, returning the number of bytes written.
    ///
    /// `acceleration` is the handle's `lz4_acceleration`; codecs without a
    /// speed/ratio knob ignore it.
    fn compress_into(&self, src: &[u8], dst: &mut [u8], acceleration: u16) -> Result<usize>;

    /// Decompress `src` into `dst`, returning the number of bytes written.
    fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize>;
}

/// Which pipeline step a [`Transform`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Difference(DifferenceMethod),
    Reorder(ReorderMethod),
}

/// Difference or reorder stage operating on a handle's bound buffers.
///
/// Implementations read and write the handle's raw and reordered buffers
/// through [`Handle::raw_and_reordered`]; they never rebind them.
pub trait Transform: Send + Sync {
    fn kind(&self) -> TransformKind;

    fn forward(&self, handle: &mut Handle<'_>) -> Result<()>;

    fn inverse(&self, handle: &mut Handle<'_>) -> Result<()>;
}
