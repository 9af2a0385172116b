mod identity;
mod lz4_codec;
mod passthrough;

pub use identity::{NoDifference, NoReorder};
pub use lz4_codec::Lz4Codec;
pub use passthrough::PassThroughCodec;

use std::sync::Arc;

use xrif_core::error::{Result, XrifError};
use xrif_core::format::{CompressMethod, DifferenceMethod, ReorderMethod};
use xrif_core::{Codec, Transform};

/// Resolve the compression stage for a header's compress method.
pub fn codec_by_id(method: CompressMethod) -> Arc<dyn Codec> {
    match method {
        CompressMethod::None => Arc::new(PassThroughCodec),
        CompressMethod::Lz4 => Arc::new(Lz4Codec),
    }
}

/// Resolve the difference stage. Only `None` is bundled; the pixel
/// differencing algorithms live outside this workspace.
pub fn difference_by_id(method: DifferenceMethod) -> Result<Arc<dyn Transform>> {
    match method {
        DifferenceMethod::None => Ok(Arc::new(NoDifference)),
        DifferenceMethod::Previous => Err(XrifError::NotImpl("difference method 'previous'")),
        DifferenceMethod::First => Err(XrifError::NotImpl("difference method 'first'")),
        DifferenceMethod::Pixel => Err(XrifError::NotImpl("difference method 'pixel'")),
    }
}

/// Resolve the reorder stage. Only `None` is bundled.
pub fn reorder_by_id(method: ReorderMethod) -> Result<Arc<dyn Transform>> {
    match method {
        ReorderMethod::None => Ok(Arc::new(NoReorder)),
        ReorderMethod::Bytepack => Err(XrifError::NotImpl("reorder method 'bytepack'")),
        ReorderMethod::BytepackRenibble => {
            Err(XrifError::NotImpl("reorder method 'bytepack-renibble'"))
        }
        ReorderMethod::Bitpack => Err(XrifError::NotImpl("reorder method 'bitpack'")),
    }
}
