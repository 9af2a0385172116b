//! Control plane of the xrif lossless codec for multi-frame data cubes.
//!
//! A [`Handle`] carries one cube's shape, pixel type and pipeline selection,
//! plus three buffer bindings (raw, reordered, compressed) that are either
//! borrowed from the caller or owned by the handle. Binding validates each
//! buffer against the size its role needs, so a difference, reorder or
//! compression stage never writes past the end. The configuration round-trips
//! through a fixed 48-byte little-endian header.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod format;
pub mod handle;
pub mod reader;
pub mod writer;

pub use buffer::{BufferBinding, Role, Storage};
pub use codec::{Codec, Transform, TransformKind};
pub use error::{result_code, Result, XrifError, XRIF_NOERROR};
pub use format::{
    CompressMethod, DifferenceMethod, ReorderMethod, TypeCode, XrifHeader, HEADER_SIZE, MAGIC,
    XRIF_VERSION,
};
pub use handle::Handle;
pub use reader::read_artifact;
pub use writer::write_artifact;
