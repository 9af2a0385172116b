use std::io::Write;

use tracing::debug;

use crate::error::{Result, XrifError};
use crate::handle::Handle;

/// Write a complete xrif artifact for `handle` to `dst`.
///
/// # Layout written
/// ```text
/// [HEADER: 48 bytes]
/// [PAYLOAD: compressed_size bytes from the compression target buffer]
/// ```
///
/// Returns the total number of bytes written.
pub fn write_artifact<W: Write>(mut dst: W, handle: &Handle<'_>) -> Result<u64> {
    let target = handle.compression_target();
    let payload = handle.buffer(target).unwrap_or(&[]);
    if handle.compressed_size > payload.len() {
        return Err(XrifError::BadArg(format!(
            "compressed_size {} exceeds the {} buffer ({} bytes)",
            handle.compressed_size,
            target,
            payload.len()
        )));
    }

    let header = handle.header().to_bytes();
    dst.write_all(&header)?;
    dst.write_all(&payload[..handle.compressed_size])?;
    dst.flush()?;

    let total = (header.len() + handle.compressed_size) as u64;
    debug!(payload = handle.compressed_size, total, "wrote artifact");
    Ok(total)
}
