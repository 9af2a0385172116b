use std::io::Read;

use tracing::debug;

use crate::error::Result;
use crate::format::{XrifHeader, HEADER_SIZE};
use crate::handle::Handle;

/// Read an xrif artifact from `src`, loading its header into `handle`.
///
/// # Read sequence
/// 1. Read and parse the 48-byte header (magic, version, enumerations).
/// 2. Skip any extension bytes a newer writer declared past 48.
/// 3. Return the payload, everything up to end of stream.
///
/// `handle.compressed_size` is set to the payload length. Bindings are not
/// touched; allocate or bind before decompressing.
pub fn read_artifact<R: Read>(mut src: R, handle: &mut Handle<'_>) -> Result<Vec<u8>> {
    let mut header_buf = [0u8; HEADER_SIZE];
    src.read_exact(&mut header_buf)?;

    // Parse fully before touching `handle` so a bad stream leaves it alone.
    let header = XrifHeader::from_bytes(&header_buf)?;
    let header_size = header.header_size as usize;

    let extension = (header_size - HEADER_SIZE) as u64;
    if extension > 0 {
        let skipped = std::io::copy(&mut src.by_ref().take(extension), &mut std::io::sink())?;
        if skipped != extension {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream ended inside the header extension",
            )
            .into());
        }
    }

    let mut payload = Vec::new();
    src.read_to_end(&mut payload)?;

    handle.apply_header(&header);
    handle.compressed_size = payload.len();
    debug!(header_size, payload = payload.len(), "read artifact");
    Ok(payload)
}
