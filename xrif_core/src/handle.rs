use tracing::{debug, warn};

use crate::buffer::{BufferBinding, Role};
use crate::codec::Codec;
use crate::error::{Result, XrifError};
use crate::format::{
    CompressMethod, DifferenceMethod, ReorderMethod, TypeCode, XrifHeader, COMPRESS_DEFAULT,
    DIFFERENCE_DEFAULT, HEADER_SIZE, LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MIN,
    OMP_NUMTHREADS_DEFAULT, REORDER_DEFAULT, XRIF_VERSION,
};

/// Configuration and buffer bindings for one cube.
///
/// # Lifecycle
/// 1. [`Handle::new`]: every field at its default, all roles unbound.
/// 2. [`Handle::setup`]: shape and pixel type. Nothing else changes.
/// 3. Tune the pipeline selectors directly or through the setters.
/// 4. Bind caller memory ([`set_raw`](Handle::set_raw) and friends) or let
///    the handle allocate its own ([`allocate`](Handle::allocate)).
/// 5. Run the stages; write the header next to the compressed payload.
///
/// Bindings are validated when they are made and again when a stage uses
/// them. Reconfiguring the shape does not revisit existing bindings, so
/// rebind after calling `setup` again.
///
/// Borrowed buffers carry the lifetime `'a`; the handle can never outlive
/// them. Handle-owned buffers are released when replaced, on
/// [`reset`](Handle::reset), and on drop.
#[derive(Debug)]
pub struct Handle<'a> {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub frames: u32,
    type_code: Option<TypeCode>,
    data_size: usize,
    /// Bytes produced by the last compression stage run.
    pub compressed_size: usize,
    pub difference_method: DifferenceMethod,
    pub reorder_method: ReorderMethod,
    pub compress_method: CompressMethod,
    pub lz4_acceleration: u16,
    /// Hint for the stages: run multi-threaded.
    pub omp_parallel: bool,
    pub omp_numthreads: u32,
    /// When set, the compression stage writes its output into the raw buffer
    /// instead of the compressed buffer.
    pub compress_on_raw: bool,
    raw: BufferBinding<'a>,
    reordered: BufferBinding<'a>,
    compressed: BufferBinding<'a>,
}

impl Default for Handle<'_> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            depth: 0,
            frames: 0,
            type_code: None,
            data_size: 0,
            compressed_size: 0,
            difference_method: DIFFERENCE_DEFAULT,
            reorder_method: REORDER_DEFAULT,
            compress_method: COMPRESS_DEFAULT,
            lz4_acceleration: LZ4_ACCELERATION_DEFAULT,
            omp_parallel: false,
            omp_numthreads: OMP_NUMTHREADS_DEFAULT,
            compress_on_raw: true,
            raw: BufferBinding::default(),
            reordered: BufferBinding::default(),
            compressed: BufferBinding::default(),
        }
    }
}

impl<'a> Handle<'a> {
    /// A handle with every field at its documented default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return every field to its default, releasing owned buffers.
    pub fn reset(&mut self) {
        for role in Role::ALL {
            self.install(role, BufferBinding::default());
        }
        *self = Self::default();
    }

    /// Set the cube shape and pixel type, deriving `data_size`.
    ///
    /// Pipeline selectors, tuning fields and bindings are left untouched,
    /// and no size validation happens here.
    pub fn setup(&mut self, width: u32, height: u32, depth: u32, frames: u32, type_code: TypeCode) {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self.frames = frames;
        self.set_type_code(Some(type_code));
        debug!(
            width,
            height,
            depth,
            frames,
            type_code = type_code.name(),
            "handle set up"
        );
    }

    fn set_type_code(&mut self, type_code: Option<TypeCode>) {
        self.type_code = type_code;
        self.data_size = type_code.map_or(0, TypeCode::size);
    }

    #[inline]
    pub fn type_code(&self) -> Option<TypeCode> {
        self.type_code
    }

    /// Bytes per sample, derived from the type code (0 when there is none).
    #[inline]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    // ── Sizes ──────────────────────────────────────────────────────────────

    /// Uncompressed payload length: width × height × depth × frames × data_size.
    ///
    /// Saturates instead of wrapping, so an overflowing shape can never
    /// validate a real buffer.
    pub fn raw_size(&self) -> usize {
        [self.height, self.depth, self.frames]
            .into_iter()
            .fold(self.width as usize, |acc, n| acc.saturating_mul(n as usize))
            .saturating_mul(self.data_size)
    }

    fn is_setup(&self) -> bool {
        self.raw_size() > 0
    }

    /// Worst-case compressed length for the configured compress method.
    pub fn compress_bound(&self) -> usize {
        self.compress_method.bound(self.raw_size())
    }

    /// Minimum raw buffer size. When compressing onto the raw buffer it must
    /// also hold the worst-case compressed output.
    pub fn min_raw_size(&self) -> usize {
        if self.compress_on_raw {
            self.compress_bound()
        } else {
            self.raw_size()
        }
    }

    /// Reordering is a permutation: always exactly the raw size.
    pub fn min_reordered_size(&self) -> usize {
        self.raw_size()
    }

    pub fn min_compressed_size(&self) -> usize {
        self.compress_bound()
    }

    pub fn min_size(&self, role: Role) -> usize {
        match role {
            Role::Raw => self.min_raw_size(),
            Role::Reordered => self.min_reordered_size(),
            Role::Compressed => self.min_compressed_size(),
        }
    }

    // ── Tuning ─────────────────────────────────────────────────────────────

    pub fn set_difference_method(&mut self, method: DifferenceMethod) {
        self.difference_method = method;
    }

    pub fn set_reorder_method(&mut self, method: ReorderMethod) {
        self.reorder_method = method;
    }

    pub fn set_compress_method(&mut self, method: CompressMethod) {
        self.compress_method = method;
    }

    /// Set the LZ4 acceleration, raising 0 to the minimum of 1.
    pub fn set_lz4_acceleration(&mut self, acceleration: u16) {
        self.lz4_acceleration = acceleration.max(LZ4_ACCELERATION_MIN);
    }

    pub fn set_compress_on_raw(&mut self, compress_on_raw: bool) {
        self.compress_on_raw = compress_on_raw;
    }

    pub fn set_omp_parallel(&mut self, parallel: bool) {
        self.omp_parallel = parallel;
    }

    pub fn set_omp_numthreads(&mut self, threads: u32) -> Result<()> {
        if threads == 0 {
            return Err(XrifError::BadArg("omp_numthreads must be at least 1".into()));
        }
        self.omp_numthreads = threads;
        Ok(())
    }

    // ── Bindings ───────────────────────────────────────────────────────────

    pub fn binding(&self, role: Role) -> &BufferBinding<'a> {
        match role {
            Role::Raw => &self.raw,
            Role::Reordered => &self.reordered,
            Role::Compressed => &self.compressed,
        }
    }

    /// Stage access to a binding record, e.g. to fill a buffer in place.
    pub fn binding_mut(&mut self, role: Role) -> &mut BufferBinding<'a> {
        match role {
            Role::Raw => &mut self.raw,
            Role::Reordered => &mut self.reordered,
            Role::Compressed => &mut self.compressed,
        }
    }

    pub fn buffer(&self, role: Role) -> Option<&[u8]> {
        self.binding(role).as_slice()
    }

    pub fn buffer_mut(&mut self, role: Role) -> Option<&mut [u8]> {
        self.binding_mut(role).as_mut_slice()
    }

    /// Both pre-compression buffers at once, for difference/reorder stages.
    pub fn raw_and_reordered(&mut self) -> (Option<&mut [u8]>, Option<&mut [u8]>) {
        (self.raw.as_mut_slice(), self.reordered.as_mut_slice())
    }

    /// Attach caller memory as the raw buffer.
    ///
    /// `size` is the capacity the caller vouches for and must not exceed
    /// `buffer.len()`. See [`Handle::bind`] for the validation rules.
    pub fn set_raw(&mut self, buffer: Option<&'a mut [u8]>, size: usize) -> Result<()> {
        self.bind(Role::Raw, buffer, size)
    }

    pub fn set_reordered(&mut self, buffer: Option<&'a mut [u8]>, size: usize) -> Result<()> {
        self.bind(Role::Reordered, buffer, size)
    }

    pub fn set_compressed(&mut self, buffer: Option<&'a mut [u8]>, size: usize) -> Result<()> {
        self.bind(Role::Compressed, buffer, size)
    }

    /// Attach borrowed memory to `role`.
    ///
    /// - A present buffer needs a nonzero size and a nonzero size needs a
    ///   present buffer; otherwise `InvalidSize` and the binding is untouched.
    /// - `size` larger than the buffer is also `InvalidSize`.
    /// - Otherwise the binding is recorded (releasing a previous owned
    ///   allocation) and then compared with the role's minimum. A short buffer
    ///   stays recorded for inspection but the call fails with
    ///   `InsufficientSize`, and stages will refuse it.
    pub fn bind(&mut self, role: Role, buffer: Option<&'a mut [u8]>, size: usize) -> Result<()> {
        match (&buffer, size) {
            (Some(_), 0) => {
                return Err(XrifError::InvalidSize {
                    role,
                    reason: "a buffer was supplied with size 0",
                })
            }
            (None, n) if n > 0 => {
                return Err(XrifError::InvalidSize {
                    role,
                    reason: "a nonzero size was supplied without a buffer",
                })
            }
            (Some(buf), n) if n > buf.len() => {
                return Err(XrifError::InvalidSize {
                    role,
                    reason: "size exceeds the supplied buffer",
                })
            }
            _ => {}
        }

        self.install(role, BufferBinding::borrowed(buffer, size));

        let required = self.min_size(role);
        if size < required {
            warn!(role = %role, size, required, "buffer too small for role");
            return Err(XrifError::InsufficientSize {
                what: role_label(role),
                required,
                supplied: size,
            });
        }
        debug!(role = %role, size, "bound caller buffer");
        Ok(())
    }

    /// Replace a binding, releasing the old one if the handle owned it.
    fn install(&mut self, role: Role, binding: BufferBinding<'a>) {
        let old = std::mem::replace(self.binding_mut(role), binding);
        if old.is_owned() {
            debug!(role = %role, size = old.size(), "releasing handle-owned buffer");
        }
    }

    /// Allocate a zero-filled, handle-owned raw buffer of the minimum size.
    pub fn allocate_raw(&mut self) -> Result<()> {
        self.allocate_role(Role::Raw)
    }

    pub fn allocate_reordered(&mut self) -> Result<()> {
        self.allocate_role(Role::Reordered)
    }

    pub fn allocate_compressed(&mut self) -> Result<()> {
        self.allocate_role(Role::Compressed)
    }

    /// Allocate every buffer the configured pipeline needs. The compressed
    /// buffer is skipped when compressing onto the raw buffer.
    pub fn allocate(&mut self) -> Result<()> {
        self.allocate_raw()?;
        self.allocate_reordered()?;
        if !self.compress_on_raw {
            self.allocate_compressed()?;
        }
        Ok(())
    }

    fn allocate_role(&mut self, role: Role) -> Result<()> {
        if !self.is_setup() {
            return Err(XrifError::NotSetup);
        }
        let required = self.min_size(role);

        let current = self.binding(role);
        if current.is_owned() && current.size() >= required {
            debug!(role = %role, size = current.size(), "reusing handle-owned buffer");
            return Ok(());
        }

        // Allocate before touching the old binding so a failure leaves it intact.
        let mut buf = Vec::new();
        buf.try_reserve_exact(required)
            .map_err(|_| XrifError::Malloc { role, size: required })?;
        buf.resize(required, 0);

        self.install(role, BufferBinding::owned(buf));
        debug!(role = %role, size = required, "allocated handle-owned buffer");
        Ok(())
    }

    /// Check that `role` is bound with at least its current minimum size.
    pub fn validate_use(&self, role: Role) -> Result<()> {
        if !self.is_setup() {
            return Err(XrifError::NotSetup);
        }
        let binding = self.binding(role);
        let required = self.min_size(role);
        if !binding.is_bound() || binding.size() < required {
            return Err(XrifError::InsufficientSize {
                what: role_label(role),
                required,
                supplied: binding.size(),
            });
        }
        Ok(())
    }

    /// Role the compression stage writes into.
    pub fn compression_target(&self) -> Role {
        if self.compress_on_raw {
            Role::Raw
        } else {
            Role::Compressed
        }
    }

    // ── Compression stage ──────────────────────────────────────────────────

    /// Run `codec` over the reordered buffer, writing into the compression
    /// target, and record the produced length in `compressed_size`.
    pub fn compress(&mut self, codec: &dyn Codec) -> Result<usize> {
        self.check_codec(codec)?;
        let target = self.compression_target();
        self.validate_use(Role::Reordered)?;
        self.validate_use(target)?;

        let raw_len = self.raw_size();
        let acceleration = self.lz4_acceleration;
        let src = self
            .reordered
            .as_slice()
            .ok_or(XrifError::NotSetup)?;
        let dst = match target {
            Role::Raw => self.raw.as_mut_slice(),
            _ => self.compressed.as_mut_slice(),
        }
        .ok_or(XrifError::NotSetup)?;

        let written = codec.compress_into(&src[..raw_len], dst, acceleration)?;
        self.compressed_size = written;
        debug!(
            codec = codec.name(),
            raw = raw_len,
            compressed = written,
            target = %target,
            "compressed cube"
        );
        Ok(written)
    }

    /// Inverse of [`compress`](Handle::compress): decode `compressed_size`
    /// bytes of the compression target back into the reordered buffer.
    pub fn decompress(&mut self, codec: &dyn Codec) -> Result<usize> {
        self.check_codec(codec)?;
        let target = self.compression_target();
        self.validate_use(Role::Reordered)?;

        let raw_len = self.raw_size();
        let compressed_len = self.compressed_size;
        let src_binding = match target {
            Role::Raw => &self.raw,
            _ => &self.compressed,
        };
        if compressed_len > src_binding.size() {
            return Err(XrifError::BadArg(format!(
                "compressed_size {} exceeds the {} buffer ({} bytes)",
                compressed_len,
                target,
                src_binding.size()
            )));
        }
        let src = src_binding.as_slice().ok_or(XrifError::NotSetup)?;
        let dst = self.reordered.as_mut_slice().ok_or(XrifError::NotSetup)?;

        let written = codec.decompress_into(&src[..compressed_len], &mut dst[..raw_len])?;
        if written != raw_len {
            return Err(XrifError::LibErr(format!(
                "{} decompressed to {} bytes but the cube holds {}",
                codec.name(),
                written,
                raw_len
            )));
        }
        debug!(codec = codec.name(), compressed = compressed_len, raw = written, "decompressed cube");
        Ok(written)
    }

    fn check_codec(&self, codec: &dyn Codec) -> Result<()> {
        if codec.method() != self.compress_method {
            return Err(XrifError::BadArg(format!(
                "codec mismatch: handle uses {:?} but codec {} implements {:?}",
                self.compress_method,
                codec.name(),
                codec.method()
            )));
        }
        Ok(())
    }

    // ── Header ─────────────────────────────────────────────────────────────

    /// The header describing this handle's shape and pipeline selection.
    pub fn header(&self) -> XrifHeader {
        XrifHeader {
            version: XRIF_VERSION,
            header_size: HEADER_SIZE as u32,
            width: self.width,
            height: self.height,
            depth: self.depth,
            frames: self.frames,
            type_code: self.type_code,
            difference_method: self.difference_method,
            reorder_method: self.reorder_method,
            compress_method: self.compress_method,
            lz4_acceleration: self.lz4_acceleration,
        }
    }

    /// Serialize the header into the first [`HEADER_SIZE`] bytes of `out`.
    pub fn write_header(&self, out: &mut [u8]) -> Result<()> {
        if out.len() < HEADER_SIZE {
            return Err(XrifError::InsufficientSize {
                what: "header output",
                required: HEADER_SIZE,
                supplied: out.len(),
            });
        }
        out[..HEADER_SIZE].copy_from_slice(&self.header().to_bytes());
        debug!(width = self.width, height = self.height, frames = self.frames, "wrote header");
        Ok(())
    }

    /// Parse a header and load its shape and pipeline selection.
    ///
    /// Returns the header size the record declares, which is where the
    /// payload begins. Runtime state (`compressed_size`, the omp fields,
    /// `compress_on_raw`, bindings) is not persisted and stays as it is. On
    /// error nothing is changed.
    pub fn read_header(&mut self, input: &[u8]) -> Result<u32> {
        let header = XrifHeader::from_bytes(input).inspect_err(|e| {
            warn!(error = %e, "rejected header");
        })?;
        self.apply_header(&header);
        Ok(header.header_size)
    }

    /// Load shape, type and method selection from a decoded header.
    ///
    /// An acceleration of 0 on the wire is raised to 1, as in
    /// [`set_lz4_acceleration`](Handle::set_lz4_acceleration).
    pub fn apply_header(&mut self, header: &XrifHeader) {
        self.width = header.width;
        self.height = header.height;
        self.depth = header.depth;
        self.frames = header.frames;
        self.set_type_code(header.type_code);
        self.difference_method = header.difference_method;
        self.reorder_method = header.reorder_method;
        self.compress_method = header.compress_method;
        self.set_lz4_acceleration(header.lz4_acceleration);
        debug!(
            width = header.width,
            height = header.height,
            depth = header.depth,
            frames = header.frames,
            "read header"
        );
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Raw => "raw buffer",
        Role::Reordered => "reordered buffer",
        Role::Compressed => "compressed buffer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured<'a>() -> Handle<'a> {
        let mut h = Handle::new();
        h.setup(120, 120, 3, 120, TypeCode::Int16);
        h
    }

    #[test]
    fn test_raw_size() {
        let h = configured();
        assert_eq!(h.raw_size(), 10_368_000);
        assert_eq!(Handle::new().raw_size(), 0);
    }

    #[test]
    fn test_raw_size_saturates() {
        let mut h = Handle::new();
        h.setup(u32::MAX, u32::MAX, u32::MAX, u32::MAX, TypeCode::ComplexDouble);
        assert_eq!(h.raw_size(), usize::MAX);
    }

    #[test]
    fn test_min_sizes_follow_compress_on_raw() {
        let mut h = configured();
        let raw = h.raw_size();
        let bound = CompressMethod::Lz4.bound(raw);
        assert_eq!(h.min_raw_size(), bound);
        assert_eq!(h.min_reordered_size(), raw);
        assert_eq!(h.min_compressed_size(), bound);

        h.compress_on_raw = false;
        assert_eq!(h.min_raw_size(), raw);

        h.compress_method = CompressMethod::None;
        assert_eq!(h.min_compressed_size(), raw);
    }

    #[test]
    fn test_size_exceeding_buffer_is_invalid() {
        let mut backing = vec![0u8; 16];
        let mut h = configured();
        let err = h.set_reordered(Some(&mut backing), 17).unwrap_err();
        assert!(matches!(err, XrifError::InvalidSize { role: Role::Reordered, .. }));
        assert!(!h.binding(Role::Reordered).is_bound());
    }

    #[test]
    fn test_invalid_size_keeps_previous_binding() {
        let raw_len = 120 * 120 * 3 * 120 * 2;
        let mut h = configured();
        h.allocate_reordered().unwrap();
        assert!(h.binding(Role::Reordered).is_owned());

        let err = h.set_reordered(None, 10).unwrap_err();
        assert!(matches!(err, XrifError::InvalidSize { .. }));
        assert!(h.binding(Role::Reordered).is_owned());
        assert_eq!(h.binding(Role::Reordered).size(), raw_len);
    }

    #[test]
    fn test_rebinding_owned_with_borrowed() {
        let mut backing = vec![0u8; 120 * 120 * 3 * 120 * 2];
        let len = backing.len();
        let mut h = configured();
        h.allocate_reordered().unwrap();
        h.set_reordered(Some(&mut backing), len).unwrap();
        let b = h.binding(Role::Reordered);
        assert!(!b.is_owned());
        assert_eq!(b.size(), len);
    }

    #[test]
    fn test_allocate_requires_setup() {
        let mut h = Handle::new();
        assert!(matches!(h.allocate_raw(), Err(XrifError::NotSetup)));
        assert!(matches!(h.allocate(), Err(XrifError::NotSetup)));
        assert!(!h.binding(Role::Raw).is_bound());
    }

    #[test]
    fn test_allocate_sizes_and_ownership() {
        let mut h = Handle::new();
        h.setup(16, 16, 1, 4, TypeCode::Uint16);
        h.allocate().unwrap();
        assert!(h.binding(Role::Raw).is_owned());
        assert_eq!(h.binding(Role::Raw).size(), h.min_raw_size());
        assert_eq!(h.binding(Role::Reordered).size(), h.raw_size());
        // compress_on_raw: no separate compressed buffer
        assert!(!h.binding(Role::Compressed).is_bound());

        h.compress_on_raw = false;
        h.allocate().unwrap();
        assert!(h.binding(Role::Compressed).is_owned());
        assert_eq!(h.binding(Role::Compressed).size(), h.min_compressed_size());
    }

    #[test]
    fn test_allocate_reuses_large_enough_buffer() {
        let mut h = Handle::new();
        h.setup(16, 16, 1, 4, TypeCode::Uint16);
        h.allocate_reordered().unwrap();
        let ptr = h.binding(Role::Reordered).as_ptr();

        h.setup(8, 8, 1, 4, TypeCode::Uint16);
        h.allocate_reordered().unwrap();
        assert_eq!(h.binding(Role::Reordered).as_ptr(), ptr);

        h.setup(32, 32, 1, 4, TypeCode::Uint16);
        h.allocate_reordered().unwrap();
        assert_eq!(h.binding(Role::Reordered).size(), 32 * 32 * 4 * 2);
    }

    #[test]
    fn test_validate_use_after_reconfigure() {
        let mut h = Handle::new();
        h.setup(8, 8, 1, 1, TypeCode::Uint8);
        h.allocate_reordered().unwrap();
        assert!(h.validate_use(Role::Reordered).is_ok());

        // Growing the shape does not revisit the binding, but use-time checks do.
        h.setup(16, 16, 1, 1, TypeCode::Uint8);
        assert_eq!(h.binding(Role::Reordered).size(), 64);
        assert!(matches!(
            h.validate_use(Role::Reordered),
            Err(XrifError::InsufficientSize { required: 256, supplied: 64, .. })
        ));
    }

    #[test]
    fn test_reset_returns_to_defaults() {
        let mut h = configured();
        h.compress_on_raw = false;
        h.lz4_acceleration = 9;
        h.allocate().unwrap();
        h.reset();
        assert_eq!(h.raw_size(), 0);
        assert!(h.compress_on_raw);
        assert_eq!(h.lz4_acceleration, 1);
        for role in Role::ALL {
            assert!(!h.binding(role).is_bound());
        }
    }

    #[test]
    fn test_setters() {
        let mut h = Handle::new();
        h.set_lz4_acceleration(0);
        assert_eq!(h.lz4_acceleration, 1);
        h.set_lz4_acceleration(500);
        assert_eq!(h.lz4_acceleration, 500);
        assert!(matches!(h.set_omp_numthreads(0), Err(XrifError::BadArg(_))));
        assert_eq!(h.omp_numthreads, 1);
        h.set_omp_numthreads(8).unwrap();
        h.set_omp_parallel(true);
        assert_eq!(h.omp_numthreads, 8);
        assert!(h.omp_parallel);
    }

    #[test]
    fn test_write_header_short_output() {
        let h = configured();
        let mut out = [0xFFu8; 47];
        assert!(matches!(
            h.write_header(&mut out),
            Err(XrifError::InsufficientSize { required: 48, .. })
        ));
        assert!(out.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_read_header_raises_zero_acceleration() {
        let mut buf = [0u8; HEADER_SIZE];
        configured().write_header(&mut buf).unwrap();
        buf[36..38].copy_from_slice(&0u16.to_le_bytes());

        let mut h = Handle::new();
        h.set_lz4_acceleration(9);
        h.read_header(&buf).unwrap();
        assert_eq!(h.lz4_acceleration, 1);
    }

    #[test]
    fn test_read_header_error_leaves_handle() {
        let mut h = configured();
        let mut buf = [0u8; HEADER_SIZE];
        Handle::new().write_header(&mut buf).unwrap();
        buf[3] = b'F';
        assert!(matches!(h.read_header(&buf), Err(XrifError::BadHeader(_))));
        assert_eq!(h.width, 120);
        assert_eq!(h.type_code(), Some(TypeCode::Int16));
        assert_eq!(h.data_size(), 2);
    }
}
