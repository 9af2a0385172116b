//! xrif_ffi: C-ABI exports for the xrif handle and header codec.
//!
//! Every function returns an `i32` result code: `XRIF_NOERROR` (0) on
//! success, a negative `XRIF_ERROR_*` code otherwise. The message for the
//! most recent failure on the calling thread is available from
//! [`xrif_last_error`].
//!
//! Buffers passed to `xrif_set_raw` and friends are borrowed: the caller keeps
//! ownership and must keep them alive until they are rebound or the handle
//! is deleted. Buffers from `xrif_allocate*` belong to the handle.

mod error;
mod handles;

use std::os::raw::{c_char, c_int, c_void};
use std::panic::AssertUnwindSafe;
use std::slice;

use xrif_core::buffer::Role;
use xrif_core::error::{XrifError, XRIF_NOERROR};
use xrif_core::format::{
    CompressMethod, DifferenceMethod, ReorderMethod, TypeCode, HEADER_SIZE,
};
use xrif_core::Handle;

pub use handles::XrifHandle;

pub const XRIF_ROLE_RAW: c_int = 0;
pub const XRIF_ROLE_REORDERED: c_int = 1;
pub const XRIF_ROLE_COMPRESSED: c_int = 2;

/// Snapshot of a handle's fields, laid out for C.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct XrifInfo {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub frames: u32,
    pub type_code: u16,
    pub data_size: usize,
    pub compressed_size: usize,
    pub difference_method: i16,
    pub reorder_method: i16,
    pub compress_method: i16,
    pub lz4_acceleration: u16,
    pub omp_parallel: c_int,
    pub omp_numthreads: u32,
    pub compress_on_raw: c_int,
    pub raw_buffer: *const u8,
    pub raw_buffer_size: usize,
    pub own_raw: c_int,
    pub reordered_buffer: *const u8,
    pub reordered_buffer_size: usize,
    pub own_reordered: c_int,
    pub compressed_buffer: *const u8,
    pub compressed_buffer_size: usize,
    pub own_compressed: c_int,
}

impl XrifInfo {
    fn of(handle: &Handle<'_>) -> Self {
        let raw = handle.binding(Role::Raw);
        let reordered = handle.binding(Role::Reordered);
        let compressed = handle.binding(Role::Compressed);
        Self {
            width: handle.width,
            height: handle.height,
            depth: handle.depth,
            frames: handle.frames,
            type_code: handle.type_code().map_or(0, TypeCode::code),
            data_size: handle.data_size(),
            compressed_size: handle.compressed_size,
            difference_method: handle.difference_method.id(),
            reorder_method: handle.reorder_method.id(),
            compress_method: handle.compress_method.id(),
            lz4_acceleration: handle.lz4_acceleration,
            omp_parallel: handle.omp_parallel as c_int,
            omp_numthreads: handle.omp_numthreads,
            compress_on_raw: handle.compress_on_raw as c_int,
            raw_buffer: raw.as_ptr(),
            raw_buffer_size: raw.size(),
            own_raw: raw.is_owned() as c_int,
            reordered_buffer: reordered.as_ptr(),
            reordered_buffer_size: reordered.size(),
            own_reordered: reordered.is_owned() as c_int,
            compressed_buffer: compressed.as_ptr(),
            compressed_buffer_size: compressed.size(),
            own_compressed: compressed.is_owned() as c_int,
        }
    }
}

fn ffi_boundary(f: impl FnOnce() -> c_int) -> c_int {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(code) => code,
        Err(_) => error::set_panic_error(),
    }
}

fn role_from_int(role: c_int) -> Option<Role> {
    match role {
        XRIF_ROLE_RAW => Some(Role::Raw),
        XRIF_ROLE_REORDERED => Some(Role::Reordered),
        XRIF_ROLE_COMPRESSED => Some(Role::Compressed),
        _ => None,
    }
}

/// Run `f` against a live handle, or report NULLPTR.
///
/// # Safety
/// `handle` must be null, or a pointer from `xrif_new` not used concurrently.
unsafe fn with_handle(
    handle: *mut XrifHandle,
    f: impl FnOnce(&mut Handle<'static>) -> c_int,
) -> c_int {
    ffi_boundary(|| {
        // SAFETY: validity is checked against the registry; exclusivity is the caller's contract
        match unsafe { XrifHandle::as_mut(handle) } {
            Some(h) => f(h),
            None => error::null_pointer("handle"),
        }
    })
}

/// Read-only variant of [`with_handle`].
///
/// # Safety
/// `handle` must be null, or a pointer from `xrif_new` not mutated concurrently.
unsafe fn with_handle_ref(
    handle: *const XrifHandle,
    f: impl FnOnce(&Handle<'static>) -> c_int,
) -> c_int {
    ffi_boundary(|| {
        // SAFETY: validity is checked against the registry
        match unsafe { XrifHandle::as_ref(handle) } {
            Some(h) => f(h),
            None => error::null_pointer("handle"),
        }
    })
}

// ── Lifecycle ──────────────────────────────────────────────────────────────

/// Create a handle with every field at its default and store it in `*out`.
///
/// # Safety
/// `out` must be null or point to writable storage for one pointer.
#[no_mangle]
pub unsafe extern "C" fn xrif_new(out: *mut *mut XrifHandle) -> c_int {
    ffi_boundary(|| {
        if out.is_null() {
            return error::null_pointer("output handle pointer");
        }
        error::clear_error_state();
        let ptr = XrifHandle::into_opaque_ptr(Handle::new());
        tracing::debug!(handle = ?ptr, "created xrif handle");
        // SAFETY: checked non-null above
        unsafe { *out = ptr };
        XRIF_NOERROR
    })
}

/// Release a handle. Handle-owned buffers are freed; borrowed ones are not.
///
/// # Safety
/// `handle` must be null or come from `xrif_new`, and must not be used again.
#[no_mangle]
pub unsafe extern "C" fn xrif_delete(handle: *mut XrifHandle) -> c_int {
    ffi_boundary(|| {
        // SAFETY: from_opaque_ptr rejects null and unregistered pointers
        match unsafe { XrifHandle::from_opaque_ptr(handle) } {
            Some(inner) => {
                tracing::debug!(handle = ?handle, "deleting xrif handle");
                drop(inner);
                XRIF_NOERROR
            }
            None => error::null_pointer("handle"),
        }
    })
}

/// Return every field to its default, releasing handle-owned buffers.
///
/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_initialize_handle(handle: *mut XrifHandle) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| {
            h.reset();
            XRIF_NOERROR
        })
    }
}

/// Set shape and pixel type. An unknown `type_code` is `XRIF_ERROR_INVALID_TYPE`.
///
/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_setup(
    handle: *mut XrifHandle,
    width: u32,
    height: u32,
    depth: u32,
    frames: u32,
    type_code: u16,
) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| match TypeCode::from_code(type_code) {
            Some(t) => {
                h.setup(width, height, depth, frames, t);
                XRIF_NOERROR
            }
            None => error::report(&XrifError::InvalidType(type_code)),
        })
    }
}

// ── Buffer binding ─────────────────────────────────────────────────────────

/// Another role whose binding shares bytes with `[start, start + len)`.
fn overlapping_role(handle: &Handle<'_>, role: Role, start: usize, len: usize) -> Option<Role> {
    Role::ALL.into_iter().filter(|&r| r != role).find(|&r| {
        let other = handle.binding(r);
        let other_start = other.as_ptr() as usize;
        other.is_bound()
            && len > 0
            && other.size() > 0
            && start < other_start.saturating_add(other.size())
            && other_start < start.saturating_add(len)
    })
}

/// # Safety
/// A non-null `buffer` must point to `size` writable bytes that outlive the
/// binding.
unsafe fn bind(handle: *mut XrifHandle, role: Role, buffer: *mut c_void, size: usize) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| {
            // Refuse before a second `&mut` over the same bytes exists.
            if let Some(other) = overlapping_role(h, role, buffer as usize, size) {
                return error::report(&XrifError::BadArg(format!(
                    "{} buffer overlaps the bound {} buffer",
                    role, other
                )));
            }
            let borrowed: Option<&'static mut [u8]> = if buffer.is_null() {
                None
            } else {
                // SAFETY: the caller vouches for `size` bytes at `buffer`, and
                // no other role's binding covers them
                Some(slice::from_raw_parts_mut(buffer as *mut u8, size))
            };
            error::code_of(h.bind(role, borrowed, size))
        })
    }
}

/// Bind caller memory as the raw buffer.
///
/// # Safety
/// A non-null `buffer` must point to `size` writable bytes that stay valid
/// until the role is rebound or the handle is deleted. Each role needs its
/// own distinct, non-overlapping memory: a buffer overlapping another role's
/// binding is refused with `XRIF_ERROR_BADARG`, and the caller must not
/// access the bytes while a stage runs on the handle.
#[no_mangle]
pub unsafe extern "C" fn xrif_set_raw(
    handle: *mut XrifHandle,
    buffer: *mut c_void,
    size: usize,
) -> c_int {
    // SAFETY: forwarded contract
    unsafe { bind(handle, Role::Raw, buffer, size) }
}

/// Bind caller memory as the reordered buffer.
///
/// # Safety
/// Same contract as [`xrif_set_raw`].
#[no_mangle]
pub unsafe extern "C" fn xrif_set_reordered(
    handle: *mut XrifHandle,
    buffer: *mut c_void,
    size: usize,
) -> c_int {
    // SAFETY: forwarded contract
    unsafe { bind(handle, Role::Reordered, buffer, size) }
}

/// Bind caller memory as the compressed buffer.
///
/// # Safety
/// Same contract as [`xrif_set_raw`].
#[no_mangle]
pub unsafe extern "C" fn xrif_set_compressed(
    handle: *mut XrifHandle,
    buffer: *mut c_void,
    size: usize,
) -> c_int {
    // SAFETY: forwarded contract
    unsafe { bind(handle, Role::Compressed, buffer, size) }
}

/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_allocate_raw(handle: *mut XrifHandle) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe { with_handle(handle, |h| error::code_of(h.allocate_raw())) }
}

/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_allocate_reordered(handle: *mut XrifHandle) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe { with_handle(handle, |h| error::code_of(h.allocate_reordered())) }
}

/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_allocate_compressed(handle: *mut XrifHandle) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe { with_handle(handle, |h| error::code_of(h.allocate_compressed())) }
}

/// Allocate every buffer the configured pipeline needs.
///
/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_allocate(handle: *mut XrifHandle) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe { with_handle(handle, |h| error::code_of(h.allocate())) }
}

/// Write the minimum size of `role` (one of `XRIF_ROLE_*`) to `*out`.
///
/// # Safety
/// `out` must be null or point to a writable `usize`.
#[no_mangle]
pub unsafe extern "C" fn xrif_min_size(
    handle: *mut XrifHandle,
    role: c_int,
    out: *mut usize,
) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle_ref(handle, |h| {
            if out.is_null() {
                return error::null_pointer("output size");
            }
            let Some(role) = role_from_int(role) else {
                return error::report(&XrifError::BadArg(format!("unknown role {}", role)));
            };
            // SAFETY: checked non-null above
            *out = h.min_size(role);
            XRIF_NOERROR
        })
    }
}

// ── Tuning ─────────────────────────────────────────────────────────────────

/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_set_compress_on_raw(handle: *mut XrifHandle, on: c_int) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| {
            h.set_compress_on_raw(on != 0);
            XRIF_NOERROR
        })
    }
}

/// Set the LZ4 acceleration; values below 1 are raised to 1, values above
/// `u16::MAX` are clamped.
///
/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_set_lz4_acceleration(
    handle: *mut XrifHandle,
    acceleration: c_int,
) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| {
            h.set_lz4_acceleration(acceleration.clamp(0, u16::MAX as c_int) as u16);
            XRIF_NOERROR
        })
    }
}

/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_set_omp(
    handle: *mut XrifHandle,
    parallel: c_int,
    numthreads: u32,
) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| {
            if let Err(e) = h.set_omp_numthreads(numthreads) {
                return error::report(&e);
            }
            h.set_omp_parallel(parallel != 0);
            XRIF_NOERROR
        })
    }
}

/// Select the difference, reorder and compress methods by wire id.
/// Unknown ids are `XRIF_ERROR_BADARG` and leave every method unchanged.
///
/// # Safety
/// See [`xrif_delete`] for the pointer contract.
#[no_mangle]
pub unsafe extern "C" fn xrif_set_methods(
    handle: *mut XrifHandle,
    difference: i16,
    reorder: i16,
    compress: i16,
) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| {
            let parsed = (
                DifferenceMethod::from_id(difference),
                ReorderMethod::from_id(reorder),
                CompressMethod::from_id(compress),
            );
            let (Some(d), Some(r), Some(c)) = parsed else {
                return error::report(&XrifError::BadArg(format!(
                    "unknown method ids (difference {}, reorder {}, compress {})",
                    difference, reorder, compress
                )));
            };
            h.set_difference_method(d);
            h.set_reorder_method(r);
            h.set_compress_method(c);
            XRIF_NOERROR
        })
    }
}

/// Copy the handle's fields into `*out`.
///
/// # Safety
/// `out` must be null or point to a writable `XrifInfo`.
#[no_mangle]
pub unsafe extern "C" fn xrif_get_info(handle: *mut XrifHandle, out: *mut XrifInfo) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle_ref(handle, |h| {
            if out.is_null() {
                return error::null_pointer("output info");
            }
            // SAFETY: checked non-null above
            *out = XrifInfo::of(h);
            XRIF_NOERROR
        })
    }
}

// ── Header ─────────────────────────────────────────────────────────────────

/// Serialize the handle's header into `header`, which must hold
/// `XRIF_HEADER_SIZE` (48) bytes.
///
/// # Safety
/// `header` must be null or point to 48 writable bytes.
#[no_mangle]
pub unsafe extern "C" fn xrif_write_header(header: *mut c_char, handle: *mut XrifHandle) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle_ref(handle, |h| {
            if header.is_null() {
                return error::null_pointer("header buffer");
            }
            // SAFETY: the caller vouches for HEADER_SIZE writable bytes
            let out = slice::from_raw_parts_mut(header as *mut u8, HEADER_SIZE);
            error::code_of(h.write_header(out))
        })
    }
}

/// Parse a 48-byte header into the handle and write its declared header size
/// to `*header_size`.
///
/// # Safety
/// `header` must be null or point to 48 readable bytes; `header_size` must be
/// null or point to a writable `u32`.
#[no_mangle]
pub unsafe extern "C" fn xrif_read_header(
    handle: *mut XrifHandle,
    header_size: *mut u32,
    header: *const c_char,
) -> c_int {
    // SAFETY: forwarded pointer contract
    unsafe {
        with_handle(handle, |h| {
            if header_size.is_null() {
                return error::null_pointer("header size output");
            }
            if header.is_null() {
                return error::null_pointer("header buffer");
            }
            // SAFETY: the caller vouches for HEADER_SIZE readable bytes
            let input = slice::from_raw_parts(header as *const u8, HEADER_SIZE);
            match h.read_header(input) {
                Ok(size) => {
                    // SAFETY: checked non-null above
                    *header_size = size;
                    XRIF_NOERROR
                }
                Err(e) => error::report(&e),
            }
        })
    }
}

/// Message for the last failed call on this thread (empty when none).
/// The pointer stays valid until the next call on the same thread.
#[no_mangle]
pub extern "C" fn xrif_last_error() -> *const c_char {
    match std::panic::catch_unwind(error::last_error_ptr) {
        Ok(ptr) => ptr,
        Err(_) => std::ptr::null(),
    }
}
