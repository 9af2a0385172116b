//! Opaque FFI handle for [`Handle`].
//!
//! Live handles are tracked in a global registry so that null pointers,
//! double frees and pointers this library never produced are reported as
//! `XRIF_ERROR_NULLPTR` instead of causing undefined behavior.

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};

use xrif_core::Handle;

static HANDLES: LazyLock<Mutex<HashSet<usize>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// Opaque handle passed across the C boundary.
///
/// # Safety
/// - Create with `xrif_new`
/// - Free with `xrif_delete`
/// - Never dereference from C code
#[repr(C)]
pub struct XrifHandle {
    _private: [u8; 0],
}

impl XrifHandle {
    /// Box `inner` and register the resulting pointer.
    pub(crate) fn into_opaque_ptr(inner: Handle<'static>) -> *mut Self {
        let ptr = Box::into_raw(Box::new(inner)) as *mut Self;
        if let Ok(mut handles) = HANDLES.lock() {
            handles.insert(ptr as usize);
        }
        ptr
    }

    /// Unregister and reclaim the handle. `None` for null, freed or foreign pointers.
    ///
    /// # Safety
    /// If `Some` is returned the pointer is consumed and must not be used again.
    pub(crate) unsafe fn from_opaque_ptr(ptr: *mut Self) -> Option<Handle<'static>> {
        if ptr.is_null() {
            return None;
        }
        let registered = HANDLES
            .lock()
            .map(|mut handles| handles.remove(&(ptr as usize)))
            .unwrap_or(false);
        if !registered {
            return None;
        }
        // SAFETY: the pointer was registered, so it came from into_opaque_ptr
        Some(unsafe { *Box::from_raw(ptr as *mut Handle<'static>) })
    }

    pub(crate) fn is_valid(ptr: *const Self) -> bool {
        if ptr.is_null() {
            return false;
        }
        HANDLES
            .lock()
            .map(|handles| handles.contains(&(ptr as usize)))
            .unwrap_or(false)
    }

    /// # Safety
    /// The pointer must stay valid for the returned lifetime.
    pub(crate) unsafe fn as_ref<'h>(ptr: *const Self) -> Option<&'h Handle<'static>> {
        if !Self::is_valid(ptr) {
            return None;
        }
        // SAFETY: registered, so valid and aligned
        Some(unsafe { &*(ptr as *const Handle<'static>) })
    }

    /// # Safety
    /// The pointer must stay valid for the returned lifetime and no other
    /// reference to the handle may exist.
    pub(crate) unsafe fn as_mut<'h>(ptr: *mut Self) -> Option<&'h mut Handle<'static>> {
        if !Self::is_valid(ptr) {
            return None;
        }
        // SAFETY: registered, so valid, aligned and exclusively accessed per the contract
        Some(unsafe { &mut *(ptr as *mut Handle<'static>) })
    }
}
