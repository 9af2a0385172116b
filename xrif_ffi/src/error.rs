use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use xrif_core::error::{XrifError, XRIF_ERROR_LIBERR, XRIF_NOERROR};

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let sanitized = message.into().replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_panic_error() -> i32 {
    set_error_message("panic across FFI boundary");
    XRIF_ERROR_LIBERR
}

pub(crate) fn null_pointer(what: &'static str) -> i32 {
    report(&XrifError::NullPtr(what))
}

/// Record `err` as the thread's last error and return its code.
pub(crate) fn report(err: &XrifError) -> i32 {
    set_error_message(err.to_string());
    err.code()
}

/// Collapse a core result into a C code, recording the message on failure.
pub(crate) fn code_of(result: xrif_core::Result<()>) -> i32 {
    match result {
        Ok(()) => XRIF_NOERROR,
        Err(e) => report(&e),
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

#[cfg(test)]
mod tests {
    use xrif_core::error::XRIF_ERROR_NULLPTR;

    use super::*;

    #[test]
    fn test_null_pointer_code() {
        assert_eq!(null_pointer("handle"), XRIF_ERROR_NULLPTR);
    }

    #[test]
    fn test_interior_nul_is_sanitized() {
        set_error_message("bad\0header");
        let text = LAST_ERROR.with(|s| s.borrow().to_string_lossy().into_owned());
        assert_eq!(text, "bad?header");
        clear_error_state();
    }
}
