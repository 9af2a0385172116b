use crate::buffer::Role;

/// Success sentinel for integer result codes. Compares equal to zero.
pub const XRIF_NOERROR: i32 = 0;

pub const XRIF_ERROR_NULLPTR: i32 = -5;
pub const XRIF_ERROR_NOT_SETUP: i32 = -10;
pub const XRIF_ERROR_INVALID_SIZE: i32 = -20;
pub const XRIF_ERROR_INVALID_TYPE: i32 = -22;
pub const XRIF_ERROR_INSUFFICIENT_SIZE: i32 = -25;
pub const XRIF_ERROR_MALLOC: i32 = -30;
pub const XRIF_ERROR_NOTIMPL: i32 = -100;
pub const XRIF_ERROR_BADARG: i32 = -110;
pub const XRIF_ERROR_BADHEADER: i32 = -1000;
pub const XRIF_ERROR_WRONGVERSION: i32 = -1010;
pub const XRIF_ERROR_LIBERR: i32 = -10000;

/// Errors returned by every xrif operation.
///
/// The set is closed: each variant maps to exactly one stable integer code
/// (see [`XrifError::code`]), which is what crosses the C boundary.
#[derive(Debug, thiserror::Error)]
pub enum XrifError {
    /// A required handle, header buffer, or output argument was absent.
    #[error("null pointer: {0} is required")]
    NullPtr(&'static str),

    /// The handle has no shape/type yet, so sizes cannot be derived.
    #[error("handle is not set up (call setup with a nonzero shape and a type first)")]
    NotSetup,

    /// A buffer and its size disagree about presence, or the size overstates the buffer.
    #[error("invalid size for {role} buffer: {reason}")]
    InvalidSize { role: Role, reason: &'static str },

    /// A type code outside the known set.
    #[error("invalid type code {0}")]
    InvalidType(u16),

    /// A supplied size is below the currently required minimum.
    #[error("insufficient size for {what}: {supplied} bytes supplied, {required} required")]
    InsufficientSize {
        what: &'static str,
        required: usize,
        supplied: usize,
    },

    /// Allocating a handle-owned buffer failed.
    #[error("failed to allocate {size} bytes for {role} buffer")]
    Malloc { role: Role, size: usize },

    /// The requested method has no implementation in this build.
    #[error("not implemented: {0}")]
    NotImpl(&'static str),

    /// An argument is out of its accepted range.
    #[error("bad argument: {0}")]
    BadArg(String),

    /// The record is not an xrif header.
    #[error("bad header: {0}")]
    BadHeader(String),

    /// The record declares a format version this build does not understand.
    #[error("unsupported header version {found} (this build reads up to {supported})")]
    WrongVersion { found: u32, supported: u32 },

    /// A collaborator (codec, I/O) failed.
    #[error("library error: {0}")]
    LibErr(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl XrifError {
    /// Stable integer code for this error.
    pub fn code(&self) -> i32 {
        match self {
            XrifError::NullPtr(_) => XRIF_ERROR_NULLPTR,
            XrifError::NotSetup => XRIF_ERROR_NOT_SETUP,
            XrifError::InvalidSize { .. } => XRIF_ERROR_INVALID_SIZE,
            XrifError::InvalidType(_) => XRIF_ERROR_INVALID_TYPE,
            XrifError::InsufficientSize { .. } => XRIF_ERROR_INSUFFICIENT_SIZE,
            XrifError::Malloc { .. } => XRIF_ERROR_MALLOC,
            XrifError::NotImpl(_) => XRIF_ERROR_NOTIMPL,
            XrifError::BadArg(_) => XRIF_ERROR_BADARG,
            XrifError::BadHeader(_) => XRIF_ERROR_BADHEADER,
            XrifError::WrongVersion { .. } => XRIF_ERROR_WRONGVERSION,
            XrifError::LibErr(_) | XrifError::Io(_) => XRIF_ERROR_LIBERR,
        }
    }
}

/// Collapse a `Result` into its integer code (`XRIF_NOERROR` on success).
pub fn result_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => XRIF_NOERROR,
        Err(e) => e.code(),
    }
}

pub type Result<T> = std::result::Result<T, XrifError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noerror_is_zero() {
        assert_eq!(XRIF_NOERROR, 0);
        assert_eq!(result_code(&Ok::<(), XrifError>(())), 0);
    }

    #[test]
    fn test_codes_are_distinct_and_negative() {
        let errors = [
            XrifError::NullPtr("handle"),
            XrifError::NotSetup,
            XrifError::InvalidSize {
                role: Role::Raw,
                reason: "size is zero",
            },
            XrifError::InvalidType(99),
            XrifError::InsufficientSize {
                what: "raw buffer",
                required: 10,
                supplied: 5,
            },
            XrifError::Malloc {
                role: Role::Compressed,
                size: 1,
            },
            XrifError::NotImpl("bitpack"),
            XrifError::BadArg("numthreads".into()),
            XrifError::BadHeader("magic".into()),
            XrifError::WrongVersion {
                found: 9,
                supported: 0,
            },
            XrifError::LibErr("lz4".into()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        assert!(codes.iter().all(|&c| c < 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_io_maps_to_liberr() {
        let err: XrifError = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof").into();
        assert_eq!(err.code(), XRIF_ERROR_LIBERR);
    }

    #[test]
    fn test_display_mentions_sizes() {
        let err = XrifError::InsufficientSize {
            what: "compressed buffer",
            required: 2048,
            supplied: 1024,
        };
        let text = err.to_string();
        assert!(text.contains("2048") && text.contains("1024"), "got: {text}");
    }
}
