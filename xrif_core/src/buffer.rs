use std::fmt;

/// Purpose of a buffer within the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Raw,
    Reordered,
    Compressed,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Raw, Role::Reordered, Role::Compressed];

    pub fn name(self) -> &'static str {
        match self {
            Role::Raw => "raw",
            Role::Reordered => "reordered",
            Role::Compressed => "compressed",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a binding's bytes live.
///
/// `Owned` memory was allocated by the handle and is released whenever the
/// binding is replaced or the handle is dropped. `Borrowed` memory belongs to
/// the caller and is never released here.
#[derive(Debug, Default)]
pub enum Storage<'a> {
    #[default]
    Unbound,
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

/// One role's buffer: storage plus the capacity recorded at bind time.
#[derive(Debug, Default)]
pub struct BufferBinding<'a> {
    storage: Storage<'a>,
    size: usize,
}

impl<'a> BufferBinding<'a> {
    pub(crate) fn borrowed(buffer: Option<&'a mut [u8]>, size: usize) -> Self {
        let storage = match buffer {
            Some(buf) => Storage::Borrowed(buf),
            None => Storage::Unbound,
        };
        Self { storage, size }
    }

    pub(crate) fn owned(buf: Vec<u8>) -> Self {
        let size = buf.len();
        Self {
            storage: Storage::Owned(buf),
            size,
        }
    }

    /// Capacity in bytes recorded when the buffer was bound.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        !matches!(self.storage, Storage::Unbound)
    }

    /// True when the handle allocated this buffer and will release it.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    pub fn storage(&self) -> &Storage<'a> {
        &self.storage
    }

    /// Address of the first byte, or null when unbound.
    pub fn as_ptr(&self) -> *const u8 {
        match &self.storage {
            Storage::Unbound => std::ptr::null(),
            Storage::Owned(v) => v.as_ptr(),
            Storage::Borrowed(b) => b.as_ptr(),
        }
    }

    /// The first `size()` bytes, or `None` when unbound.
    pub fn as_slice(&self) -> Option<&[u8]> {
        match &self.storage {
            Storage::Unbound => None,
            Storage::Owned(v) => Some(&v[..self.size]),
            Storage::Borrowed(b) => Some(&b[..self.size]),
        }
    }

    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match &mut self.storage {
            Storage::Unbound => None,
            Storage::Owned(v) => Some(&mut v[..self.size]),
            Storage::Borrowed(b) => Some(&mut b[..self.size]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbound() {
        let b = BufferBinding::default();
        assert!(!b.is_bound());
        assert!(!b.is_owned());
        assert_eq!(b.size(), 0);
        assert!(b.as_ptr().is_null());
        assert!(b.as_slice().is_none());
    }

    #[test]
    fn test_borrowed_slice_is_truncated_to_size() {
        let mut backing = [7u8; 32];
        let mut b = BufferBinding::borrowed(Some(&mut backing[..]), 16);
        assert!(b.is_bound());
        assert!(!b.is_owned());
        assert_eq!(b.as_slice().unwrap().len(), 16);
        b.as_mut_slice().unwrap()[0] = 1;
        drop(b);
        assert_eq!(backing[0], 1);
        assert_eq!(backing[31], 7);
    }

    #[test]
    fn test_owned_records_len() {
        let b = BufferBinding::owned(vec![0u8; 64]);
        assert!(b.is_owned());
        assert_eq!(b.size(), 64);
        assert!(!b.as_ptr().is_null());
    }
}
