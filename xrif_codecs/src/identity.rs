use xrif_core::buffer::Role;
use xrif_core::codec::{Transform, TransformKind};
use xrif_core::error::{Result, XrifError};
use xrif_core::format::{DifferenceMethod, ReorderMethod};
use xrif_core::handle::Handle;

/// `DifferenceMethod::None`: the raw buffer is left as it is.
pub struct NoDifference;

impl Transform for NoDifference {
    fn kind(&self) -> TransformKind {
        TransformKind::Difference(DifferenceMethod::None)
    }

    fn forward(&self, handle: &mut Handle<'_>) -> Result<()> {
        handle.validate_use(Role::Raw)
    }

    fn inverse(&self, handle: &mut Handle<'_>) -> Result<()> {
        handle.validate_use(Role::Raw)
    }
}

/// `ReorderMethod::None`: a straight copy between the raw and reordered buffers.
pub struct NoReorder;

impl NoReorder {
    fn buffers<'h>(handle: &'h mut Handle<'_>) -> Result<(&'h mut [u8], &'h mut [u8], usize)> {
        handle.validate_use(Role::Raw)?;
        handle.validate_use(Role::Reordered)?;
        let len = handle.raw_size();
        match handle.raw_and_reordered() {
            (Some(raw), Some(reordered)) => Ok((raw, reordered, len)),
            _ => Err(XrifError::NotSetup),
        }
    }
}

impl Transform for NoReorder {
    fn kind(&self) -> TransformKind {
        TransformKind::Reorder(ReorderMethod::None)
    }

    fn forward(&self, handle: &mut Handle<'_>) -> Result<()> {
        let (raw, reordered, len) = Self::buffers(handle)?;
        reordered[..len].copy_from_slice(&raw[..len]);
        Ok(())
    }

    fn inverse(&self, handle: &mut Handle<'_>) -> Result<()> {
        let (raw, reordered, len) = Self::buffers(handle)?;
        raw[..len].copy_from_slice(&reordered[..len]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrif_core::format::TypeCode;

    #[test]
    fn test_no_reorder_copies_both_ways() {
        let mut h = Handle::new();
        h.setup(4, 4, 1, 2, TypeCode::Uint8);
        h.compress_on_raw = false;
        h.allocate().unwrap();

        h.buffer_mut(Role::Raw).unwrap().iter_mut().enumerate().for_each(|(i, b)| *b = i as u8);
        NoReorder.forward(&mut h).unwrap();
        assert_eq!(h.buffer(Role::Reordered).unwrap()[31], 31);

        h.buffer_mut(Role::Raw).unwrap().fill(0);
        NoReorder.inverse(&mut h).unwrap();
        assert_eq!(h.buffer(Role::Raw).unwrap()[5], 5);
    }

    #[test]
    fn test_no_reorder_requires_bindings() {
        let mut h = Handle::new();
        h.setup(4, 4, 1, 2, TypeCode::Uint8);
        assert!(matches!(
            NoReorder.forward(&mut h),
            Err(XrifError::InsufficientSize { .. })
        ));
    }
}
