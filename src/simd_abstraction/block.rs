//! Bounds-checked loads and stores on byte slices.
//!
//! Thin safe wrappers over the engine's pointer-based memory operations. The
//! only precondition of those operations is that 16 bytes are addressable at
//! the effective address, which is exactly what is checked here.

use super::{VectorEngine, VectorLanes};
use crate::defaults::VECTOR_BYTES;
use crate::error::{Result, VectorError};

#[inline]
fn check_window(offset: usize, len: usize) -> Result<()> {
    match offset.checked_add(VECTOR_BYTES) {
        Some(end) if end <= len => Ok(()),
        _ => Err(VectorError::BufferTooShort { offset, len }),
    }
}

/// Load `bytes[offset..offset + 16]` in native element order.
pub fn load_block<V: VectorEngine, T: VectorLanes>(bytes: &[u8], offset: usize) -> Result<T> {
    check_window(offset, bytes.len())?;
    // SAFETY: 16 bytes at `offset` are in bounds.
    Ok(unsafe { V::load(bytes.as_ptr().add(offset)) })
}

/// Load `bytes[offset..offset + 16]` as if the processor were big endian.
pub fn load_block_be<V: VectorEngine, T: VectorLanes>(bytes: &[u8], offset: usize) -> Result<T> {
    check_window(offset, bytes.len())?;
    // SAFETY: 16 bytes at `offset` are in bounds.
    Ok(unsafe { V::load_be(bytes.as_ptr().add(offset)) })
}

/// Store `v` to `bytes[offset..offset + 16]` in native element order.
pub fn store_block<V: VectorEngine, T: VectorLanes>(v: T, bytes: &mut [u8], offset: usize) -> Result<()> {
    check_window(offset, bytes.len())?;
    // SAFETY: 16 bytes at `offset` are in bounds and uniquely borrowed.
    unsafe { V::store(v, bytes.as_mut_ptr().add(offset)) };
    Ok(())
}

/// Store `v` to `bytes[offset..offset + 16]` as if the processor were big endian.
pub fn store_block_be<V: VectorEngine, T: VectorLanes>(v: T, bytes: &mut [u8], offset: usize) -> Result<()> {
    check_window(offset, bytes.len())?;
    // SAFETY: 16 bytes at `offset` are in bounds and uniquely borrowed.
    unsafe { V::store_be(v, bytes.as_mut_ptr().add(offset)) };
    Ok(())
}
