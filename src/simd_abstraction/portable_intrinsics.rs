//! Vector execution units
//!
//! A `VectorUnit` executes the handful of AltiVec/VSX instructions the engines
//! are built from. Every register operand and result is a `Vector128` holding
//! the hardware image, so the units never need to know the processor byte
//! order; only the memory instructions (which number elements) take a
//! `ByteOrder` parameter.
//!
//! Design notes
//! - `SoftUnit` is a portable model of the instructions. It is what the
//!   engines run on when no inline-assembly backend is compiled in, and it is
//!   what lets both byte orders be tested on any host.
//! - Instructions that take an immediate (`vsldoi`, `vshasigmaw`,
//!   `vshasigmad`) receive it as an ordinary parameter. Callers always pass a
//!   constant; the assembly backend turns it back into an immediate with a
//!   match table.
//! - The memory instructions have portable default bodies. A backend only
//!   overrides the ones it has a dedicated instruction for.

use std::fmt;
use std::ptr;

use super::byte_order::ByteOrder;
use super::soft_crypto;
use super::types::{LaneWidth, Vector128};

/// AltiVec/VSX register and memory instructions.
pub trait VectorUnit: Copy + Default + fmt::Debug + Send + Sync + 'static {
    const NAME: &'static str;

    /// Whether `lxv_be`/`stxv_be` map to a single big-endian instruction.
    const HAS_BE_LOAD: bool;

    /// `vperm`: byte `i` of the result is byte `c[i] & 31` of `a || b`.
    fn vperm(a: Vector128, b: Vector128, c: Vector128) -> Vector128;

    /// `vsldoi`: bytes `sh..sh + 16` of `a || b`. `sh` is in `0..16`.
    fn vsldoi(a: Vector128, b: Vector128, sh: usize) -> Vector128;

    fn vand(a: Vector128, b: Vector128) -> Vector128;

    fn vxor(a: Vector128, b: Vector128) -> Vector128;

    fn vnor(a: Vector128, b: Vector128) -> Vector128;

    /// `vaddubm`/`vadduhm`/`vadduwm`/`vaddudm`: modular lane-wise add.
    fn vaddum(width: LaneWidth, a: Vector128, b: Vector128) -> Vector128;

    /// `lvx`: load the aligned quadword containing `src + off`.
    ///
    /// # Safety
    /// The 16 bytes at `src` must be readable and `src + off` must fall in the
    /// quadword range the caller owns. Bytes of the addressed quadword outside
    /// `src..src + 16` are unspecified; the portable body reads them as zero.
    #[inline]
    unsafe fn lvx<E: ByteOrder>(off: isize, src: *const u8) -> Vector128 {
        let base = src as usize;
        let block = base.wrapping_add_signed(off) & !15;
        let mut elements = [0u8; 16];
        for (i, e) in elements.iter_mut().enumerate() {
            let delta = (block + i).wrapping_sub(base) as isize;
            if (0..16).contains(&delta) {
                *e = unsafe { *src.offset(delta) };
            }
        }
        E::from_elements(elements)
    }

    /// `stvx`: store to the aligned quadword containing `dst + off`.
    ///
    /// # Safety
    /// The 16 bytes at `dst` must be writable. Only bytes inside
    /// `dst..dst + 16` are written by the portable body.
    #[inline]
    unsafe fn stvx<E: ByteOrder>(v: Vector128, off: isize, dst: *mut u8) {
        let base = dst as usize;
        let block = base.wrapping_add_signed(off) & !15;
        let elements = E::to_elements(v);
        for (i, e) in elements.iter().enumerate() {
            let delta = (block + i).wrapping_sub(base) as isize;
            if (0..16).contains(&delta) {
                unsafe { *dst.offset(delta) = *e };
            }
        }
    }

    /// `stvebx`/`stvehx`/`stvewx`: store the `width`-byte element addressed by
    /// `dst + off`, rounded down to a multiple of `width`.
    ///
    /// # Safety
    /// The addressed element must lie inside `dst..dst + 16`, which must be
    /// writable.
    #[inline]
    unsafe fn stve<E: ByteOrder>(v: Vector128, width: usize, off: isize, dst: *mut u8) {
        debug_assert!(matches!(width, 1 | 2 | 4));
        let base = dst as usize;
        let ea = base.wrapping_add_signed(off) & !(width - 1);
        debug_assert!(
            ea >= base && ea + width <= base + 16,
            "element store at {ea:#x} leaves the window at {base:#x}"
        );
        let first = ea & 15;
        let elements = E::to_elements(v);
        for j in 0..width {
            let delta = (ea + j).wrapping_sub(base) as isize;
            if (0..16).contains(&delta) {
                unsafe { *dst.offset(delta) = elements[first + j] };
            }
        }
    }

    /// Unaligned element-order load (`lxvd2x`/`lxvw4x`, `vec_xl`).
    ///
    /// # Safety
    /// The 16 bytes at `src + off` must be readable.
    #[inline]
    unsafe fn lxv<E: ByteOrder>(off: isize, src: *const u8) -> Vector128 {
        let bytes = unsafe { ptr::read_unaligned(src.offset(off).cast::<[u8; 16]>()) };
        E::from_elements(bytes)
    }

    /// Unaligned element-order store.
    ///
    /// # Safety
    /// The 16 bytes at `dst + off` must be writable.
    #[inline]
    unsafe fn stxv<E: ByteOrder>(v: Vector128, off: isize, dst: *mut u8) {
        unsafe { ptr::write_unaligned(dst.offset(off).cast::<[u8; 16]>(), E::to_elements(v)) }
    }

    /// Unaligned load that puts the byte at the lowest address leftmost
    /// (`vec_xl_be`).
    ///
    /// # Safety
    /// The 16 bytes at `src + off` must be readable.
    #[inline]
    unsafe fn lxv_be(off: isize, src: *const u8) -> Vector128 {
        Vector128::from_be_bytes(unsafe { ptr::read_unaligned(src.offset(off).cast::<[u8; 16]>()) })
    }

    /// Inverse of `lxv_be`.
    ///
    /// # Safety
    /// The 16 bytes at `dst + off` must be writable.
    #[inline]
    unsafe fn stxv_be(v: Vector128, off: isize, dst: *mut u8) {
        unsafe { ptr::write_unaligned(dst.offset(off).cast::<[u8; 16]>(), v.to_be_bytes()) }
    }
}

/// POWER8 in-core crypto instructions.
pub trait CryptoUnit: VectorUnit {
    fn vcipher(state: Vector128, key: Vector128) -> Vector128;

    fn vcipherlast(state: Vector128, key: Vector128) -> Vector128;

    fn vncipher(state: Vector128, key: Vector128) -> Vector128;

    fn vncipherlast(state: Vector128, key: Vector128) -> Vector128;

    /// `vshasigmaw` with immediates `st` (0 or 1) and `six` (0..16).
    fn vshasigmaw(v: Vector128, st: u32, six: u32) -> Vector128;

    /// `vshasigmad` with immediates `st` (0 or 1) and `six` (0..16).
    fn vshasigmad(v: Vector128, st: u32, six: u32) -> Vector128;
}

/// Portable model of the vector unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftUnit;

#[inline]
fn zip_bytes(a: Vector128, b: Vector128, f: impl Fn(u8, u8) -> u8) -> Vector128 {
    let (a, b) = (a.to_be_bytes(), b.to_be_bytes());
    Vector128::from_be_bytes(std::array::from_fn(|i| f(a[i], b[i])))
}

macro_rules! add_lanes {
    ($a:expr, $b:expr, $ty:ty) => {{
        const W: usize = core::mem::size_of::<$ty>();
        let (a, b) = ($a.to_be_bytes(), $b.to_be_bytes());
        let mut out = [0u8; 16];
        for ((o, x), y) in out.chunks_exact_mut(W).zip(a.chunks_exact(W)).zip(b.chunks_exact(W)) {
            let mut xa = [0u8; W];
            let mut ya = [0u8; W];
            xa.copy_from_slice(x);
            ya.copy_from_slice(y);
            let sum = <$ty>::from_be_bytes(xa).wrapping_add(<$ty>::from_be_bytes(ya));
            o.copy_from_slice(&sum.to_be_bytes());
        }
        Vector128::from_be_bytes(out)
    }};
}

impl VectorUnit for SoftUnit {
    const NAME: &'static str = "portable";
    const HAS_BE_LOAD: bool = true;

    #[inline]
    fn vperm(a: Vector128, b: Vector128, c: Vector128) -> Vector128 {
        let (a, b, c) = (a.to_be_bytes(), b.to_be_bytes(), c.to_be_bytes());
        Vector128::from_be_bytes(std::array::from_fn(|i| {
            let sel = (c[i] & 31) as usize;
            if sel < 16 { a[sel] } else { b[sel - 16] }
        }))
    }

    #[inline]
    fn vsldoi(a: Vector128, b: Vector128, sh: usize) -> Vector128 {
        let sh = sh & 15;
        let (a, b) = (a.to_be_bytes(), b.to_be_bytes());
        Vector128::from_be_bytes(std::array::from_fn(|i| {
            let k = i + sh;
            if k < 16 { a[k] } else { b[k - 16] }
        }))
    }

    #[inline]
    fn vand(a: Vector128, b: Vector128) -> Vector128 {
        zip_bytes(a, b, |x, y| x & y)
    }

    #[inline]
    fn vxor(a: Vector128, b: Vector128) -> Vector128 {
        zip_bytes(a, b, |x, y| x ^ y)
    }

    #[inline]
    fn vnor(a: Vector128, b: Vector128) -> Vector128 {
        zip_bytes(a, b, |x, y| !(x | y))
    }

    #[inline]
    fn vaddum(width: LaneWidth, a: Vector128, b: Vector128) -> Vector128 {
        match width {
            LaneWidth::W8 => zip_bytes(a, b, u8::wrapping_add),
            LaneWidth::W16 => add_lanes!(a, b, u16),
            LaneWidth::W32 => add_lanes!(a, b, u32),
            LaneWidth::W64 => add_lanes!(a, b, u64),
        }
    }
}

impl CryptoUnit for SoftUnit {
    #[inline]
    fn vcipher(state: Vector128, key: Vector128) -> Vector128 {
        soft_crypto::cipher_round(state, key)
    }

    #[inline]
    fn vcipherlast(state: Vector128, key: Vector128) -> Vector128 {
        soft_crypto::cipher_last_round(state, key)
    }

    #[inline]
    fn vncipher(state: Vector128, key: Vector128) -> Vector128 {
        soft_crypto::inv_cipher_round(state, key)
    }

    #[inline]
    fn vncipherlast(state: Vector128, key: Vector128) -> Vector128 {
        soft_crypto::inv_cipher_last_round(state, key)
    }

    #[inline]
    fn vshasigmaw(v: Vector128, st: u32, six: u32) -> Vector128 {
        soft_crypto::sha256_sigma(v, st, six)
    }

    #[inline]
    fn vshasigmad(v: Vector128, st: u32, six: u32) -> Vector128 {
        soft_crypto::sha512_sigma(v, st, six)
    }
}
