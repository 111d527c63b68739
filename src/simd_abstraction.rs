//! Endian-normalized 128-bit vector layer for POWER.
//!
//! This module gives one set of vector primitives that behaves the same on
//! big-endian and little-endian POWER processors, on top of three capability
//! tiers of the vector unit.
//!
//! ## Engine Architecture
//!
//! The `VectorEngine` trait is implemented by one engine per tier:
//! - `Altivec`: baseline AltiVec. Only aligned quadword loads/stores exist, so
//!   unaligned accesses are synthesized from aligned ones.
//! - `Power7`: VSX unaligned loads/stores.
//! - `Power8`: POWER8 in-core crypto. The only engine implementing
//!   `CryptoEngine`, so AES and SHA primitives do not exist on lower tiers.
//!
//! Every engine is generic over the processor `ByteOrder` and over the
//! `VectorUnit` that executes the instructions. `DefaultEngine` is the highest
//! tier enabled at build time, in native byte order, on the default unit.
//!
//! ## Byte-order normalization
//!
//! Mask indices and lane values are always in element order. The only places
//! that correct for little endian are `permute_pair` (which swaps operands and
//! complements the selectors) and the private concatenation window behind the
//! shift family. Everything else is built on those two.

use std::marker::PhantomData;

use crate::capability::Tier;
use crate::defaults::VECTOR_ALIGNMENT;
use crate::utils::is_aligned_on;

pub mod block;
pub mod byte_order;
pub mod portable_intrinsics;
#[cfg(all(feature = "power-asm", target_arch = "powerpc64"))]
pub mod power_intrinsics;
pub(crate) mod soft_crypto;
pub mod types;


pub use byte_order::{BigEndian, ByteOrder, LittleEndian, NativeEndian};
pub use portable_intrinsics::{CryptoUnit, SoftUnit, VectorUnit};
pub use types::{LaneWidth, U8x16, U16x8, U32x4, U64x2, Vector128, VectorLanes};

/// Unit the engines run on unless another one is named.
#[cfg(all(feature = "power-asm", target_arch = "powerpc64"))]
pub type DefaultUnit = power_intrinsics::PowerUnit;

/// Unit the engines run on unless another one is named.
#[cfg(not(all(feature = "power-asm", target_arch = "powerpc64")))]
pub type DefaultUnit = SoftUnit;

/// Register whose element `i` is `15 - i`.
#[inline]
fn reverse_mask<E: ByteOrder>() -> U8x16 {
    U8x16(E::from_elements(std::array::from_fn(|i| 15 - i as u8)))
}

/// Elements `start..start + 16` of the element-order concatenation `a || b`.
#[inline]
fn concat_window<U: VectorUnit, E: ByteOrder>(a: Vector128, b: Vector128, start: usize) -> Vector128 {
    match start {
        0 => a,
        16 => b,
        // Little endian holds the concatenation reversed in hardware.
        s if E::BIG_ENDIAN => U::vsldoi(a, b, s),
        s => U::vsldoi(b, a, 16 - s),
    }
}

/// Vector primitives common to every capability tier.
///
/// All register operations are safe; loads and stores take raw pointers and
/// are `unsafe`. Operations returning "the type of `a`" accept any other view
/// for the second operand.
pub trait VectorEngine: Sized + Copy {
    /// Processor byte order the engine normalizes for.
    type Order: ByteOrder;
    /// Unit executing the instructions.
    type Unit: VectorUnit;
    /// Capability tier this engine requires.
    const TIER: Tier;

    // ===== Byte-order normalizer =====

    /// Reverse the 16 bytes of `v` (element `i` becomes element `15 - i`).
    #[inline]
    fn reverse<T: VectorLanes>(v: T) -> T {
        Self::permute(v, reverse_mask::<Self::Order>())
    }

    // ===== Permute / combine =====

    /// Element `i` of the result is element `mask[i] & 15` of `v`.
    #[inline]
    fn permute<T: VectorLanes>(v: T, mask: U8x16) -> T {
        Self::permute_pair(v, v, mask)
    }

    /// Element `i` of the result is element `mask[i] & 31` of `a || b`.
    #[inline]
    fn permute_pair<T: VectorLanes>(a: T, b: T, mask: U8x16) -> T {
        let (a, b, m) = (a.into(), b.into(), mask.0);
        let r = if Self::Order::BIG_ENDIAN {
            Self::Unit::vperm(a, b, m)
        } else {
            Self::Unit::vperm(b, a, Self::Unit::vnor(m, m))
        };
        T::from(r)
    }

    /// Bitwise AND.
    #[inline]
    fn and<T: VectorLanes>(a: T, b: impl VectorLanes) -> T {
        T::from(Self::Unit::vand(a.into(), b.into()))
    }

    /// Bitwise XOR.
    #[inline]
    fn xor<T: VectorLanes>(a: T, b: impl VectorLanes) -> T {
        T::from(Self::Unit::vxor(a.into(), b.into()))
    }

    /// Modular lane-wise add at the lane width of `T`.
    #[inline]
    fn add<T: VectorLanes>(a: T, b: impl VectorLanes) -> T {
        T::from(Self::Unit::vaddum(T::WIDTH, a.into(), b.into()))
    }

    // ===== Shifts =====

    /// Elements `C..16` of `v` followed by `C` zero bytes.
    #[inline]
    fn shift_left<const C: usize, T: VectorLanes>(v: T) -> T {
        let zero = Self::xor(v, v);
        Self::shift_left_pair::<C, T>(v, zero)
    }

    /// `C` zero bytes followed by elements `0..16 - C` of `v`.
    #[inline]
    fn shift_right<const C: usize, T: VectorLanes>(v: T) -> T {
        let zero = Self::xor(v, v);
        Self::shift_right_pair::<C, T>(zero, v)
    }

    /// Elements `C..C + 16` of `a || b`.
    #[inline]
    fn shift_left_pair<const C: usize, T: VectorLanes>(a: T, b: impl VectorLanes) -> T {
        const { assert!(C <= 16, "byte shift must be in 0..=16") };
        T::from(concat_window::<Self::Unit, Self::Order>(a.into(), b.into(), C))
    }

    /// Elements `16 - C..32 - C` of `a || b`.
    #[inline]
    fn shift_right_pair<const C: usize, T: VectorLanes>(a: T, b: impl VectorLanes) -> T {
        const { assert!(C <= 16, "byte shift must be in 0..=16") };
        T::from(concat_window::<Self::Unit, Self::Order>(a.into(), b.into(), 16 - C))
    }

    // ===== Memory =====

    /// Load 16 bytes at `src + off` in native element order.
    ///
    /// # Safety
    /// The 16 bytes at `src + off` must be readable.
    unsafe fn load_at<T: VectorLanes>(off: isize, src: *const u8) -> T;

    /// Store 16 bytes at `dst + off` in native element order.
    ///
    /// # Safety
    /// The 16 bytes at `dst + off` must be writable.
    unsafe fn store_at<T: VectorLanes>(v: T, off: isize, dst: *mut u8);

    /// Load 16 bytes at `src + off` as if the processor were big endian.
    ///
    /// # Safety
    /// The 16 bytes at `src + off` must be readable.
    #[inline]
    unsafe fn load_be_at<T: VectorLanes>(off: isize, src: *const u8) -> T {
        let v: T = unsafe { Self::load_at(off, src) };
        if Self::Order::BIG_ENDIAN { v } else { Self::reverse(v) }
    }

    /// Store 16 bytes at `dst + off` as if the processor were big endian.
    ///
    /// # Safety
    /// The 16 bytes at `dst + off` must be writable.
    #[inline]
    unsafe fn store_be_at<T: VectorLanes>(v: T, off: isize, dst: *mut u8) {
        let v = if Self::Order::BIG_ENDIAN { v } else { Self::reverse(v) };
        unsafe { Self::store_at(v, off, dst) }
    }

    /// # Safety
    /// The 16 bytes at `src` must be readable.
    #[inline]
    unsafe fn load<T: VectorLanes>(src: *const u8) -> T {
        unsafe { Self::load_at(0, src) }
    }

    /// # Safety
    /// The 16 bytes at `dst` must be writable.
    #[inline]
    unsafe fn store<T: VectorLanes>(v: T, dst: *mut u8) {
        unsafe { Self::store_at(v, 0, dst) }
    }

    /// # Safety
    /// The 16 bytes at `src` must be readable.
    #[inline]
    unsafe fn load_be<T: VectorLanes>(src: *const u8) -> T {
        unsafe { Self::load_be_at(0, src) }
    }

    /// # Safety
    /// The 16 bytes at `dst` must be writable.
    #[inline]
    unsafe fn store_be<T: VectorLanes>(v: T, dst: *mut u8) {
        unsafe { Self::store_be_at(v, 0, dst) }
    }

    // ===== Lanes =====

    /// Register holding `lanes` in element order.
    #[inline]
    fn from_u32_lanes(lanes: [u32; 4]) -> U32x4 {
        U32x4(Self::Order::from_u32_lanes(lanes))
    }

    #[inline]
    fn to_u32_lanes(v: U32x4) -> [u32; 4] {
        Self::Order::lanes_u32(v.0)
    }

    #[inline]
    fn from_u16_lanes(lanes: [u16; 8]) -> U16x8 {
        U16x8(Self::Order::from_u16_lanes(lanes))
    }

    #[inline]
    fn to_u16_lanes(v: U16x8) -> [u16; 8] {
        Self::Order::lanes_u16(v.0)
    }

    #[inline]
    fn from_u64_lanes(lanes: [u64; 2]) -> U64x2 {
        U64x2(Self::Order::from_u64_lanes(lanes))
    }

    #[inline]
    fn to_u64_lanes(v: U64x2) -> [u64; 2] {
        Self::Order::lanes_u64(v.0)
    }

    /// Register whose element `i` is `bytes[i]` (e.g. a permute mask).
    #[inline]
    fn from_u8_lanes(bytes: [u8; 16]) -> U8x16 {
        U8x16(Self::Order::from_elements(bytes))
    }

    #[inline]
    fn to_u8_lanes(v: U8x16) -> [u8; 16] {
        Self::Order::to_elements(v.0)
    }
}

/// AES round and SHA-2 sigma primitives (POWER8 and above).
///
/// All of these operate on the hardware register image. Lane numbering of the
/// SHA selectors follows the hardware (word 0 is leftmost), which on little
/// endian is the reverse of lane numbering.
pub trait CryptoEngine: VectorEngine<Unit: CryptoUnit> {
    /// One AES encryption round: SubBytes, ShiftRows, MixColumns, AddRoundKey.
    #[inline]
    fn encrypt<T: VectorLanes>(state: T, key: impl VectorLanes) -> T {
        T::from(Self::Unit::vcipher(state.into(), key.into()))
    }

    /// Final AES encryption round (no MixColumns).
    #[inline]
    fn encrypt_last<T: VectorLanes>(state: T, key: impl VectorLanes) -> T {
        T::from(Self::Unit::vcipherlast(state.into(), key.into()))
    }

    /// One AES decryption round: InvShiftRows, InvSubBytes, AddRoundKey,
    /// InvMixColumns.
    #[inline]
    fn decrypt<T: VectorLanes>(state: T, key: impl VectorLanes) -> T {
        T::from(Self::Unit::vncipher(state.into(), key.into()))
    }

    /// Final AES decryption round (no InvMixColumns).
    #[inline]
    fn decrypt_last<T: VectorLanes>(state: T, key: impl VectorLanes) -> T {
        T::from(Self::Unit::vncipherlast(state.into(), key.into()))
    }

    /// SHA-256 sigma on each 32-bit word. `FUNC` 0 picks the message-schedule
    /// σ, 1 the compression Σ; bit `3 - k` of `SUBFUNC` picks σ1/Σ1 for
    /// hardware word `k`.
    #[inline]
    fn sha256_sigma<const FUNC: u32, const SUBFUNC: u32, T: VectorLanes>(v: T) -> T {
        const { assert!(FUNC < 2 && SUBFUNC < 16, "sigma selectors out of range") };
        T::from(Self::Unit::vshasigmaw(v.into(), FUNC, SUBFUNC))
    }

    /// SHA-512 sigma on each 64-bit doubleword. Bit `3 - 2k` of `SUBFUNC`
    /// picks σ1/Σ1 for hardware doubleword `k`.
    #[inline]
    fn sha512_sigma<const FUNC: u32, const SUBFUNC: u32, T: VectorLanes>(v: T) -> T {
        const { assert!(FUNC < 2 && SUBFUNC < 16, "sigma selectors out of range") };
        T::from(Self::Unit::vshasigmad(v.into(), FUNC, SUBFUNC))
    }
}

// =============================================================================
// Engine implementations
// =============================================================================

/// Baseline AltiVec engine.
///
/// Loads and stores only have aligned quadword instructions: an unaligned load
/// merges the two quadwords that cover the address, and an unaligned store
/// rotates the value into place and writes it back with element stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct Altivec<E: ByteOrder = NativeEndian, U: VectorUnit = DefaultUnit>(PhantomData<(E, U)>);

/// POWER7 VSX engine with unaligned loads and stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct Power7<E: ByteOrder = NativeEndian, U: VectorUnit = DefaultUnit>(PhantomData<(E, U)>);

/// POWER8 engine with the in-core crypto instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Power8<E: ByteOrder = NativeEndian, U: VectorUnit = DefaultUnit>(PhantomData<(E, U)>);

/// Element `k` is `s + k`: selects the 16 bytes at `src` from the two aligned
/// quadwords around it.
#[inline]
fn load_shift_mask<E: ByteOrder>(src: *const u8) -> U8x16 {
    let s = (src as usize & 15) as u8;
    U8x16(E::from_elements(std::array::from_fn(|k| s + k as u8)))
}

/// Element `k` is `(k - s) mod 16`: rotates a value right by `s` elements so
/// each byte sits at its position within the destination quadword.
#[inline]
fn store_shift_mask<E: ByteOrder>(dst: *const u8) -> U8x16 {
    let s = dst as usize & 15;
    U8x16(E::from_elements(std::array::from_fn(|k| ((k + 16 - s) & 15) as u8)))
}

/// (width, offset) of the element stores covering 16 unaligned bytes.
const UNALIGNED_STORE_PLAN: [(usize, isize); 8] =
    [(1, 0), (2, 1), (4, 3), (4, 4), (4, 8), (4, 12), (2, 14), (1, 15)];

impl<E: ByteOrder, U: VectorUnit> VectorEngine for Altivec<E, U> {
    type Order = E;
    type Unit = U;
    const TIER: Tier = Tier::Altivec;

    #[inline]
    unsafe fn load_at<T: VectorLanes>(off: isize, src: *const u8) -> T {
        let src = unsafe { src.offset(off) };
        if is_aligned_on(src, VECTOR_ALIGNMENT) {
            return T::from(unsafe { U::lvx::<E>(0, src) });
        }
        let low = U8x16(unsafe { U::lvx::<E>(0, src) });
        let high = U8x16(unsafe { U::lvx::<E>(15, src) });
        Self::permute_pair(low, high, load_shift_mask::<E>(src)).reinterpret()
    }

    #[inline]
    unsafe fn store_at<T: VectorLanes>(v: T, off: isize, dst: *mut u8) {
        let dst = unsafe { dst.offset(off) };
        if is_aligned_on(dst, VECTOR_ALIGNMENT) {
            return unsafe { U::stvx::<E>(v.into(), 0, dst) };
        }
        let rotated: Vector128 = Self::permute(v, store_shift_mask::<E>(dst)).into();
        for (width, at) in UNALIGNED_STORE_PLAN {
            unsafe { U::stve::<E>(rotated, width, at, dst) };
        }
    }
}

impl<E: ByteOrder, U: VectorUnit> VectorEngine for Power7<E, U> {
    type Order = E;
    type Unit = U;
    const TIER: Tier = Tier::Power7;

    #[inline]
    unsafe fn load_at<T: VectorLanes>(off: isize, src: *const u8) -> T {
        T::from(unsafe { U::lxv::<E>(off, src) })
    }

    #[inline]
    unsafe fn store_at<T: VectorLanes>(v: T, off: isize, dst: *mut u8) {
        unsafe { U::stxv::<E>(v.into(), off, dst) }
    }
}

impl<E: ByteOrder, U: CryptoUnit> VectorEngine for Power8<E, U> {
    type Order = E;
    type Unit = U;
    const TIER: Tier = Tier::Power8;

    #[inline]
    unsafe fn load_at<T: VectorLanes>(off: isize, src: *const u8) -> T {
        unsafe { Power7::<E, U>::load_at(off, src) }
    }

    #[inline]
    unsafe fn store_at<T: VectorLanes>(v: T, off: isize, dst: *mut u8) {
        unsafe { Power7::<E, U>::store_at(v, off, dst) }
    }

    #[inline]
    unsafe fn load_be_at<T: VectorLanes>(off: isize, src: *const u8) -> T {
        if U::HAS_BE_LOAD {
            T::from(unsafe { U::lxv_be(off, src) })
        } else {
            unsafe { Power7::<E, U>::load_be_at(off, src) }
        }
    }

    #[inline]
    unsafe fn store_be_at<T: VectorLanes>(v: T, off: isize, dst: *mut u8) {
        if U::HAS_BE_LOAD {
            unsafe { U::stxv_be(v.into(), off, dst) }
        } else {
            unsafe { Power7::<E, U>::store_be_at(v, off, dst) }
        }
    }
}

impl<E: ByteOrder, U: CryptoUnit> CryptoEngine for Power8<E, U> {}

/// Highest tier enabled at build time, native byte order, default unit.
#[cfg(feature = "power8")]
pub type DefaultEngine = Power8;

/// Highest tier enabled at build time, native byte order, default unit.
#[cfg(all(feature = "power7", not(feature = "power8")))]
pub type DefaultEngine = Power7;

/// Highest tier enabled at build time, native byte order, default unit.
#[cfg(all(feature = "altivec", not(feature = "power7")))]
pub type DefaultEngine = Altivec;

/// Short human-readable description of an engine instantiation.
pub fn engine_description<V: VectorEngine>() -> String {
    format!(
        "{} ({}, {} unit)",
        V::TIER.description(),
        <V::Order as ByteOrder>::NAME,
        <V::Unit as VectorUnit>::NAME
    )
}
