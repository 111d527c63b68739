//! POWER inline-assembly vector unit.
//!
//! Compiled only with the `power-asm` feature on powerpc64 (nightly Rust). The
//! tiers enabled by Cargo features are required as target features at compile
//! time (see `capability`), so every instruction used here is known to exist
//! on the processor the binary was built for.
//!
//! Registers cross the `asm!` boundary as `core::simd::u8x16`, whose lane `i`
//! is element `i` in the target's byte order.
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::asm;
use core::simd::u8x16;

use super::byte_order::{ByteOrder, NativeEndian};
use super::portable_intrinsics::{CryptoUnit, VectorUnit};
use super::types::{LaneWidth, Vector128};

/// Vector unit executing real AltiVec/VSX instructions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerUnit;

#[inline(always)]
fn to_reg(v: Vector128) -> u8x16 {
    u8x16::from_array(NativeEndian::to_elements(v))
}

#[inline(always)]
fn from_reg(r: u8x16) -> Vector128 {
    NativeEndian::from_elements(r.to_array())
}

macro_rules! binary_op {
    ($name:ident, $insn:literal) => {
        #[inline]
        #[target_feature(enable = "altivec")]
        unsafe fn $name(a: u8x16, b: u8x16) -> u8x16 {
            let out: u8x16;
            asm!(
                concat!($insn, " {out}, {a}, {b}"),
                out = lateout(vreg) out,
                a = in(vreg) a,
                b = in(vreg) b,
                options(nomem, nostack, pure)
            );
            out
        }
    };
}

binary_op!(vand, "vand");
binary_op!(vxor, "vxor");
binary_op!(vnor, "vnor");
binary_op!(vaddubm, "vaddubm");
binary_op!(vadduhm, "vadduhm");
binary_op!(vadduwm, "vadduwm");

#[inline]
#[target_feature(enable = "altivec", enable = "vsx", enable = "power8-vector")]
unsafe fn vaddudm(a: u8x16, b: u8x16) -> u8x16 {
    let out: u8x16;
    asm!(
        "vaddudm {out}, {a}, {b}",
        out = lateout(vreg) out,
        a = in(vreg) a,
        b = in(vreg) b,
        options(nomem, nostack, pure)
    );
    out
}

#[inline]
#[target_feature(enable = "altivec")]
unsafe fn vperm(a: u8x16, b: u8x16, c: u8x16) -> u8x16 {
    let out: u8x16;
    asm!(
        "vperm {out}, {a}, {b}, {c}",
        out = lateout(vreg) out,
        a = in(vreg) a,
        b = in(vreg) b,
        c = in(vreg) c,
        options(nomem, nostack, pure)
    );
    out
}

macro_rules! vsldoi_imm {
    ($a:expr, $b:expr, $sh:literal) => {{
        let out: u8x16;
        asm!(
            "vsldoi {out}, {a}, {b}, {sh}",
            out = lateout(vreg) out,
            a = in(vreg) $a,
            b = in(vreg) $b,
            sh = const $sh,
            options(nomem, nostack, pure)
        );
        out
    }};
}

#[inline]
#[target_feature(enable = "altivec")]
unsafe fn vsldoi(a: u8x16, b: u8x16, sh: usize) -> u8x16 {
    match sh {
        1 => vsldoi_imm!(a, b, 1),
        2 => vsldoi_imm!(a, b, 2),
        3 => vsldoi_imm!(a, b, 3),
        4 => vsldoi_imm!(a, b, 4),
        5 => vsldoi_imm!(a, b, 5),
        6 => vsldoi_imm!(a, b, 6),
        7 => vsldoi_imm!(a, b, 7),
        8 => vsldoi_imm!(a, b, 8),
        9 => vsldoi_imm!(a, b, 9),
        10 => vsldoi_imm!(a, b, 10),
        11 => vsldoi_imm!(a, b, 11),
        12 => vsldoi_imm!(a, b, 12),
        13 => vsldoi_imm!(a, b, 13),
        14 => vsldoi_imm!(a, b, 14),
        15 => vsldoi_imm!(a, b, 15),
        0 => a,
        // concat_window only shifts by 1..=15.
        _ => unreachable!("vsldoi shift {sh} out of range"),
    }
}

#[inline]
#[target_feature(enable = "altivec")]
unsafe fn lvx(off: isize, base: *const u8) -> u8x16 {
    let out: u8x16;
    asm!(
        "lvx {out}, {base}, {off}",
        out = lateout(vreg) out,
        base = in(reg_nonzero) base,
        off = in(reg) off,
        options(pure, readonly, nostack)
    );
    out
}

#[inline]
#[target_feature(enable = "altivec")]
unsafe fn stvx(v: u8x16, off: isize, base: *mut u8) {
    asm!(
        "stvx {v}, {base}, {off}",
        v = in(vreg) v,
        base = in(reg_nonzero) base,
        off = in(reg) off,
        options(nostack)
    );
}

macro_rules! element_store {
    ($name:ident, $insn:literal) => {
        #[inline]
        #[target_feature(enable = "altivec")]
        unsafe fn $name(v: u8x16, off: isize, base: *mut u8) {
            asm!(
                concat!($insn, " {v}, {base}, {off}"),
                v = in(vreg) v,
                base = in(reg_nonzero) base,
                off = in(reg) off,
                options(nostack)
            );
        }
    };
}

element_store!(stvebx, "stvebx");
element_store!(stvehx, "stvehx");
element_store!(stvewx, "stvewx");

#[inline]
#[target_feature(enable = "altivec", enable = "vsx")]
unsafe fn vsx_load(src: *const u8) -> u8x16 {
    core::ptr::read_unaligned(src.cast::<u8x16>())
}

#[inline]
#[target_feature(enable = "altivec", enable = "vsx")]
unsafe fn vsx_store(v: u8x16, dst: *mut u8) {
    core::ptr::write_unaligned(dst.cast::<u8x16>(), v)
}

/// Memory instructions number elements in the target's byte order only.
const fn assert_native<E: ByteOrder>() {
    assert!(
        E::BIG_ENDIAN == NativeEndian::BIG_ENDIAN,
        "PowerUnit memory instructions run in the target byte order"
    );
}

impl VectorUnit for PowerUnit {
    const NAME: &'static str = "power";
    const HAS_BE_LOAD: bool = false;

    #[inline]
    fn vperm(a: Vector128, b: Vector128, c: Vector128) -> Vector128 {
        // SAFETY: altivec is a required target feature.
        from_reg(unsafe { vperm(to_reg(a), to_reg(b), to_reg(c)) })
    }

    #[inline]
    fn vsldoi(a: Vector128, b: Vector128, sh: usize) -> Vector128 {
        // SAFETY: altivec is a required target feature.
        from_reg(unsafe { vsldoi(to_reg(a), to_reg(b), sh) })
    }

    #[inline]
    fn vand(a: Vector128, b: Vector128) -> Vector128 {
        // SAFETY: altivec is a required target feature.
        from_reg(unsafe { vand(to_reg(a), to_reg(b)) })
    }

    #[inline]
    fn vxor(a: Vector128, b: Vector128) -> Vector128 {
        // SAFETY: altivec is a required target feature.
        from_reg(unsafe { vxor(to_reg(a), to_reg(b)) })
    }

    #[inline]
    fn vnor(a: Vector128, b: Vector128) -> Vector128 {
        // SAFETY: altivec is a required target feature.
        from_reg(unsafe { vnor(to_reg(a), to_reg(b)) })
    }

    #[inline]
    fn vaddum(width: LaneWidth, a: Vector128, b: Vector128) -> Vector128 {
        let (a, b) = (to_reg(a), to_reg(b));
        // SAFETY: altivec is a required target feature.
        let r = unsafe {
            match width {
                LaneWidth::W8 => vaddubm(a, b),
                LaneWidth::W16 => vadduhm(a, b),
                LaneWidth::W32 => vadduwm(a, b),
                #[cfg(target_feature = "power8-vector")]
                LaneWidth::W64 => vaddudm(a, b),
                #[cfg(not(target_feature = "power8-vector"))]
                LaneWidth::W64 => return super::SoftUnit::vaddum(width, from_reg(a), from_reg(b)),
            }
        };
        from_reg(r)
    }

    #[inline]
    unsafe fn lvx<E: ByteOrder>(off: isize, src: *const u8) -> Vector128 {
        const { assert_native::<E>() };
        from_reg(lvx(off, src))
    }

    #[inline]
    unsafe fn stvx<E: ByteOrder>(v: Vector128, off: isize, dst: *mut u8) {
        const { assert_native::<E>() };
        stvx(to_reg(v), off, dst)
    }

    #[inline]
    unsafe fn stve<E: ByteOrder>(v: Vector128, width: usize, off: isize, dst: *mut u8) {
        const { assert_native::<E>() };
        match width {
            1 => stvebx(to_reg(v), off, dst),
            2 => stvehx(to_reg(v), off, dst),
            _ => stvewx(to_reg(v), off, dst),
        }
    }

    // No asm for the unaligned VSX pair: an unaligned `u8x16` move with vsx
    // enabled lowers to lxvw4x/stxvw4x on big endian and lxvd2x/stxvd2x plus
    // xxswapd on little endian, which is exactly `vec_xl`/`vec_xst`.
    #[inline]
    unsafe fn lxv<E: ByteOrder>(off: isize, src: *const u8) -> Vector128 {
        const { assert_native::<E>() };
        from_reg(vsx_load(src.offset(off)))
    }

    #[inline]
    unsafe fn stxv<E: ByteOrder>(v: Vector128, off: isize, dst: *mut u8) {
        const { assert_native::<E>() };
        vsx_store(to_reg(v), dst.offset(off))
    }
}

macro_rules! crypto_op {
    ($name:ident, $insn:literal) => {
        #[inline]
        #[target_feature(enable = "altivec", enable = "vsx", enable = "power8-vector", enable = "power8-crypto")]
        unsafe fn $name(state: u8x16, key: u8x16) -> u8x16 {
            let out: u8x16;
            asm!(
                concat!($insn, " {out}, {s}, {k}"),
                out = lateout(vreg) out,
                s = in(vreg) state,
                k = in(vreg) key,
                options(nomem, nostack, pure)
            );
            out
        }
    };
}

crypto_op!(vcipher, "vcipher");
crypto_op!(vcipherlast, "vcipherlast");
crypto_op!(vncipher, "vncipher");
crypto_op!(vncipherlast, "vncipherlast");

macro_rules! sigma_imm {
    ($insn:literal, $v:expr, $st:literal, $six:literal) => {{
        let out: u8x16;
        asm!(
            concat!($insn, " {out}, {v}, {st}, {six}"),
            out = lateout(vreg) out,
            v = in(vreg) $v,
            st = const $st,
            six = const $six,
            options(nomem, nostack, pure)
        );
        out
    }};
}

macro_rules! sigma_table {
    ($name:ident, $insn:literal) => {
        #[inline]
        #[target_feature(enable = "altivec", enable = "vsx", enable = "power8-vector", enable = "power8-crypto")]
        unsafe fn $name(v: u8x16, st: u32, six: u32) -> u8x16 {
            sigma_table!(@arms $insn, v, st, six; 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15)
        }
    };
    (@arms $insn:literal, $v:ident, $st:ident, $six:ident; $($s:literal)+) => {
        match ($st, $six) {
            $(
                (0, $s) => sigma_imm!($insn, $v, 0, $s),
                (1, $s) => sigma_imm!($insn, $v, 1, $s),
            )+
            // The engine rejects other selectors at compile time.
            _ => unreachable!("vshasigma selectors ({}, {}) out of range", $st, $six),
        }
    };
}

sigma_table!(vshasigmaw, "vshasigmaw");
sigma_table!(vshasigmad, "vshasigmad");

#[cfg(target_feature = "power8-crypto")]
impl CryptoUnit for PowerUnit {
    #[inline]
    fn vcipher(state: Vector128, key: Vector128) -> Vector128 {
        // SAFETY: power8-crypto is a required target feature of this impl.
        from_reg(unsafe { vcipher(to_reg(state), to_reg(key)) })
    }

    #[inline]
    fn vcipherlast(state: Vector128, key: Vector128) -> Vector128 {
        // SAFETY: as above.
        from_reg(unsafe { vcipherlast(to_reg(state), to_reg(key)) })
    }

    #[inline]
    fn vncipher(state: Vector128, key: Vector128) -> Vector128 {
        // SAFETY: as above.
        from_reg(unsafe { vncipher(to_reg(state), to_reg(key)) })
    }

    #[inline]
    fn vncipherlast(state: Vector128, key: Vector128) -> Vector128 {
        // SAFETY: as above.
        from_reg(unsafe { vncipherlast(to_reg(state), to_reg(key)) })
    }

    #[inline]
    fn vshasigmaw(v: Vector128, st: u32, six: u32) -> Vector128 {
        // SAFETY: as above.
        from_reg(unsafe { vshasigmaw(to_reg(v), st, six) })
    }

    #[inline]
    fn vshasigmad(v: Vector128, st: u32, six: u32) -> Vector128 {
        // SAFETY: as above.
        from_reg(unsafe { vshasigmad(to_reg(v), st, six) })
    }
}
