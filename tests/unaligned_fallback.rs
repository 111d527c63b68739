// tests/unaligned_fallback.rs
//
// The baseline engine synthesizes unaligned accesses from aligned quadword
// instructions. It must agree with the VSX engines at every misalignment and
// never touch bytes outside the 16-byte window.

use power_vector::simd_abstraction::block::{load_block, load_block_be, store_block, store_block_be};
use power_vector::simd_abstraction::{
    Altivec, BigEndian, ByteOrder, LaneWidth, LittleEndian, NativeEndian, Power7, Power8, SoftUnit, U8x16, U16x8,
    Vector128, VectorEngine, VectorUnit,
};
use power_vector::VectorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[repr(C, align(16))]
struct Arena([u8; 64]);

fn random_arena(rng: &mut StdRng) -> Arena {
    let mut a = Arena([0; 64]);
    rng.fill(&mut a.0[..]);
    a
}

fn check_tiers_agree<E: ByteOrder>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let src = random_arena(&mut rng);
    for s in 0..32 {
        let p = src.0.as_ptr().wrapping_add(s);
        let (a, b, c): (U16x8, U16x8, U16x8) = unsafe {
            (
                Altivec::<E, SoftUnit>::load(p),
                Power7::<E, SoftUnit>::load(p),
                Power8::<E, SoftUnit>::load(p),
            )
        };
        assert_eq!(a, b, "load at misalignment {s}");
        assert_eq!(b, c, "load at misalignment {s}");

        let (a, b): (U8x16, U8x16) =
            unsafe { (Altivec::<E, SoftUnit>::load_be(p), Power8::<E, SoftUnit>::load_be(p)) };
        assert_eq!(a, b, "load_be at misalignment {s}");
    }
}

#[test]
fn test_tiers_agree_big_endian() {
    check_tiers_agree::<BigEndian>(1);
}

#[test]
fn test_tiers_agree_little_endian() {
    check_tiers_agree::<LittleEndian>(2);
}

fn check_store_window<V: VectorEngine>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for s in 0..32 {
        let src = random_arena(&mut rng);
        let v: U8x16 = unsafe { V::load(src.0.as_ptr().wrapping_add(s)) };

        let mut dst = Arena([0xC3; 64]);
        unsafe { V::store(v, dst.0.as_mut_ptr().wrapping_add(s)) };
        assert_eq!(&dst.0[s..s + 16], &src.0[s..s + 16]);
        assert!(dst.0[..s].iter().all(|&b| b == 0xC3), "store below window at {s}");
        assert!(dst.0[s + 16..].iter().all(|&b| b == 0xC3), "store above window at {s}");

        let mut dst = Arena([0x3C; 64]);
        unsafe { V::store_be(V::reverse(v), dst.0.as_mut_ptr().wrapping_add(s)) };
        assert!(dst.0[..s].iter().all(|&b| b == 0x3C), "store_be below window at {s}");
        assert!(dst.0[s + 16..].iter().all(|&b| b == 0x3C), "store_be above window at {s}");
    }
}

#[test]
fn test_baseline_store_stays_in_window() {
    check_store_window::<Altivec<BigEndian, SoftUnit>>(10);
    check_store_window::<Altivec<LittleEndian, SoftUnit>>(11);
}

#[test]
fn test_vsx_store_stays_in_window() {
    check_store_window::<Power7<LittleEndian, SoftUnit>>(12);
    check_store_window::<Power8<BigEndian, SoftUnit>>(13);
}

/// Vector unit that panics on any aligned or element store whose effective
/// address leaves the 16 bytes at `dst`, instead of clipping it.
#[derive(Debug, Clone, Copy, Default)]
struct WindowedUnit;

fn assert_in_window(ea: usize, width: usize, base: usize) {
    assert!(
        ea >= base && ea + width <= base + 16,
        "{width}-byte store at {ea:#x} outside window {base:#x}..{:#x}",
        base + 16
    );
}

impl VectorUnit for WindowedUnit {
    const NAME: &'static str = "windowed";
    const HAS_BE_LOAD: bool = false;

    fn vperm(a: Vector128, b: Vector128, c: Vector128) -> Vector128 {
        SoftUnit::vperm(a, b, c)
    }

    fn vsldoi(a: Vector128, b: Vector128, sh: usize) -> Vector128 {
        SoftUnit::vsldoi(a, b, sh)
    }

    fn vand(a: Vector128, b: Vector128) -> Vector128 {
        SoftUnit::vand(a, b)
    }

    fn vxor(a: Vector128, b: Vector128) -> Vector128 {
        SoftUnit::vxor(a, b)
    }

    fn vnor(a: Vector128, b: Vector128) -> Vector128 {
        SoftUnit::vnor(a, b)
    }

    fn vaddum(width: LaneWidth, a: Vector128, b: Vector128) -> Vector128 {
        SoftUnit::vaddum(width, a, b)
    }

    unsafe fn stvx<E: ByteOrder>(v: Vector128, off: isize, dst: *mut u8) {
        let base = dst as usize;
        assert_in_window(base.wrapping_add_signed(off) & !15, 16, base);
        unsafe { SoftUnit::stvx::<E>(v, off, dst) }
    }

    unsafe fn stve<E: ByteOrder>(v: Vector128, width: usize, off: isize, dst: *mut u8) {
        let base = dst as usize;
        assert_in_window(base.wrapping_add_signed(off) & !(width - 1), width, base);
        unsafe { SoftUnit::stve::<E>(v, width, off, dst) }
    }
}

fn check_store_addresses<E: ByteOrder>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let src = random_arena(&mut rng);
    for s in 0..16 {
        let v: U8x16 = unsafe { Altivec::<E, SoftUnit>::load(src.0.as_ptr().wrapping_add(s)) };
        let mut dst = Arena([0; 64]);
        let p = dst.0.as_mut_ptr().wrapping_add(16 + s);
        unsafe { Altivec::<E, WindowedUnit>::store(v, p) };
        assert_eq!(&dst.0[16 + s..32 + s], &src.0[s..s + 16], "misalignment {s}");
    }
}

#[test]
fn test_baseline_store_addresses_stay_in_window_big_endian() {
    check_store_addresses::<BigEndian>(20);
}

#[test]
fn test_baseline_store_addresses_stay_in_window_little_endian() {
    check_store_addresses::<LittleEndian>(21);
}

#[test]
fn test_native_unit_matches_portable_unit() {
    let mut rng = StdRng::seed_from_u64(30);
    let src = random_arena(&mut rng);
    for s in 0..32 {
        let p = src.0.as_ptr().wrapping_add(s);
        let (native, soft): (U8x16, U8x16) =
            unsafe { (Power7::<NativeEndian>::load(p), Power7::<NativeEndian, SoftUnit>::load(p)) };
        assert_eq!(native, soft, "load at misalignment {s}");

        let mut a = Arena([0; 64]);
        let mut b = Arena([0; 64]);
        unsafe {
            Power7::<NativeEndian>::store(native, a.0.as_mut_ptr().wrapping_add(s));
            Power7::<NativeEndian, SoftUnit>::store(soft, b.0.as_mut_ptr().wrapping_add(s));
        }
        assert_eq!(a.0, b.0, "store at misalignment {s}");
    }
}

#[test]
fn test_block_api_round_trip() {
    let mut rng = StdRng::seed_from_u64(99);
    let bytes: Vec<u8> = (0..100).map(|_| rng.r#gen()).collect();
    let mut out = vec![0u8; 100];
    for offset in [0, 1, 7, 15, 16, 33, 84] {
        let v: U8x16 = load_block_be::<Altivec<LittleEndian, SoftUnit>, _>(&bytes, offset).unwrap();
        store_block_be::<Altivec<LittleEndian, SoftUnit>, _>(v, &mut out, offset).unwrap();
        assert_eq!(&out[offset..offset + 16], &bytes[offset..offset + 16]);

        let v: U8x16 = load_block::<Power7<BigEndian, SoftUnit>, _>(&bytes, offset).unwrap();
        store_block::<Power7<BigEndian, SoftUnit>, _>(v, &mut out, offset).unwrap();
        assert_eq!(&out[offset..offset + 16], &bytes[offset..offset + 16]);
    }
}

#[test]
fn test_block_api_bounds() {
    let bytes = [0u8; 32];
    let err = load_block::<Altivec<BigEndian, SoftUnit>, U8x16>(&bytes, 17).unwrap_err();
    assert_eq!(err, VectorError::BufferTooShort { offset: 17, len: 32 });
    assert!(load_block::<Altivec<BigEndian, SoftUnit>, U8x16>(&bytes, 16).is_ok());
}
