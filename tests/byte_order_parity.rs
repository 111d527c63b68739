// tests/byte_order_parity.rs
//
// The same program, run on a big-endian and a little-endian engine, must see
// the same element-order values and write the same bytes.

use power_vector::simd_abstraction::{
    Altivec, BigEndian, LittleEndian, Power7, Power8, SoftUnit, U8x16, U32x4, U64x2, VectorEngine,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type AltivecBe = Altivec<BigEndian, SoftUnit>;
type AltivecLe = Altivec<LittleEndian, SoftUnit>;
type Power7Be = Power7<BigEndian, SoftUnit>;
type Power7Le = Power7<LittleEndian, SoftUnit>;
type Power8Be = Power8<BigEndian, SoftUnit>;
type Power8Le = Power8<LittleEndian, SoftUnit>;

/// A little byte-shuffling program using only element-order operations.
///
/// Byte lanes only: wider lane arithmetic reads element bytes in the
/// processor's own order and legitimately differs between byte orders.
fn mix<V: VectorEngine>(block: &[u8; 16], mask: [u8; 16]) -> [u8; 16] {
    let mut native = [0u8; 16];
    unsafe {
        let v: U8x16 = V::load(block.as_ptr());
        let w = V::permute(v, V::from_u8_lanes(mask));
        let w = V::xor(w, V::shift_left::<3, _>(v));
        let w = V::shift_left_pair::<7, _>(w, V::reverse(v));
        let w = V::add(w, V::from_u8_lanes(std::array::from_fn(|i| 0xF0 + i as u8)));
        V::store(w, native.as_mut_ptr());
    }
    native
}

#[test]
fn test_load_be_then_store_on_little_endian() {
    let src: [u8; 16] = std::array::from_fn(|i| i as u8);
    let mut out = [0u8; 16];
    unsafe {
        let v: U8x16 = Power8Le::load_be(src.as_ptr());
        Power8Le::store(v, out.as_mut_ptr());
    }
    let expected: [u8; 16] = std::array::from_fn(|i| 15 - i as u8);
    assert_eq!(out, expected);

    unsafe {
        let v: U8x16 = Power8Le::load_be(src.as_ptr());
        Power8Le::store_be(v, out.as_mut_ptr());
    }
    assert_eq!(out, src);
}

#[test]
fn test_load_be_then_store_on_big_endian() {
    let src: [u8; 16] = std::array::from_fn(|i| i as u8);
    let mut out = [0u8; 16];
    unsafe {
        let v: U8x16 = Power8Be::load_be(src.as_ptr());
        Power8Be::store(v, out.as_mut_ptr());
    }
    assert_eq!(out, src);
}

#[test]
fn test_element_programs_agree_across_byte_orders() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..256 {
        let mut block = [0u8; 16];
        rng.fill(&mut block);
        let mask: [u8; 16] = std::array::from_fn(|_| rng.gen_range(0..16));

        let reference = mix::<AltivecBe>(&block, mask);
        assert_eq!(mix::<AltivecLe>(&block, mask), reference);
        assert_eq!(mix::<Power7Be>(&block, mask), reference);
        assert_eq!(mix::<Power7Le>(&block, mask), reference);
        assert_eq!(mix::<Power8Be>(&block, mask), reference);
        assert_eq!(mix::<Power8Le>(&block, mask), reference);
    }
}

#[test]
fn test_lane_values_are_order_independent() {
    let src: [u8; 16] = std::array::from_fn(|i| 0x10 + i as u8);
    let be: U64x2 = unsafe { Power7Be::load(src.as_ptr()) };
    let le: U64x2 = unsafe { Power7Le::load(src.as_ptr()) };
    // Native loads give each processor its own integer view of memory.
    assert_eq!(Power7Be::to_u64_lanes(be), [0x1011_1213_1415_1617, 0x1819_1a1b_1c1d_1e1f]);
    assert_eq!(Power7Le::to_u64_lanes(le), [0x1716_1514_1312_1110, 0x1f1e_1d1c_1b1a_1918]);
}

#[test]
fn test_be_round_trip_random() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..128 {
        let lanes: [u32; 4] = std::array::from_fn(|_| rng.r#gen());
        let v = Power8Le::from_u32_lanes(lanes);
        let mut buf = [0u8; 16];
        let back: U32x4 = unsafe {
            Power8Le::store_be(v, buf.as_mut_ptr());
            Power8Le::load_be(buf.as_ptr())
        };
        assert_eq!(Power8Le::to_u32_lanes(back), lanes);
    }
}
