//! Software model of the POWER8 crypto instructions
//!
//! `vcipher`, `vcipherlast`, `vncipher`, `vncipherlast`, `vshasigmaw` and
//! `vshasigmad` as the ISA defines them, operating on the hardware image of a
//! register. The AES state is column-major: hardware byte `i` is row `i % 4`,
//! column `i / 4`, which is the FIPS-197 input order when the block was loaded
//! with a big-endian load.

use super::types::Vector128;

#[rustfmt::skip]
pub(crate) const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

pub(crate) const INV_SBOX: [u8; 256] = invert(&SBOX);

const fn invert(table: &[u8; 256]) -> [u8; 256] {
    let mut inv = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        inv[table[i] as usize] = i as u8;
        i += 1;
    }
    inv
}

/// Multiply in GF(2^8) modulo the AES polynomial 0x11B.
#[inline]
pub(crate) const fn gf_mul(a: u8, b: u8) -> u8 {
    let mut p = 0u8;
    let mut a = a;
    let mut b = b;
    while b != 0 {
        if b & 1 != 0 {
            p ^= a;
        }
        let carry = a & 0x80 != 0;
        a <<= 1;
        if carry {
            a ^= 0x1B;
        }
        b >>= 1;
    }
    p
}

#[inline]
fn sub_bytes(state: &mut [u8; 16], table: &[u8; 256]) {
    for b in state.iter_mut() {
        *b = table[*b as usize];
    }
}

/// Row `r` rotates left by `r` columns.
#[inline]
fn shift_rows(state: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for c in 0..4 {
        for r in 0..4 {
            out[r + 4 * c] = state[r + 4 * ((c + r) % 4)];
        }
    }
    out
}

#[inline]
fn inv_shift_rows(state: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for c in 0..4 {
        for r in 0..4 {
            out[r + 4 * c] = state[r + 4 * ((c + 4 - r) % 4)];
        }
    }
    out
}

#[inline]
fn mix_columns(state: &mut [u8; 16], coeff: [u8; 4]) {
    for col in state.chunks_exact_mut(4) {
        let a = [col[0], col[1], col[2], col[3]];
        for (r, out) in col.iter_mut().enumerate() {
            *out = gf_mul(a[0], coeff[(4 - r) % 4])
                ^ gf_mul(a[1], coeff[(5 - r) % 4])
                ^ gf_mul(a[2], coeff[(6 - r) % 4])
                ^ gf_mul(a[3], coeff[(7 - r) % 4]);
        }
    }
}

const MIX: [u8; 4] = [2, 3, 1, 1];
const INV_MIX: [u8; 4] = [14, 11, 13, 9];

#[inline]
fn xor_key(state: &mut [u8; 16], key: Vector128) {
    for (s, k) in state.iter_mut().zip(key.to_be_bytes()) {
        *s ^= k;
    }
}

/// `vcipher`: SubBytes, ShiftRows, MixColumns, AddRoundKey.
pub(crate) fn cipher_round(state: Vector128, key: Vector128) -> Vector128 {
    let mut s = state.to_be_bytes();
    sub_bytes(&mut s, &SBOX);
    let mut s = shift_rows(&s);
    mix_columns(&mut s, MIX);
    xor_key(&mut s, key);
    Vector128::from_be_bytes(s)
}

/// `vcipherlast`: SubBytes, ShiftRows, AddRoundKey.
pub(crate) fn cipher_last_round(state: Vector128, key: Vector128) -> Vector128 {
    let mut s = state.to_be_bytes();
    sub_bytes(&mut s, &SBOX);
    let mut s = shift_rows(&s);
    xor_key(&mut s, key);
    Vector128::from_be_bytes(s)
}

/// `vncipher`: InvShiftRows, InvSubBytes, AddRoundKey, InvMixColumns.
pub(crate) fn inv_cipher_round(state: Vector128, key: Vector128) -> Vector128 {
    let mut s = inv_shift_rows(&state.to_be_bytes());
    sub_bytes(&mut s, &INV_SBOX);
    xor_key(&mut s, key);
    mix_columns(&mut s, INV_MIX);
    Vector128::from_be_bytes(s)
}

/// `vncipherlast`: InvShiftRows, InvSubBytes, AddRoundKey.
pub(crate) fn inv_cipher_last_round(state: Vector128, key: Vector128) -> Vector128 {
    let mut s = inv_shift_rows(&state.to_be_bytes());
    sub_bytes(&mut s, &INV_SBOX);
    xor_key(&mut s, key);
    Vector128::from_be_bytes(s)
}

#[inline]
const fn sigma32(x: u32, st: u32, one: bool) -> u32 {
    match (st, one) {
        (0, false) => x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3),
        (0, true) => x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10),
        (_, false) => x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22),
        (_, true) => x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25),
    }
}

#[inline]
const fn sigma64(x: u64, st: u32, one: bool) -> u64 {
    match (st, one) {
        (0, false) => x.rotate_right(1) ^ x.rotate_right(8) ^ (x >> 7),
        (0, true) => x.rotate_right(19) ^ x.rotate_right(61) ^ (x >> 6),
        (_, false) => x.rotate_right(28) ^ x.rotate_right(34) ^ x.rotate_right(39),
        (_, true) => x.rotate_right(14) ^ x.rotate_right(18) ^ x.rotate_right(41),
    }
}

/// `vshasigmaw`: `six` bit `3 - k` picks function 1 for hardware word `k`.
pub(crate) fn sha256_sigma(v: Vector128, st: u32, six: u32) -> Vector128 {
    let mut words = [0u32; 4];
    for (k, w) in words.iter_mut().enumerate() {
        let one = (six >> (3 - k)) & 1 == 1;
        *w = sigma32(v.word(k), st, one);
    }
    Vector128::from_words(words)
}

/// `vshasigmad`: `six` bit `3 - 2k` picks function 1 for hardware doubleword `k`.
pub(crate) fn sha512_sigma(v: Vector128, st: u32, six: u32) -> Vector128 {
    let mut dwords = [0u64; 2];
    for (k, d) in dwords.iter_mut().enumerate() {
        let one = (six >> (3 - 2 * k)) & 1 == 1;
        *d = sigma64(v.doubleword(k), st, one);
    }
    Vector128::from_doublewords(dwords)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S-box by definition: multiplicative inverse followed by the affine map.
    fn sbox_reference(x: u8) -> u8 {
        let mut inv = 0u8;
        if x != 0 {
            // x^254 == x^-1 in GF(2^8)
            let mut acc = 1u8;
            for _ in 0..254 {
                acc = gf_mul(acc, x);
            }
            inv = acc;
        }
        inv ^ inv.rotate_left(1) ^ inv.rotate_left(2) ^ inv.rotate_left(3) ^ inv.rotate_left(4) ^ 0x63
    }

    #[test]
    fn test_sbox_matches_definition() {
        for x in 0..=255u8 {
            assert_eq!(SBOX[x as usize], sbox_reference(x), "S-box entry {x:#04x}");
            assert_eq!(INV_SBOX[SBOX[x as usize] as usize], x);
        }
    }

    #[test]
    fn test_mix_columns_fips197_column() {
        // FIPS-197 Appendix B, round 1 column 0: d4 bf 5d 30 -> 04 66 81 e5
        let mut state = [0u8; 16];
        state[..4].copy_from_slice(&[0xd4, 0xbf, 0x5d, 0x30]);
        mix_columns(&mut state, MIX);
        assert_eq!(&state[..4], &[0x04, 0x66, 0x81, 0xe5]);
        mix_columns(&mut state, INV_MIX);
        assert_eq!(&state[..4], &[0xd4, 0xbf, 0x5d, 0x30]);
    }

    #[test]
    fn test_shift_rows_inverse() {
        let s: [u8; 16] = core::array::from_fn(|i| i as u8);
        let shifted = shift_rows(&s);
        // Row 1 of column 0 comes from column 1.
        assert_eq!(shifted[1], 5);
        assert_eq!(inv_shift_rows(&shifted), s);
    }

    #[test]
    fn test_cipher_round_fips197_round1() {
        // FIPS-197 Appendix B: start of round 1 and the round-1 key.
        let start = Vector128::from_u128(0x193de3be_a0f4e22b_9ac68d2a_e9f84808);
        let key = Vector128::from_u128(0xa0fafe17_88542cb1_23a33939_2a6c7605);
        let expected = Vector128::from_u128(0xa49c7ff2_689f352b_6b5bea43_026a5049);
        assert_eq!(cipher_round(start, key), expected);
    }

    #[test]
    fn test_sigma_selectors() {
        let v = Vector128::from_words([0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a]);
        let mixed = sha256_sigma(v, 0, 0b0101);
        assert_eq!(mixed.word(0), sigma32(0x6a09e667, 0, false));
        assert_eq!(mixed.word(1), sigma32(0xbb67ae85, 0, true));
        assert_eq!(mixed.word(2), sigma32(0x3c6ef372, 0, false));
        assert_eq!(mixed.word(3), sigma32(0xa54ff53a, 0, true));

        let d = Vector128::from_doublewords([0x6a09e667f3bcc908, 0xbb67ae8584caa73b]);
        let mixed = sha512_sigma(d, 1, 0b0010);
        assert_eq!(mixed.doubleword(0), sigma64(0x6a09e667f3bcc908, 1, false));
        assert_eq!(mixed.doubleword(1), sigma64(0xbb67ae8584caa73b, 1, true));
    }
}
