//! Scalar reference functions.
//!
//! Plain integer versions of what the vector primitives compute, used by the
//! self test and the test suites to check the engines lane by lane, plus the
//! AES-128 key schedule needed to drive the round primitives.

use crate::defaults::{AES128_KEY_BYTES, AES128_ROUND_KEYS};
use crate::simd_abstraction::soft_crypto::SBOX;

// SHA-256 (FIPS 180-4, 4.1.2)

#[inline]
pub const fn sha256_small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline]
pub const fn sha256_small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[inline]
pub const fn sha256_big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline]
pub const fn sha256_big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

// SHA-512 (FIPS 180-4, 4.1.3)

#[inline]
pub const fn sha512_small_sigma0(x: u64) -> u64 {
    x.rotate_right(1) ^ x.rotate_right(8) ^ (x >> 7)
}

#[inline]
pub const fn sha512_small_sigma1(x: u64) -> u64 {
    x.rotate_right(19) ^ x.rotate_right(61) ^ (x >> 6)
}

#[inline]
pub const fn sha512_big_sigma0(x: u64) -> u64 {
    x.rotate_right(28) ^ x.rotate_right(34) ^ x.rotate_right(39)
}

#[inline]
pub const fn sha512_big_sigma1(x: u64) -> u64 {
    x.rotate_right(14) ^ x.rotate_right(18) ^ x.rotate_right(41)
}

/// The SHA-256 function selected by `func` (0 = σ, 1 = Σ) and `one`
/// (false = 0, true = 1).
pub const fn sha256_sigma_select(x: u32, func: u32, one: bool) -> u32 {
    match (func, one) {
        (0, false) => sha256_small_sigma0(x),
        (0, true) => sha256_small_sigma1(x),
        (_, false) => sha256_big_sigma0(x),
        (_, true) => sha256_big_sigma1(x),
    }
}

/// The SHA-512 function selected by `func` and `one`.
pub const fn sha512_sigma_select(x: u64, func: u32, one: bool) -> u64 {
    match (func, one) {
        (0, false) => sha512_small_sigma0(x),
        (0, true) => sha512_small_sigma1(x),
        (_, false) => sha512_big_sigma0(x),
        (_, true) => sha512_big_sigma1(x),
    }
}

/// Expected `sha256_sigma::<FUNC, SUBFUNC>` result on hardware words
/// (word 0 leftmost).
pub fn sha256_sigma_words(words: [u32; 4], func: u32, subfunc: u32) -> [u32; 4] {
    std::array::from_fn(|k| sha256_sigma_select(words[k], func, (subfunc >> (3 - k)) & 1 == 1))
}

/// Expected `sha512_sigma::<FUNC, SUBFUNC>` result on hardware doublewords
/// (doubleword 0 leftmost).
pub fn sha512_sigma_doublewords(dwords: [u64; 2], func: u32, subfunc: u32) -> [u64; 2] {
    std::array::from_fn(|k| sha512_sigma_select(dwords[k], func, (subfunc >> (3 - 2 * k)) & 1 == 1))
}

/// AES-128 key schedule (FIPS-197, 5.2). Round key `r` is in FIPS byte order.
pub fn aes128_expand_key(key: &[u8; AES128_KEY_BYTES]) -> [[u8; 16]; AES128_ROUND_KEYS] {
    const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

    let mut w = [[0u8; 4]; 4 * AES128_ROUND_KEYS];
    for (i, word) in w.iter_mut().take(4).enumerate() {
        word.copy_from_slice(&key[4 * i..4 * i + 4]);
    }
    for i in 4..w.len() {
        let mut t = w[i - 1];
        if i % 4 == 0 {
            t.rotate_left(1);
            for b in t.iter_mut() {
                *b = SBOX[*b as usize];
            }
            t[0] ^= RCON[i / 4 - 1];
        }
        for j in 0..4 {
            w[i][j] = w[i - 4][j] ^ t[j];
        }
    }

    let mut round_keys = [[0u8; 16]; AES128_ROUND_KEYS];
    for (r, rk) in round_keys.iter_mut().enumerate() {
        for c in 0..4 {
            rk[4 * c..4 * c + 4].copy_from_slice(&w[4 * r + c]);
        }
    }
    round_keys
}
