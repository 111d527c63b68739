//! Known-answer self test.
//!
//! Runs fixed vectors through an engine and compares against published
//! results (FIPS-197), the scalar reference functions, and the byte-order
//! scenarios every engine must reproduce. Each check is logged at debug
//! level; a failure is logged at warn level and returned as
//! `VectorError::KnownAnswerMismatch`.

use crate::defaults::{
    AES128_ROUNDS, AES128_ROUND_KEYS, SHA256_INITIAL_HASH, SHA512_INITIAL_HASH, SIGMA_COMPRESSION,
    SIGMA_SCHEDULE,
};
use crate::error::{Result, VectorError};
use crate::reference;
use crate::simd_abstraction::{
    Altivec, BigEndian, ByteOrder, CryptoEngine, LittleEndian, Power7, Power8, SoftUnit, U8x16,
    U32x4, U64x2, VectorEngine, engine_description,
};
use crate::utils::to_hex;

// FIPS-197 Appendix C.1 (AES-128)
pub const FIPS197_C1_KEY: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];
pub const FIPS197_C1_PLAINTEXT: [u8; 16] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
];
pub const FIPS197_C1_CIPHERTEXT: [u8; 16] = [
    0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5, 0x5a,
];

// AES-128 with all-zero key and plaintext
pub const ZERO_KEY_CIPHERTEXT: [u8; 16] = [
    0x66, 0xe9, 0x4b, 0xd4, 0xef, 0x8a, 0x2c, 0x3b, 0x88, 0x4c, 0xfa, 0x59, 0xca, 0x34, 0x2b, 0x2e,
];

static SEQUENCE: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Result of running the suite against one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestReport {
    pub engine: String,
    pub checks: usize,
}

/// Encrypt one block with AES-128 round keys in FIPS byte order.
pub fn encrypt_block<V: CryptoEngine>(
    round_keys: &[[u8; 16]; AES128_ROUND_KEYS],
    block: &[u8; 16],
) -> [u8; 16] {
    // SAFETY: every pointer below addresses a 16-byte array.
    unsafe {
        let key = |r: usize| -> U8x16 { V::load_be(round_keys[r].as_ptr()) };
        let mut state: U8x16 = V::xor(V::load_be(block.as_ptr()), key(0));
        for r in 1..AES128_ROUNDS {
            state = V::encrypt(state, key(r));
        }
        state = V::encrypt_last(state, key(AES128_ROUNDS));
        let mut out = [0u8; 16];
        V::store_be(state, out.as_mut_ptr());
        out
    }
}

/// Decrypt one block with the equivalent inverse cipher order.
pub fn decrypt_block<V: CryptoEngine>(
    round_keys: &[[u8; 16]; AES128_ROUND_KEYS],
    block: &[u8; 16],
) -> [u8; 16] {
    // SAFETY: every pointer below addresses a 16-byte array.
    unsafe {
        let key = |r: usize| -> U8x16 { V::load_be(round_keys[r].as_ptr()) };
        let mut state: U8x16 = V::xor(V::load_be(block.as_ptr()), key(AES128_ROUNDS));
        for r in (1..AES128_ROUNDS).rev() {
            state = V::decrypt(state, key(r));
        }
        state = V::decrypt_last(state, key(0));
        let mut out = [0u8; 16];
        V::store_be(state, out.as_mut_ptr());
        out
    }
}

fn expect_bytes(check: &'static str, expected: &[u8], actual: &[u8]) -> Result<()> {
    if expected == actual {
        log::debug!("check `{}` passed", check);
        Ok(())
    } else {
        log::warn!(
            "check `{}` failed: expected {}, got {}",
            check,
            to_hex(expected),
            to_hex(actual)
        );
        Err(VectorError::KnownAnswerMismatch {
            check,
            expected: to_hex(expected),
            actual: to_hex(actual),
        })
    }
}

fn words_to_bytes<const N: usize>(words: [u32; N]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn dwords_to_bytes<const N: usize>(dwords: [u64; N]) -> Vec<u8> {
    dwords.iter().flat_map(|d| d.to_be_bytes()).collect()
}

/// Byte-order, permute and shift checks. Returns the number of checks run.
pub fn run_vector_checks<V: VectorEngine>() -> Result<usize> {
    let mut checks = 0;
    let expected_native: [u8; 16] = if <V::Order as ByteOrder>::BIG_ENDIAN {
        SEQUENCE
    } else {
        std::array::from_fn(|i| 15 - i as u8)
    };

    // SAFETY: all pointers address 16-byte arrays.
    let (native, canonical) = unsafe {
        let v: U8x16 = V::load_be(SEQUENCE.as_ptr());
        let mut native = [0u8; 16];
        let mut canonical = [0u8; 16];
        V::store(v, native.as_mut_ptr());
        V::store_be(v, canonical.as_mut_ptr());
        (native, canonical)
    };
    expect_bytes("load_be then store", &expected_native, &native)?;
    expect_bytes("load_be then store_be", &SEQUENCE, &canonical)?;
    checks += 2;

    // Element 0 of a native load is the byte at the lowest address.
    let v: U8x16 = unsafe { V::load(SEQUENCE.as_ptr()) };
    expect_bytes("native element order", &SEQUENCE, &V::to_u8_lanes(v))?;
    let reversed = V::to_u8_lanes(V::reverse(v));
    expect_bytes("reverse", &std::array::from_fn::<u8, 16, _>(|i| 15 - i as u8), &reversed)?;
    checks += 2;

    let shifted = V::to_u8_lanes(V::shift_left::<4, _>(v));
    let expected: [u8; 16] = std::array::from_fn(|i| if i < 12 { i as u8 + 4 } else { 0 });
    expect_bytes("shift_left by 4", &expected, &shifted)?;
    let shifted = V::to_u8_lanes(V::shift_right::<4, _>(v));
    let expected: [u8; 16] = std::array::from_fn(|i| if i < 4 { 0 } else { i as u8 - 4 });
    expect_bytes("shift_right by 4", &expected, &shifted)?;
    checks += 2;

    let hi = V::from_u8_lanes(std::array::from_fn(|i| 16 + i as u8));
    let mask = V::from_u8_lanes(std::array::from_fn(|i| if i % 2 == 0 { i as u8 / 2 } else { 16 + i as u8 / 2 }));
    let interleaved = V::to_u8_lanes(V::permute_pair(v, hi, mask));
    let expected: [u8; 16] = std::array::from_fn(|i| if i % 2 == 0 { i as u8 / 2 } else { 16 + i as u8 / 2 });
    expect_bytes("permute_pair interleave", &expected, &interleaved)?;
    checks += 1;

    let sum = V::to_u32_lanes(V::add(
        V::from_u32_lanes([u32::MAX, 1, 0x8000_0000, 7]),
        V::from_u32_lanes([1, 1, 0x8000_0000, 8]),
    ));
    expect_bytes("add wraps per lane", &words_to_bytes([0, 2, 0, 15]), &words_to_bytes(sum))?;
    checks += 1;

    Ok(checks)
}

/// AES and SHA-2 checks. Returns the number of checks run.
pub fn run_crypto_checks<V: CryptoEngine>() -> Result<usize> {
    let mut checks = 0;

    let round_keys = reference::aes128_expand_key(&[0u8; 16]);
    let ct = encrypt_block::<V>(&round_keys, &[0u8; 16]);
    expect_bytes("AES-128 zero key encrypt", &ZERO_KEY_CIPHERTEXT, &ct)?;
    let pt = decrypt_block::<V>(&round_keys, &ct);
    expect_bytes("AES-128 zero key decrypt", &[0u8; 16], &pt)?;
    checks += 2;

    let round_keys = reference::aes128_expand_key(&FIPS197_C1_KEY);
    let ct = encrypt_block::<V>(&round_keys, &FIPS197_C1_PLAINTEXT);
    expect_bytes("FIPS-197 C.1 encrypt", &FIPS197_C1_CIPHERTEXT, &ct)?;
    let pt = decrypt_block::<V>(&round_keys, &ct);
    expect_bytes("FIPS-197 C.1 decrypt", &FIPS197_C1_PLAINTEXT, &pt)?;
    checks += 2;

    // Lanes are in element order; the sigma selector counts hardware words,
    // so compare on hardware words taken from a big-endian store.
    let h: [u32; 4] = [
        SHA256_INITIAL_HASH[0],
        SHA256_INITIAL_HASH[1],
        SHA256_INITIAL_HASH[2],
        SHA256_INITIAL_HASH[3],
    ];
    let v = V::from_u32_lanes(h);
    let hw_words = hardware_words::<V>(v);
    let expected = reference::sha256_sigma_words(hw_words, SIGMA_SCHEDULE, 0);
    let actual = hardware_words::<V>(V::sha256_sigma::<SIGMA_SCHEDULE, 0, _>(v));
    expect_bytes("SHA-256 sigma0 on initial hash", &words_to_bytes(expected), &words_to_bytes(actual))?;
    let expected = reference::sha256_sigma_words(hw_words, SIGMA_COMPRESSION, 0b1010);
    let actual = hardware_words::<V>(V::sha256_sigma::<SIGMA_COMPRESSION, 0b1010, _>(v));
    expect_bytes("SHA-256 mixed Sigma", &words_to_bytes(expected), &words_to_bytes(actual))?;
    checks += 2;

    let v = V::from_u64_lanes([SHA512_INITIAL_HASH[0], SHA512_INITIAL_HASH[1]]);
    let hw_dwords = hardware_doublewords::<V>(v);
    let expected = reference::sha512_sigma_doublewords(hw_dwords, SIGMA_COMPRESSION, 0b1111);
    let actual = hardware_doublewords::<V>(V::sha512_sigma::<SIGMA_COMPRESSION, 0b1111, _>(v));
    expect_bytes("SHA-512 Sigma1 on initial hash", &dwords_to_bytes(expected), &dwords_to_bytes(actual))?;
    checks += 1;

    Ok(checks)
}

fn hardware_words<V: VectorEngine>(v: U32x4) -> [u32; 4] {
    let mut bytes = [0u8; 16];
    // SAFETY: `bytes` is 16 bytes.
    unsafe { V::store_be(v, bytes.as_mut_ptr()) };
    std::array::from_fn(|k| u32::from_be_bytes([bytes[4 * k], bytes[4 * k + 1], bytes[4 * k + 2], bytes[4 * k + 3]]))
}

fn hardware_doublewords<V: VectorEngine>(v: U64x2) -> [u64; 2] {
    let mut bytes = [0u8; 16];
    // SAFETY: `bytes` is 16 bytes.
    unsafe { V::store_be(v, bytes.as_mut_ptr()) };
    std::array::from_fn(|k| {
        let mut d = [0u8; 8];
        d.copy_from_slice(&bytes[8 * k..8 * k + 8]);
        u64::from_be_bytes(d)
    })
}

fn report<V: VectorEngine>(checks: usize) -> SelfTestReport {
    let engine = engine_description::<V>();
    log::info!("{}: {} checks passed", engine, checks);
    SelfTestReport { engine, checks }
}

/// Run the vector checks against `V`.
pub fn check_engine<V: VectorEngine>() -> Result<SelfTestReport> {
    Ok(report::<V>(run_vector_checks::<V>()?))
}

/// Run the vector and crypto checks against `V`.
pub fn check_crypto_engine<V: CryptoEngine>() -> Result<SelfTestReport> {
    let checks = run_vector_checks::<V>()? + run_crypto_checks::<V>()?;
    Ok(report::<V>(checks))
}

fn check_order<E: ByteOrder>(reports: &mut Vec<SelfTestReport>) -> Result<()> {
    reports.push(check_engine::<Altivec<E, SoftUnit>>()?);
    reports.push(check_engine::<Power7<E, SoftUnit>>()?);
    reports.push(check_crypto_engine::<Power8<E, SoftUnit>>()?);
    Ok(())
}

/// Run the suite on every tier in both byte orders on the portable unit.
pub fn run_emulated() -> Result<Vec<SelfTestReport>> {
    let mut reports = Vec::new();
    check_order::<BigEndian>(&mut reports)?;
    check_order::<LittleEndian>(&mut reports)?;
    Ok(reports)
}

/// Run the suite on the build's default engine.
#[cfg(feature = "power8")]
pub fn run_default() -> Result<SelfTestReport> {
    check_crypto_engine::<crate::simd_abstraction::DefaultEngine>()
}

/// Run the suite on the build's default engine.
#[cfg(all(feature = "altivec", not(feature = "power8")))]
pub fn run_default() -> Result<SelfTestReport> {
    check_engine::<crate::simd_abstraction::DefaultEngine>()
}

/// Run the suite on the build's default engine.
#[cfg(not(feature = "altivec"))]
pub fn run_default() -> Result<SelfTestReport> {
    Err(VectorError::TierUnavailable(crate::capability::Tier::Altivec))
}
