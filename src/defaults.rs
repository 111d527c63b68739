// src/defaults.rs

// Register Geometry
pub const VECTOR_BYTES: usize = 16;
pub const VECTOR_ALIGNMENT: usize = 16;

// AES Constants
pub const AES128_KEY_BYTES: usize = 16;
pub const AES128_ROUNDS: usize = 10;
pub const AES128_ROUND_KEYS: usize = AES128_ROUNDS + 1;

// SHA-2 Initial Hash Values (FIPS 180-4, 5.3.3 and 5.3.5)
pub const SHA256_INITIAL_HASH: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];
pub const SHA512_INITIAL_HASH: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

// Sigma Selectors
pub const SIGMA_SCHEDULE: u32 = 0;
pub const SIGMA_COMPRESSION: u32 = 1;

// Self-test
pub const SELFTEST_RANDOM_ROUNDS: usize = 64;
