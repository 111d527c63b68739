// Enable unstable features for the POWER inline-assembly backend (requires nightly Rust)
#![cfg_attr(all(feature = "power-asm", target_arch = "powerpc64"), feature(asm_experimental_arch))]
#![cfg_attr(all(feature = "power-asm", target_arch = "powerpc64"), feature(portable_simd))]
#![cfg_attr(all(feature = "power-asm", target_arch = "powerpc64"), feature(powerpc_target_feature))]

pub mod capability; // Build-time capability tiers
pub mod defaults;
pub mod error;
pub mod reference; // Scalar reference functions for the vector primitives
pub mod selftest; // Known-answer checks run by the CLI
pub mod simd_abstraction;
pub mod utils;

pub use capability::Tier;
pub use error::{Result, VectorError};
#[cfg(feature = "altivec")]
pub use simd_abstraction::DefaultEngine;
pub use simd_abstraction::{
    Altivec, BigEndian, ByteOrder, CryptoEngine, LittleEndian, NativeEndian, Power7, Power8, U8x16,
    U16x8, U32x4, U64x2, Vector128, VectorEngine, VectorLanes,
};
