//! Build-time capability tiers of the vector unit.
//!
//! The tiers are selected with Cargo features (`altivec`, `power7`,
//! `power8`), each implying the ones below it. A primitive that needs a tier
//! which is not enabled simply does not exist: the engine type for that tier
//! is still nameable, but `DefaultEngine` never resolves to it and the crypto
//! primitives are only implemented for `Power8`.
//!
//! With the `power-asm` backend on a powerpc64 target the enabled tiers must
//! also be enabled as target features, which is checked at compile time.

use std::fmt;

/// Whether the baseline AltiVec tier is enabled.
pub const ALTIVEC_AVAILABLE: bool = cfg!(feature = "altivec");

/// Whether the POWER7 (VSX unaligned load/store) tier is enabled.
pub const POWER7_AVAILABLE: bool = cfg!(feature = "power7");

/// Whether the POWER8 (in-core crypto) tier is enabled.
pub const POWER8_AVAILABLE: bool = cfg!(feature = "power8");

#[cfg(all(feature = "power-asm", target_arch = "powerpc64", not(target_feature = "altivec")))]
compile_error!("the `power-asm` backend needs the `altivec` target feature");

#[cfg(all(
    feature = "power-asm",
    target_arch = "powerpc64",
    feature = "power7",
    not(target_feature = "vsx")
))]
compile_error!("the `power7` tier with `power-asm` needs the `vsx` target feature");

#[cfg(all(
    feature = "power-asm",
    target_arch = "powerpc64",
    feature = "power8",
    not(all(target_feature = "power8-vector", target_feature = "power8-crypto"))
))]
compile_error!("the `power8` tier with `power-asm` needs the `power8-vector` and `power8-crypto` target features");

/// Capability tier of the vector unit, ordered from least to most capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Baseline AltiVec: aligned loads/stores, permute, shifts, lane adds.
    Altivec,
    /// POWER7 VSX: adds unaligned loads and stores.
    Power7,
    /// POWER8: adds AES rounds and SHA-2 sigma functions.
    Power8,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Altivec, Tier::Power7, Tier::Power8];

    /// Whether this tier was enabled at build time.
    pub const fn is_available(self) -> bool {
        match self {
            Tier::Altivec => ALTIVEC_AVAILABLE,
            Tier::Power7 => POWER7_AVAILABLE,
            Tier::Power8 => POWER8_AVAILABLE,
        }
    }

    /// Highest tier enabled at build time, if any.
    pub const fn active() -> Option<Tier> {
        if POWER8_AVAILABLE {
            Some(Tier::Power8)
        } else if POWER7_AVAILABLE {
            Some(Tier::Power7)
        } else if ALTIVEC_AVAILABLE {
            Some(Tier::Altivec)
        } else {
            None
        }
    }

    /// Human-readable description of the tier.
    pub fn description(self) -> &'static str {
        match self {
            Tier::Altivec => "AltiVec (128-bit, aligned load/store)",
            Tier::Power7 => "POWER7 VSX (128-bit, unaligned load/store)",
            Tier::Power8 => "POWER8 (128-bit, AES and SHA-2 in-core crypto)",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Altivec => "altivec",
            Tier::Power7 => "power7",
            Tier::Power8 => "power8",
        };
        f.write_str(name)
    }
}

/// Whether the inline-assembly backend is compiled in.
pub const fn native_backend() -> bool {
    cfg!(all(feature = "power-asm", target_arch = "powerpc64"))
}

/// Log the enabled tiers and the backend at info level.
pub fn log_capabilities() {
    match Tier::active() {
        Some(tier) => log::info!("Vector tier: {}", tier.description()),
        None => log::warn!("No vector tier enabled; enable the `altivec`, `power7` or `power8` feature"),
    }
    let enabled: Vec<String> = Tier::ALL
        .iter()
        .filter(|t| t.is_available())
        .map(|t| t.to_string())
        .collect();
    log::info!("Enabled tiers: [{}]", enabled.join(", "));
    if native_backend() {
        log::info!("Backend: POWER inline assembly");
    } else {
        log::info!("Backend: portable instruction model");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ordered() {
        assert!(Tier::Altivec < Tier::Power7);
        assert!(Tier::Power7 < Tier::Power8);
    }

    #[test]
    fn test_tiers_imply_lower_tiers() {
        if POWER8_AVAILABLE {
            assert!(POWER7_AVAILABLE);
        }
        if POWER7_AVAILABLE {
            assert!(ALTIVEC_AVAILABLE);
        }
    }

    #[test]
    fn test_active_tier_is_highest_available() {
        let active = Tier::active();
        for tier in Tier::ALL {
            if tier.is_available() {
                assert!(active.is_some_and(|a| a >= tier));
            }
        }
        if let Some(tier) = active {
            assert!(tier.is_available());
            println!("Active tier: {} - {}", tier, tier.description());
        }
    }
}
