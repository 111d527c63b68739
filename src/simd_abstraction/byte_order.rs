//! Processor byte order
//!
//! POWER runs in either byte order, and the vector unit numbers its elements
//! differently in each: on big endian element `i` is hardware byte `i`, on
//! little endian it is hardware byte `15 - i`. Everything that is expressed in
//! elements (mask indices, lane values, native loads and stores) goes through a
//! `ByteOrder` so the engines can be instantiated for either order on any host.
//!
//! The order is a type parameter, never a runtime value. `NativeEndian` is the
//! order of the compilation target.

use std::fmt;

use super::types::Vector128;

macro_rules! lane_codec {
    ($from:ident, $to:ident, $ty:ty, $n:expr) => {
        /// Register whose element-order lanes are `lanes`.
        #[inline]
        fn $from(lanes: [$ty; $n]) -> Vector128 {
            const W: usize = core::mem::size_of::<$ty>();
            let mut elements = [0u8; 16];
            for (chunk, lane) in elements.chunks_exact_mut(W).zip(lanes) {
                if Self::BIG_ENDIAN {
                    chunk.copy_from_slice(&lane.to_be_bytes());
                } else {
                    chunk.copy_from_slice(&lane.to_le_bytes());
                }
            }
            Self::from_elements(elements)
        }

        /// Element-order lanes of `v`.
        #[inline]
        fn $to(v: Vector128) -> [$ty; $n] {
            const W: usize = core::mem::size_of::<$ty>();
            let elements = Self::to_elements(v);
            let mut lanes = [0 as $ty; $n];
            for (lane, chunk) in lanes.iter_mut().zip(elements.chunks_exact(W)) {
                let mut raw = [0u8; W];
                raw.copy_from_slice(chunk);
                *lane = if Self::BIG_ENDIAN {
                    <$ty>::from_be_bytes(raw)
                } else {
                    <$ty>::from_le_bytes(raw)
                };
            }
            lanes
        }
    };
}

/// Byte order of the modeled processor.
pub trait ByteOrder: Copy + Default + fmt::Debug + Send + Sync + 'static {
    const BIG_ENDIAN: bool;
    const NAME: &'static str;

    /// Register whose element `i` is `elements[i]`.
    #[inline]
    fn from_elements(elements: [u8; 16]) -> Vector128 {
        if Self::BIG_ENDIAN {
            Vector128::from_be_bytes(elements)
        } else {
            let mut hw = elements;
            hw.reverse();
            Vector128::from_be_bytes(hw)
        }
    }

    /// Elements of `v` in processor order.
    #[inline]
    fn to_elements(v: Vector128) -> [u8; 16] {
        let mut elements = v.to_be_bytes();
        if !Self::BIG_ENDIAN {
            elements.reverse();
        }
        elements
    }

    lane_codec!(from_u16_lanes, lanes_u16, u16, 8);
    lane_codec!(from_u32_lanes, lanes_u32, u32, 4);
    lane_codec!(from_u64_lanes, lanes_u64, u64, 2);
}

/// Big-endian processor mode (element 0 is the leftmost byte).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BigEndian;

/// Little-endian processor mode (element 0 is the rightmost byte).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LittleEndian;

impl ByteOrder for BigEndian {
    const BIG_ENDIAN: bool = true;
    const NAME: &'static str = "big-endian";
}

impl ByteOrder for LittleEndian {
    const BIG_ENDIAN: bool = false;
    const NAME: &'static str = "little-endian";
}

/// Byte order of the compilation target.
#[cfg(target_endian = "big")]
pub type NativeEndian = BigEndian;

/// Byte order of the compilation target.
#[cfg(target_endian = "little")]
pub type NativeEndian = LittleEndian;
