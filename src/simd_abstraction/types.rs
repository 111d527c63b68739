//! Register type model
//!
//! `Vector128` is one 128-bit vector register. It is stored as its hardware
//! image: byte 0 is the most significant byte, i.e. the leftmost byte of the
//! register in the POWER ISA's numbering. This is also exactly the memory order
//! a forced big-endian load produces, whatever the processor's byte order.
//!
//! - `U8x16`, `U16x8`, `U32x4` and `U64x2` are transparent views of the same 16
//!   bytes. Converting between them (or to and from `Vector128`) is a plain
//!   bitcast; only the lane width used by lane-wise arithmetic changes.
//! - Lane *numbering* depends on the processor byte order and therefore lives
//!   in `byte_order`, not here. Hardware words and doublewords used by the
//!   instruction emulation are always counted from the left.

use std::fmt;

/// One 128-bit vector register.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C, align(16))]
pub struct Vector128 {
    hw: [u8; 16],
}

impl Vector128 {
    /// All bits clear.
    pub const ZERO: Self = Self { hw: [0; 16] };
    /// All bits set.
    pub const ALL_ONES: Self = Self { hw: [0xFF; 16] };

    /// Build a register from its hardware image (most significant byte first).
    #[inline]
    pub const fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self { hw: bytes }
    }

    /// The hardware image of the register (most significant byte first).
    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 16] {
        self.hw
    }

    #[inline]
    pub const fn from_u128(value: u128) -> Self {
        Self::from_be_bytes(value.to_be_bytes())
    }

    #[inline]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.hw)
    }

    /// Hardware word `k` (counted from the left), as the ISA reads it.
    #[inline]
    pub(crate) fn word(self, k: usize) -> u32 {
        let b = &self.hw[4 * k..4 * k + 4];
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }

    #[inline]
    pub(crate) fn from_words(words: [u32; 4]) -> Self {
        let mut hw = [0u8; 16];
        for (chunk, w) in hw.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&w.to_be_bytes());
        }
        Self { hw }
    }

    /// Hardware doubleword `k` (counted from the left).
    #[inline]
    pub(crate) fn doubleword(self, k: usize) -> u64 {
        let mut b = [0u8; 8];
        b.copy_from_slice(&self.hw[8 * k..8 * k + 8]);
        u64::from_be_bytes(b)
    }

    #[inline]
    pub(crate) fn from_doublewords(dwords: [u64; 2]) -> Self {
        let mut hw = [0u8; 16];
        hw[..8].copy_from_slice(&dwords[0].to_be_bytes());
        hw[8..].copy_from_slice(&dwords[1].to_be_bytes());
        Self { hw }
    }
}

impl fmt::Debug for Vector128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector128(")?;
        for (i, chunk) in self.hw.chunks_exact(4).enumerate() {
            if i > 0 {
                write!(f, "_")?;
            }
            for b in chunk {
                write!(f, "{b:02x}")?;
            }
        }
        write!(f, ")")
    }
}

impl From<u128> for Vector128 {
    #[inline]
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Vector128> for u128 {
    #[inline]
    fn from(v: Vector128) -> Self {
        v.to_u128()
    }
}

/// Lane width under which lane-wise arithmetic is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneWidth {
    W8,
    W16,
    W32,
    W64,
}

impl LaneWidth {
    /// Lane size in bytes.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            LaneWidth::W8 => 1,
            LaneWidth::W16 => 2,
            LaneWidth::W32 => 4,
            LaneWidth::W64 => 8,
        }
    }
}

/// A typed view of a `Vector128`.
///
/// Every view converts to and from `Vector128` (and, through `From`, to every
/// other view) without moving any bytes.
pub trait VectorLanes:
    Copy + From<Vector128> + Into<Vector128> + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Lane width of this view.
    const WIDTH: LaneWidth;
    /// Number of lanes in this view.
    const LANES: usize = 16 / Self::WIDTH.bytes();

    /// Reinterpret the same bits under another view.
    #[inline]
    fn reinterpret<T: VectorLanes>(self) -> T {
        T::from(self.into())
    }
}

macro_rules! lane_view {
    ($name:ident, $width:expr, $label:literal) => {
        #[doc = concat!("`Vector128` viewed as ", $label, ".")]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub Vector128);

        impl From<Vector128> for $name {
            #[inline]
            fn from(v: Vector128) -> Self {
                Self(v)
            }
        }

        impl From<$name> for Vector128 {
            #[inline]
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl VectorLanes for $name {
            const WIDTH: LaneWidth = $width;
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }
    };
}

lane_view!(U8x16, LaneWidth::W8, "16 lanes of u8");
lane_view!(U16x8, LaneWidth::W16, "8 lanes of u16");
lane_view!(U32x4, LaneWidth::W32, "4 lanes of u32");
lane_view!(U64x2, LaneWidth::W64, "2 lanes of u64");

macro_rules! lane_casts {
    ($($from:ident => $($to:ident),+);+ $(;)?) => {
        $($(
            impl From<$from> for $to {
                #[inline]
                fn from(v: $from) -> Self {
                    Self(v.0)
                }
            }
        )+)+
    };
}

lane_casts! {
    U8x16 => U16x8, U32x4, U64x2;
    U16x8 => U8x16, U32x4, U64x2;
    U32x4 => U8x16, U16x8, U64x2;
    U64x2 => U8x16, U16x8, U32x4;
}
