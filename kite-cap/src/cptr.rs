//! Capability pointer (CPtr) addressing
//!
//! A CPtr addresses a capability slot within a CSpace through a hierarchical
//! path of CNode indices. Only the low `depth` bits of the CPtr are
//! significant; they are consumed from the most significant end, one CNode
//! level (guard bits then index bits) at a time.
//!
//! # Structure
//!
//! For a two-level CSpace resolved at depth 16:
//!
//! ```text
//! bit 15                         bit 0
//! | guard0 | index0 | guard1 | index1 |
//! ```

use core::fmt;

/// Capability pointer - addresses a slot in the CSpace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CPtr(u64);

impl CPtr {
    /// Create a CPtr from a raw value.
    #[inline]
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw CPtr value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Check if this is a null CPtr.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Extract `width` bits that sit directly below the `remaining`
    /// still-unresolved low bits.
    ///
    /// With `remaining = 12` and `width = 4`, this returns bits `[11:8]`.
    /// Callers must ensure `width <= remaining <= 64`.
    #[inline]
    #[must_use]
    pub const fn bits_at(self, remaining: u8, width: u8) -> u64 {
        if width == 0 {
            return 0;
        }
        let shift = remaining - width;
        let value = if shift >= 64 { 0 } else { self.0 >> shift };
        value & mask(width)
    }
}

/// Mask of the low `bits` bits.
#[inline]
const fn mask(bits: u8) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

impl fmt::Debug for CPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPtr({:#x})", self.0)
    }
}

impl fmt::Display for CPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

/// CPtr depth - tracks how many significant bits are still unresolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CptrDepth {
    bits_remaining: u8,
}

impl CptrDepth {
    /// Maximum resolution depth (a full machine word).
    pub const MAX_BITS: u8 = 64;

    /// Create a depth tracker with `bits` significant bits.
    ///
    /// Returns `None` if `bits` is zero or wider than a machine word.
    #[inline]
    #[must_use]
    pub const fn new(bits: u64) -> Option<Self> {
        if bits == 0 || bits > Self::MAX_BITS as u64 {
            None
        } else {
            Some(Self {
                bits_remaining: bits as u8,
            })
        }
    }

    /// Number of bits still to be resolved.
    #[inline]
    #[must_use]
    pub const fn bits_remaining(self) -> u8 {
        self.bits_remaining
    }

    /// Check if all bits have been consumed.
    #[inline]
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.bits_remaining == 0
    }

    /// Check if there are enough bits remaining for the given guard and radix.
    #[inline]
    #[must_use]
    pub const fn has_room(self, guard_bits: u8, radix: u8) -> bool {
        (guard_bits as u16 + radix as u16) <= self.bits_remaining as u16
    }

    /// Consume one CNode level.
    #[inline]
    #[must_use]
    pub const fn consume(self, guard_bits: u8, radix: u8) -> Self {
        Self {
            bits_remaining: self.bits_remaining.saturating_sub(guard_bits.saturating_add(radix)),
        }
    }
}
