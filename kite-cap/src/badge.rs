//! Badge values for capability provenance
//!
//! A badge is an immutable value attached to a capability when it is minted.
//! For the IRQControl capability the badge carries no authority; it only
//! records which minting path produced the copy so that diagnostics can tell
//! copies apart.

use core::fmt;

/// A badge value for capability provenance.
///
/// A badge of zero (`Badge::NONE`) indicates an unbadged capability.
/// This is the default for original (non-minted) capabilities.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Badge(u64);

impl Badge {
    /// No badge (unbadged capability).
    pub const NONE: Self = Self(0);

    /// Create a new badge with the given value.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw badge value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Check if this is an unbadged capability (badge is zero).
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Badge::NONE")
        } else {
            write!(f, "Badge({:#018x})", self.0)
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}
