//! CNode - Capability Node container
//!
//! A CNode is a table of capability slots, addressed by index. CNodes
//! form the hierarchical capability space (CSpace) structure, where
//! CNodes can reference other CNodes.
//!
//! # Addressing
//!
//! CNode capabilities carry a guard: a sequence of bits that must match in
//! the CPtr before the index is extracted. This allows skipping levels in
//! the hierarchy when the CPtr structure is known.
//!
//! # Collaborator Interface
//!
//! [`CNodeOps`] is the contract between the invocation decoders and the
//! kernel's slot storage: resolve a destination, check it is empty, and
//! insert a freshly derived capability into it.

use core::fmt;

use crate::cap::Cap;
use crate::cptr::CPtr;
use crate::error::CapResult;
use crate::slot::SlotRef;

/// CNode radix type.
///
/// The radix determines the number of slots in the CNode:
/// - `radix = 1`: 2 slots
/// - `radix = 8`: 256 slots
/// - `radix = 12`: 4096 slots
pub type CNodeRadix = u8;

/// Minimum CNode radix (2^1 = 2 slots).
pub const MIN_CNODE_RADIX: CNodeRadix = 1;

/// Maximum CNode radix (2^12 = 4096 slots).
pub const MAX_CNODE_RADIX: CNodeRadix = 12;

/// Maximum guard size in bits.
pub const MAX_GUARD_BITS: u8 = 58;

/// Kernel identifier of a CNode object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CNodeId(u32);

impl CNodeId {
    /// Create an identifier from a storage index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// The storage index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Guard value for CPtr resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct CNodeGuard {
    /// The guard value to match.
    pub value: u64,
    /// Number of bits in the guard (0-58).
    pub bits: u8,
}

impl CNodeGuard {
    /// No guard (matches everything, consumes no bits).
    pub const NONE: Self = Self { value: 0, bits: 0 };

    /// Try to create a new guard, returning None if bits is too large.
    ///
    /// Only the low `bits` bits of `value` are kept.
    #[inline]
    #[must_use]
    pub const fn try_new(value: u64, bits: u8) -> Option<Self> {
        if bits > MAX_GUARD_BITS {
            return None;
        }
        let mask = if bits == 0 { 0 } else { (1u64 << bits) - 1 };
        Some(Self {
            value: value & mask,
            bits,
        })
    }

    /// Check if a CPtr matches this guard with `remaining` bits unresolved.
    #[inline]
    #[must_use]
    pub const fn matches(&self, cptr: CPtr, remaining: u8) -> bool {
        if self.bits == 0 {
            return true;
        }
        if self.bits > remaining {
            return false;
        }
        cptr.bits_at(remaining, self.bits) == self.value
    }

    /// Check if this is an empty guard (no bits).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl fmt::Display for CNodeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "no guard")
        } else {
            write!(f, "guard({:#x}, {} bits)", self.value, self.bits)
        }
    }
}

/// Slot operations the invocation decoders depend on.
///
/// The kernel implements this over its CNode storage. Callers hold the
/// kernel lock protecting that storage for the duration of a decode, which
/// is why mutation takes `&mut self`.
pub trait CNodeOps {
    /// Resolve the slot addressed by `index` at `depth` bits, starting from
    /// the CNode capability `root`.
    ///
    /// # Errors
    ///
    /// - `InvalidRoot` if `root` is not a CNode capability
    /// - `InvalidDepth` if `depth` is outside `1..=64`
    /// - `GuardMismatch` / `DepthMismatch` if resolution fails part way
    fn lookup_target_slot(&self, root: &Cap, index: u64, depth: u64) -> CapResult<SlotRef>;

    /// Require that `slot` holds no capability.
    ///
    /// # Errors
    ///
    /// `SlotOccupied` if the slot holds a capability.
    fn ensure_empty(&self, slot: SlotRef) -> CapResult<()>;

    /// Insert `cap` into `dest`, recording `src` as its derivation parent.
    ///
    /// # Errors
    ///
    /// Implementations report storage failures; `dest` is left untouched
    /// when an error is returned.
    fn insert(&mut self, cap: Cap, src: SlotRef, dest: SlotRef) -> CapResult<()>;
}
