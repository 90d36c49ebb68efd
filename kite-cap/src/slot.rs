//! Capability slots
//!
//! A slot (CTE) is a node in the capability derivation tree holding zero or
//! one capability. Insertion records the slot the new capability was derived
//! from so revocation can later find it.

use crate::cap::Cap;
use crate::cnode::CNodeId;

/// Address of a slot: the CNode that holds it and its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotRef {
    /// CNode containing the slot.
    pub cnode: CNodeId,
    /// Index within the CNode.
    pub index: usize,
}

impl SlotRef {
    /// Create a slot reference.
    #[inline]
    #[must_use]
    pub const fn new(cnode: CNodeId, index: usize) -> Self {
        Self { cnode, index }
    }
}

/// Storage for one capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapSlot {
    /// The capability held, `Cap::Null` when empty.
    pub cap: Cap,
    /// Slot this capability was derived from.
    pub parent: Option<SlotRef>,
}

impl CapSlot {
    /// An empty slot.
    pub const EMPTY: Self = Self {
        cap: Cap::Null,
        parent: None,
    };

    /// Check if the slot holds no capability.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cap.is_null()
    }

    /// Fill the slot with a derived capability.
    #[inline]
    pub fn set(&mut self, cap: Cap, parent: SlotRef) {
        self.cap = cap;
        self.parent = Some(parent);
    }

    /// Empty the slot, returning what it held.
    #[inline]
    pub fn take(&mut self) -> Cap {
        self.parent = None;
        core::mem::take(&mut self.cap)
    }
}
