//! CSpace storage and resolution
//!
//! Implements seL4-style hierarchical CPtr resolution through CNode guards.
//! A CPtr is a 64-bit value interpreted as concatenated indices through a
//! CNode hierarchy; only the low `depth` bits take part.
//!
//! # Resolution Algorithm
//!
//! 1. Start at the root CNode capability
//! 2. At each CNode:
//!    - Check the guard matches the next guard bits of the CPtr
//!    - Fail with a depth mismatch if the level needs more bits than remain
//!    - Extract the index bits and find the slot
//! 3. If exactly the level's bits remained, the slot is the result
//! 4. Otherwise the slot must hold a CNode capability; descend into it

use alloc::vec::Vec;

use kite_cap::root_slots::Slot;
use kite_cap::{
    Badge, CNodeGuard, CNodeId, CNodeOps, CNodeRadix, CPtr, Cap, CapError, CapResult, CapSlot,
    CptrDepth, MAX_CNODE_RADIX, MIN_CNODE_RADIX, SlotRef,
};

/// Backing storage for one CNode.
struct CNodeStorage {
    slots: Vec<CapSlot>,
}

impl CNodeStorage {
    fn new(radix: CNodeRadix) -> Self {
        let mut slots = Vec::new();
        slots.resize(1usize << radix, CapSlot::EMPTY);
        Self { slots }
    }
}

/// All CNodes known to the kernel.
#[derive(Default)]
pub struct CSpace {
    cnodes: Vec<CNodeStorage>,
}

impl CSpace {
    pub fn new() -> Self {
        Self { cnodes: Vec::new() }
    }

    /// Allocate a CNode with `1 << radix` slots and return a capability to it.
    pub fn create_cnode(&mut self, radix: CNodeRadix, guard: CNodeGuard) -> CapResult<Cap> {
        if !(MIN_CNODE_RADIX..=MAX_CNODE_RADIX).contains(&radix) {
            return Err(CapError::InvalidIndex);
        }
        let id = CNodeId::from_index(self.cnodes.len() as u32);
        self.cnodes.push(CNodeStorage::new(radix));
        Ok(Cap::CNode { id, radix, guard })
    }

    /// Build the root task's CSpace.
    ///
    /// The root CNode holds a capability to itself and the IRQControl
    /// capability at their well-known slots.
    pub fn bootstrap(radix: CNodeRadix, guard: CNodeGuard) -> CapResult<(Self, Cap)> {
        let mut cspace = Self::new();
        let root = cspace.create_cnode(radix, guard)?;
        let Cap::CNode { id, .. } = root else {
            return Err(CapError::InvalidRoot);
        };
        cspace.slot_mut(SlotRef::new(id, Slot::RootCNode.index()))?.cap = root;
        cspace.slot_mut(SlotRef::new(id, Slot::IrqControl.index()))?.cap =
            Cap::IrqControl { badge: Badge::NONE };
        log::trace!("cspace: root CNode {} with {} slots", id.index(), 1usize << radix);
        Ok((cspace, root))
    }

    pub fn slot(&self, at: SlotRef) -> CapResult<&CapSlot> {
        self.cnodes
            .get(at.cnode.index() as usize)
            .ok_or(CapError::ObjectNotFound)?
            .slots
            .get(at.index)
            .ok_or(CapError::InvalidIndex)
    }

    fn slot_mut(&mut self, at: SlotRef) -> CapResult<&mut CapSlot> {
        self.cnodes
            .get_mut(at.cnode.index() as usize)
            .ok_or(CapError::ObjectNotFound)?
            .slots
            .get_mut(at.index)
            .ok_or(CapError::InvalidIndex)
    }

    /// The capability held at `at`, `Cap::Null` if empty.
    pub fn cap_at(&self, at: SlotRef) -> CapResult<Cap> {
        Ok(self.slot(at)?.cap)
    }

    /// Empty a slot and return what it held.
    pub fn delete(&mut self, at: SlotRef) -> CapResult<Cap> {
        let slot = self.slot_mut(at)?;
        if slot.is_empty() {
            return Err(CapError::EmptySlot);
        }
        Ok(slot.take())
    }

    /// Resolve `cptr` through the CNode tree rooted at `root`.
    pub fn resolve(&self, root: &Cap, cptr: CPtr, depth: CptrDepth) -> CapResult<SlotRef> {
        let Cap::CNode {
            mut id,
            mut radix,
            mut guard,
        } = *root
        else {
            return Err(CapError::InvalidRoot);
        };
        let mut depth = depth;

        loop {
            let remaining = depth.bits_remaining();
            if !guard.matches(cptr, remaining) {
                return Err(CapError::GuardMismatch);
            }
            if !depth.has_room(guard.bits, radix) {
                return Err(CapError::DepthMismatch);
            }

            let index = cptr.bits_at(remaining - guard.bits, radix) as usize;
            let at = SlotRef::new(id, index);
            depth = depth.consume(guard.bits, radix);
            if depth.is_complete() {
                return Ok(at);
            }

            match self.slot(at)?.cap {
                Cap::CNode {
                    id: next,
                    radix: next_radix,
                    guard: next_guard,
                } => {
                    id = next;
                    radix = next_radix;
                    guard = next_guard;
                }
                _ => return Err(CapError::DepthMismatch),
            }
        }
    }
}

impl CNodeOps for CSpace {
    fn lookup_target_slot(&self, root: &Cap, index: u64, depth: u64) -> CapResult<SlotRef> {
        if !matches!(root, Cap::CNode { .. }) {
            return Err(CapError::InvalidRoot);
        }
        let depth = CptrDepth::new(depth).ok_or(CapError::InvalidDepth)?;
        self.resolve(root, CPtr::from_raw(index), depth)
    }

    fn ensure_empty(&self, slot: SlotRef) -> CapResult<()> {
        if self.slot(slot)?.is_empty() {
            Ok(())
        } else {
            Err(CapError::SlotOccupied)
        }
    }

    fn insert(&mut self, cap: Cap, src: SlotRef, dest: SlotRef) -> CapResult<()> {
        self.slot(src)?;
        let slot = self.slot_mut(dest)?;
        if !slot.is_empty() {
            return Err(CapError::SlotOccupied);
        }
        slot.set(cap, src);
        Ok(())
    }
}
