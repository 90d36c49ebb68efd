//! Root task capability slot layout
//!
//! Well-known capability slot indices in the root task's CSpace. Both kernel
//! bootstrap and userspace use these values.

/// Well-known capability slot indices in root task's CSpace.
#[repr(usize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Root CNode (self-reference).
    RootCNode = 0,
    /// Root TCB.
    RootTcb = 1,
    /// Root VSpace.
    RootVSpace = 2,
    /// IRQ control capability.
    IrqControl = 3,
    /// First slot free for the root task's own use.
    FirstFree = 4,
}

impl Slot {
    /// The slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
