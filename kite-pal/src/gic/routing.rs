//! Cross-instance interrupt routing
//!
//! In a multikernel system each kernel instance drives its own CPU interface
//! but all instances share one distributor. [`TargetRouting`] is the narrow
//! view an instance gets of that shared state: it can read its own
//! interface mask, read where a shared interrupt currently goes, and hand
//! the interrupt to another interface.
//!
//! Nothing here is synchronised with the other instances. A read followed by
//! a write can interleave with another instance's write to the same target
//! byte; the last writer wins.

use core::fmt;

use kite_cap::objects::irq::IrqNumber;

use super::{GicError, InterruptController};

/// One bit per CPU interface, as stored in GICD_ITARGETSR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct TargetMask(u8);

impl TargetMask {
    /// Mask with no interfaces.
    pub const EMPTY: Self = Self(0);

    /// Wrap a raw target byte.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Mask naming only `interface`.
    #[inline]
    #[must_use]
    pub const fn single(interface: u8) -> Option<Self> {
        if interface >= 8 {
            None
        } else {
            Some(Self(1 << interface))
        }
    }

    /// The raw target byte.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, interface: u8) -> bool {
        interface < 8 && self.0 & (1 << interface) != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TargetMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Weakly consistent handle on the shared routing table.
pub struct TargetRouting<'a, C: InterruptController + ?Sized> {
    ctrl: &'a C,
}

impl<'a, C: InterruptController + ?Sized> TargetRouting<'a, C> {
    pub fn new(ctrl: &'a C) -> Self {
        Self { ctrl }
    }

    /// This instance's own CPU interface mask.
    pub fn own_mask(&self) -> Result<TargetMask, GicError> {
        self.ctrl.self_target()
    }

    /// Where `irq` is routed right now.
    pub fn current_mask(&self, irq: IrqNumber) -> Result<TargetMask, GicError> {
        self.ctrl.get_target(irq)
    }

    /// Whether `irq` is currently routed to exactly this instance.
    pub fn owns(&self, irq: IrqNumber) -> Result<bool, GicError> {
        Ok(self.own_mask()? == self.current_mask(irq)?)
    }

    /// Route `irq` to CPU interface `interface`.
    pub fn retarget(&self, irq: IrqNumber, interface: u8) -> Result<(), GicError> {
        self.ctrl.set_target(irq, interface)
    }
}
