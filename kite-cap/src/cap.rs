//! Capability kinds
//!
//! [`Cap`] is a closed tagged union: every capability kind the kernel knows
//! about is a variant, and invocation dispatch matches it exhaustively, so a
//! new kind cannot be added without giving it a decoder.

use core::fmt;

use crate::Badge;
use crate::cnode::{CNodeGuard, CNodeId, CNodeRadix};
use crate::objects::irq::{IrqIdentity, IrqNumber, Trigger};

/// A capability as stored in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cap {
    /// No capability.
    #[default]
    Null,

    /// A CNode: a table of `2^radix` slots.
    CNode {
        /// Kernel identifier of the CNode.
        id: CNodeId,
        /// Log2 of the number of slots.
        radix: CNodeRadix,
        /// Guard checked during CPtr resolution.
        guard: CNodeGuard,
    },

    /// Authority to create interrupt capabilities.
    ///
    /// Carries no interrupt state; the badge only records provenance.
    IrqControl {
        /// Provenance tag.
        badge: Badge,
    },

    /// Authority over one interrupt identity.
    IrqHandler {
        /// The interrupt this handler receives.
        irq: IrqIdentity,
        /// Trigger mode programmed at issue time, if any.
        trigger: Option<Trigger>,
    },

    /// Authority to send one software-generated interrupt.
    SgiSignal {
        /// SGI number (`< NUM_SGIS`).
        irq: IrqNumber,
        /// Platform target encoding, validated at issue time.
        target: u64,
    },
}

impl Cap {
    /// Check if this is the null capability.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Human-readable kind name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::CNode { .. } => "CNode",
            Self::IrqControl { .. } => "IRQControl",
            Self::IrqHandler { .. } => "IRQHandler",
            Self::SgiSignal { .. } => "SGISignal",
        }
    }

    /// The interrupt identity of an IRQHandler capability.
    #[inline]
    #[must_use]
    pub const fn irq_handler_identity(&self) -> Option<IrqIdentity> {
        match self {
            Self::IrqHandler { irq, .. } => Some(*irq),
            _ => None,
        }
    }
}

impl fmt::Display for Cap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::CNode { id, radix, guard } => {
                write!(f, "CNode({}, radix {}, {})", id.index(), radix, guard)
            }
            Self::IrqControl { badge } => write!(f, "IRQControl(badge {})", badge),
            Self::IrqHandler { irq, trigger } => match trigger {
                Some(t) => write!(f, "IRQHandler({}, {:?})", irq, t),
                None => write!(f, "IRQHandler({})", irq),
            },
            Self::SgiSignal { irq, target } => {
                write!(f, "SGISignal(SGI {}, target {:#x})", irq, target)
            }
        }
    }
}
