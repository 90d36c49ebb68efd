//! Interrupt identity model
//!
//! The IRQ capabilities all name interrupts through the types in this
//! module:
//!
//! - **IrqIdentity**: an interrupt as the kernel sees it (number + owning core)
//! - **IrqClass**: SGI, PPI or SPI, derived from the number
//! - **Trigger**: edge or level sensitivity of a line
//!
//! # GIC Interrupt Ranges
//!
//! ```text
//! 0..16     SGI  software generated, banked per core
//! 16..32    PPI  private peripheral, banked per core
//! 32..1020  SPI  shared peripheral, routed by the distributor
//! ```

use core::fmt;

/// IRQ number type.
pub type IrqNumber = u32;

/// Core (node) index type.
pub type CoreId = u8;

/// Number of software-generated interrupts.
pub const NUM_SGIS: IrqNumber = 16;

/// Number of banked (per-core) interrupts: SGIs followed by PPIs.
pub const NUM_PRIVATE_IRQS: IrqNumber = 32;

/// First shared peripheral interrupt.
pub const SPI_BASE: IrqNumber = NUM_PRIVATE_IRQS;

/// Largest architecturally valid INTID (1020-1023 are special).
pub const MAX_IRQ: IrqNumber = 1019;

/// Maximum number of cores (nodes) a kernel instance can span.
pub const MAX_NODES: usize = 8;

/// Interrupt class, derived from the interrupt number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IrqClass {
    /// Software-generated interrupt (core-to-core).
    SoftwareGenerated,
    /// Private peripheral interrupt, meaningful to one core only.
    PrivatePeripheral,
    /// Shared peripheral interrupt, routable to any core.
    SharedPeripheral,
}

impl IrqClass {
    /// Classify a raw interrupt number.
    #[inline]
    #[must_use]
    pub const fn of(irq: IrqNumber) -> Self {
        if irq < NUM_SGIS {
            Self::SoftwareGenerated
        } else if irq < NUM_PRIVATE_IRQS {
            Self::PrivatePeripheral
        } else {
            Self::SharedPeripheral
        }
    }

    /// Whether interrupts of this class are banked per core.
    #[inline]
    #[must_use]
    pub const fn is_private(self) -> bool {
        !matches!(self, Self::SharedPeripheral)
    }
}

/// An interrupt source as perceived by the kernel.
///
/// Two identities are equal iff both the number and the owning core match.
/// Builds without per-core interrupt ownership always use core 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct IrqIdentity {
    /// Hardware interrupt number (INTID).
    pub irq: IrqNumber,
    /// Owning core.
    pub core: CoreId,
}

impl IrqIdentity {
    /// Identity of an interrupt owned by a specific core.
    #[inline]
    #[must_use]
    pub const fn new(irq: IrqNumber, core: CoreId) -> Self {
        Self { irq, core }
    }

    /// Identity on a build where the local core is implicit.
    #[inline]
    #[must_use]
    pub const fn local(irq: IrqNumber) -> Self {
        Self { irq, core: 0 }
    }

    /// The interrupt class.
    #[inline]
    #[must_use]
    pub const fn class(self) -> IrqClass {
        IrqClass::of(self.irq)
    }

    /// Whether this is a banked (SGI or PPI) interrupt.
    #[inline]
    #[must_use]
    pub const fn is_private(self) -> bool {
        self.class().is_private()
    }
}

impl fmt::Display for IrqIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IRQ {} (core {})", self.irq, self.core)
    }
}

/// Trigger mode of an interrupt line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Trigger {
    /// Level-sensitive.
    Level = 0,
    /// Edge-triggered.
    Edge = 1,
}

impl Trigger {
    /// Decode from an argument word: zero is level, anything else is edge.
    #[inline]
    #[must_use]
    pub const fn from_word(word: u64) -> Self {
        if word != 0 { Self::Edge } else { Self::Level }
    }

    /// Whether this is edge-triggered.
    #[inline]
    #[must_use]
    pub const fn is_edge(self) -> bool {
        matches!(self, Self::Edge)
    }
}

/// Registry state of an interrupt identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum IrqState {
    /// No handler capability is outstanding.
    #[default]
    Inactive = 0,
    /// A handler capability is outstanding; revoke it before reissuing.
    Active = 1,
}
