//! Platform description
//!
//! The facts about the interrupt controller that invocation decoding needs.
//! A board either supplies them directly or has them read from the
//! distributor's type register at init.

use kite_cap::objects::irq::{IrqNumber, MAX_IRQ};

/// Number of CPU interfaces a GICv2 distributor can route to.
pub const GICV2_MAX_CPU_INTERFACES: u8 = 8;

/// Interrupt controller description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Highest valid interrupt number.
    pub max_irq: IrqNumber,
    /// Whether the controller can program edge/level sensitivity.
    pub trigger_support: bool,
    /// Number of CPU interfaces implemented.
    pub cpu_interfaces: u8,
}

impl PlatformInfo {
    /// Description of a fully populated GICv2.
    pub const GICV2_DEFAULT: Self = Self {
        max_irq: MAX_IRQ,
        trigger_support: true,
        cpu_interfaces: GICV2_MAX_CPU_INTERFACES,
    };

    /// Decode the ITLinesNumber and CPUNumber fields of GICD_TYPER.
    ///
    /// ITLinesNumber `N` means the distributor implements `32 * (N + 1)`
    /// interrupt IDs, capped at the architectural limit of 1020.
    #[must_use]
    pub const fn from_typer(it_lines: u32, cpu_number: u32) -> Self {
        let lines = 32 * (it_lines + 1);
        let max_irq = if lines - 1 > MAX_IRQ { MAX_IRQ } else { lines - 1 };
        Self {
            max_irq,
            trigger_support: true,
            cpu_interfaces: (cpu_number as u8 & 0x7) + 1,
        }
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self::GICV2_DEFAULT
    }
}
