//! GIC (Generic Interrupt Controller) Management
//!
//! The kernel talks to the interrupt controller only through
//! [`InterruptController`]. The trait covers what capability invocation
//! needs from the hardware: range-checking interrupt numbers, programming
//! trigger sensitivity, routing shared interrupts between CPU interfaces
//! and raising software-generated interrupts.
//!
//! Individual register accesses are single volatile loads and stores and are
//! treated as atomic; the trait performs no locking of its own.

mod registers;
mod routing;
mod v2;

use core::fmt;

use kite_cap::objects::irq::{CoreId, IrqNumber, Trigger};

use crate::platform::PlatformInfo;

pub use registers::{GICD_SGIR, GICD_TYPER, GicdRegisters};
pub use routing::{TargetMask, TargetRouting};
pub use v2::GicV2Distributor;

/// Interrupt controller errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GicError {
    /// Interrupt number outside the closed range `min..=max`.
    IrqOutOfRange { min: u64, max: u64 },
    /// The controller cannot program trigger sensitivity.
    TriggerUnsupported,
    /// Routing requested for an interrupt that is banked per core.
    NotShared(IrqNumber),
    /// No such CPU interface.
    TargetOutOfRange(u64),
}

impl GicError {
    /// Short description for log messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IrqOutOfRange { .. } => "interrupt number out of range",
            Self::TriggerUnsupported => "trigger configuration not supported",
            Self::NotShared(_) => "interrupt is not a shared peripheral interrupt",
            Self::TargetOutOfRange(_) => "no such CPU interface",
        }
    }
}

impl fmt::Display for GicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IrqOutOfRange { min, max } => {
                write!(f, "{} ({}..={})", self.as_str(), min, max)
            }
            Self::NotShared(irq) => write!(f, "{} (IRQ {})", self.as_str(), irq),
            Self::TargetOutOfRange(target) => write!(f, "{} ({})", self.as_str(), target),
            Self::TriggerUnsupported => f.write_str(self.as_str()),
        }
    }
}

/// Platform interrupt driver.
pub trait InterruptController {
    /// Static description of the controller.
    fn info(&self) -> &PlatformInfo;

    /// Check a raw interrupt number against the platform limit.
    fn check_irq(&self, raw: u64) -> Result<IrqNumber, GicError> {
        let max = u64::from(self.info().max_irq);
        if raw > max {
            return Err(GicError::IrqOutOfRange { min: 0, max });
        }
        Ok(raw as IrqNumber)
    }

    /// Whether [`set_trigger`](Self::set_trigger) is available.
    fn supports_trigger(&self) -> bool {
        self.info().trigger_support
    }

    /// Program edge or level sensitivity for `irq`.
    fn set_trigger(&self, irq: IrqNumber, trigger: Trigger) -> Result<(), GicError> {
        let _ = (irq, trigger);
        Err(GicError::TriggerUnsupported)
    }

    /// Whether `target` names a CPU interface an SGI can be sent to.
    fn sgi_target_valid(&self, target: u64) -> bool {
        target < u64::from(self.info().cpu_interfaces)
    }

    /// Raise software-generated interrupt `sgi` on CPU interface `target`.
    ///
    /// Both values must already have been validated.
    fn send_sgi(&self, sgi: IrqNumber, target: u64);

    /// Route shared interrupt `irq` to CPU interface `core`.
    fn set_target(&self, irq: IrqNumber, core: CoreId) -> Result<(), GicError>;

    /// Read the set of CPU interfaces `irq` is currently routed to.
    fn get_target(&self, irq: IrqNumber) -> Result<TargetMask, GicError>;

    /// Read the mask naming the CPU interface of the calling core.
    fn self_target(&self) -> Result<TargetMask, GicError>;
}
