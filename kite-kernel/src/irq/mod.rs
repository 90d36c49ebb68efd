//! Interrupt control
//!
//! [`IrqControl`] is the kernel object behind IRQControl capabilities. It
//! owns the platform interrupt driver, the build configuration and the
//! active interrupt registry. One instance exists per kernel: shared by all
//! cores in an SMP build, one per instance in a multikernel build.

pub mod registry;

use kite_cap::objects::irq::{IrqIdentity, IrqState};
use kite_pal::InterruptController;

use crate::config::{ConfigError, IrqConfig};

pub use registry::{ActiveIrqRegistry, REGISTRY_ENTRIES, RegistryGuard};

/// IRQControl object state.
pub struct IrqControl<C: InterruptController> {
    platform: C,
    config: IrqConfig,
    registry: ActiveIrqRegistry,
}

impl<C: InterruptController> IrqControl<C> {
    /// Create the IRQControl object for `platform`.
    ///
    /// Fails if `config` names more nodes than the controller can route to.
    pub fn new(platform: C, config: IrqConfig) -> Result<Self, ConfigError> {
        config.check_platform(platform.info()).inspect_err(|e| {
            log::error!("irq: {}", e);
        })?;
        log::debug!(
            "irq: {} config, {} node(s), max IRQ {}, trigger support {}",
            config.topology().name(),
            config.max_nodes(),
            platform.info().max_irq,
            platform.info().trigger_support
        );
        Ok(Self {
            platform,
            config,
            registry: ActiveIrqRegistry::new(),
        })
    }

    #[inline]
    pub fn platform(&self) -> &C {
        &self.platform
    }

    #[inline]
    pub fn config(&self) -> &IrqConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &ActiveIrqRegistry {
        &self.registry
    }

    pub fn is_active(&self, id: IrqIdentity) -> bool {
        self.registry.is_active(id)
    }

    pub fn state(&self, id: IrqIdentity) -> IrqState {
        self.registry.state(id)
    }

    /// The last IRQHandler capability for `id` has been deleted.
    ///
    /// Called from the capability deletion path; makes the identity
    /// available to handler issuance again.
    pub fn handler_deleted(&self, id: IrqIdentity) {
        if self.registry.lock().deactivate(id) {
            log::trace!("irq: {} released", id);
        }
    }
}
