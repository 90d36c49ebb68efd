//! GICv2 distributor driver

use core::ptr::NonNull;

use kite_cap::objects::irq::{CoreId, IrqNumber, SPI_BASE, Trigger};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;

use super::registers::{GICD_SGIR, GICD_TYPER, GicdRegisters, icfgr_edge_bit};
use super::{GicError, InterruptController, TargetMask};
use crate::platform::PlatformInfo;

/// Driver for a memory-mapped GICv2 distributor.
pub struct GicV2Distributor {
    regs: NonNull<GicdRegisters>,
    info: PlatformInfo,
}

// SAFETY: The pointer refers to device memory valid for the lifetime of the
// kernel. Every access is one volatile load or store of a single register.
unsafe impl Send for GicV2Distributor {}
unsafe impl Sync for GicV2Distributor {}

impl GicV2Distributor {
    /// Create a driver, reading the platform description from GICD_TYPER.
    ///
    /// Returns `None` if `base` is null.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapped GICv2 distributor frame (or 4 KiB of
    /// page-aligned memory standing in for one) that stays valid for the
    /// lifetime of the driver.
    pub unsafe fn new(base: *mut u8) -> Option<Self> {
        let regs = NonNull::new(base.cast::<GicdRegisters>())?;
        // SAFETY: Caller guarantees `base` is a valid distributor frame.
        let typer = unsafe { regs.as_ref() }.typer.extract();
        let info = PlatformInfo::from_typer(
            typer.read(GICD_TYPER::ITLinesNumber),
            typer.read(GICD_TYPER::CPUNumber),
        );
        Some(Self { regs, info })
    }

    /// Create a driver with a board-supplied platform description.
    ///
    /// # Safety
    ///
    /// Same requirements as [`GicV2Distributor::new`].
    pub unsafe fn with_info(base: *mut u8, info: PlatformInfo) -> Option<Self> {
        let regs = NonNull::new(base.cast::<GicdRegisters>())?;
        Some(Self { regs, info })
    }

    fn regs(&self) -> &GicdRegisters {
        // SAFETY: Construction guarantees the frame outlives `self`.
        unsafe { self.regs.as_ref() }
    }

    fn target_byte(&self, irq: IrqNumber) -> Result<&ReadWrite<u8>, GicError> {
        if irq > self.info.max_irq {
            return Err(GicError::IrqOutOfRange {
                min: 0,
                max: u64::from(self.info.max_irq),
            });
        }
        Ok(&self.regs().itargetsr[irq as usize])
    }
}

impl InterruptController for GicV2Distributor {
    fn info(&self) -> &PlatformInfo {
        &self.info
    }

    fn set_trigger(&self, irq: IrqNumber, trigger: Trigger) -> Result<(), GicError> {
        if irq > self.info.max_irq {
            return Err(GicError::IrqOutOfRange {
                min: 0,
                max: u64::from(self.info.max_irq),
            });
        }
        let (index, bit) = icfgr_edge_bit(irq);
        let reg = &self.regs().icfgr[index];
        let value = reg.get();
        reg.set(if trigger.is_edge() { value | bit } else { value & !bit });
        log::trace!("GICv2: IRQ {} trigger {:?}", irq, trigger);
        Ok(())
    }

    fn send_sgi(&self, sgi: IrqNumber, target: u64) {
        // Only the low three bits name an interface; callers validate first.
        let targets = 1u32 << (target & 0x7);
        self.regs().sgir.write(
            GICD_SGIR::TargetListFilter::TargetList
                + GICD_SGIR::CPUTargetList.val(targets)
                + GICD_SGIR::SGIINTID.val(sgi),
        );
        log::trace!("GICv2: SGI {} -> interface {}", sgi, target);
    }

    fn set_target(&self, irq: IrqNumber, core: CoreId) -> Result<(), GicError> {
        if irq < SPI_BASE {
            return Err(GicError::NotShared(irq));
        }
        let mask = TargetMask::single(core)
            .filter(|_| core < self.info.cpu_interfaces)
            .ok_or(GicError::TargetOutOfRange(u64::from(core)))?;
        self.target_byte(irq)?.set(mask.bits());
        log::trace!("GICv2: IRQ {} routed to {}", irq, mask);
        Ok(())
    }

    fn get_target(&self, irq: IrqNumber) -> Result<TargetMask, GicError> {
        Ok(TargetMask::from_bits(self.target_byte(irq)?.get()))
    }

    fn self_target(&self) -> Result<TargetMask, GicError> {
        // ITARGETSR0 is banked and reads as the requesting CPU's own mask.
        Ok(TargetMask::from_bits(self.regs().itargetsr[0].get()))
    }
}
