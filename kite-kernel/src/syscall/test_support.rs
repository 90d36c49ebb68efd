//! Host-side fixtures for invocation tests.

use kite_cap::objects::irq::{CoreId, IrqNumber, MAX_IRQ, SPI_BASE, Trigger};
use kite_cap::root_slots::Slot;
use kite_cap::{Badge, CNodeGuard, CNodeId, Cap, SlotRef};
use kite_pal::{GicError, InterruptController, PlatformInfo, TargetMask};
use kite_syscall::MessageInfo;
use spin::Mutex;

use super::error::SyscallResult;
use super::{Invocation, decode_invocation, handle_invocation};
use crate::cap::CSpace;
use crate::config::IrqConfig;
use crate::irq::IrqControl;
use crate::sched::Thread;

/// Radix of the harness root CNode; lookups use it as the depth.
pub const ROOT_RADIX: u8 = 8;

/// Hardware side effect observed by [`FakeController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HwEvent {
    Trigger(IrqNumber, Trigger),
    Target(IrqNumber, CoreId),
    Sgi(IrqNumber, u64),
}

/// Interrupt controller that records what it is asked to do.
pub struct FakeController {
    info: PlatformInfo,
    events: Mutex<Vec<HwEvent>>,
    targets: Mutex<[u8; MAX_IRQ as usize + 1]>,
    self_mask: u8,
    fail_target_reads: bool,
}

impl FakeController {
    pub fn new() -> Self {
        Self::with_info(PlatformInfo::GICV2_DEFAULT)
    }

    pub fn with_info(info: PlatformInfo) -> Self {
        Self {
            info,
            events: Mutex::new(Vec::new()),
            targets: Mutex::new([0; MAX_IRQ as usize + 1]),
            self_mask: 0b0001,
            fail_target_reads: false,
        }
    }

    pub fn without_trigger() -> Self {
        Self::with_info(PlatformInfo {
            trigger_support: false,
            ..PlatformInfo::GICV2_DEFAULT
        })
    }

    /// This instance's CPU interface mask.
    pub fn self_mask(mut self, mask: u8) -> Self {
        self.self_mask = mask;
        self
    }

    /// Make every target read fail.
    pub fn failing_target_reads(mut self) -> Self {
        self.fail_target_reads = true;
        self
    }

    /// Set the routing byte of `irq` without recording an event.
    pub fn route(&self, irq: IrqNumber, mask: u8) {
        self.targets.lock()[irq as usize] = mask;
    }

    pub fn events(&self) -> Vec<HwEvent> {
        self.events.lock().clone()
    }
}

impl InterruptController for FakeController {
    fn info(&self) -> &PlatformInfo {
        &self.info
    }

    fn set_trigger(&self, irq: IrqNumber, trigger: Trigger) -> Result<(), GicError> {
        if !self.info.trigger_support {
            return Err(GicError::TriggerUnsupported);
        }
        self.events.lock().push(HwEvent::Trigger(irq, trigger));
        Ok(())
    }

    fn send_sgi(&self, sgi: IrqNumber, target: u64) {
        self.events.lock().push(HwEvent::Sgi(sgi, target));
    }

    fn set_target(&self, irq: IrqNumber, core: CoreId) -> Result<(), GicError> {
        if irq < SPI_BASE {
            return Err(GicError::NotShared(irq));
        }
        let mask = TargetMask::single(core)
            .filter(|_| core < self.info.cpu_interfaces)
            .ok_or(GicError::TargetOutOfRange(u64::from(core)))?;
        self.targets.lock()[irq as usize] = mask.bits();
        self.events.lock().push(HwEvent::Target(irq, core));
        Ok(())
    }

    fn get_target(&self, irq: IrqNumber) -> Result<TargetMask, GicError> {
        if self.fail_target_reads {
            return Err(GicError::NotShared(irq));
        }
        Ok(TargetMask::from_bits(self.targets.lock()[irq as usize]))
    }

    fn self_target(&self) -> Result<TargetMask, GicError> {
        Ok(TargetMask::from_bits(self.self_mask))
    }
}

#[repr(C, align(4096))]
struct DistributorFrame([u32; 1024]);

/// A leaked, zeroed GICv2 distributor frame.
pub fn distributor_frame() -> *mut u8 {
    Box::leak(Box::new(DistributorFrame([0; 1024]))).0.as_mut_ptr().cast()
}

pub fn peek32(base: *mut u8, offset: usize) -> u32 {
    unsafe { base.add(offset).cast::<u32>().read_volatile() }
}

pub fn peek8(base: *mut u8, offset: usize) -> u8 {
    unsafe { base.add(offset).read_volatile() }
}

/// Kernel state for driving invocations from a test.
pub struct Harness {
    pub irq: IrqControl<FakeController>,
    pub cspace: CSpace,
    pub root: Cap,
    pub root_id: CNodeId,
    pub thread: Thread,
}

impl Harness {
    pub fn new(config: IrqConfig) -> Self {
        Self::with_platform(FakeController::new(), config)
    }

    pub fn with_platform(platform: FakeController, config: IrqConfig) -> Self {
        let (cspace, root) = CSpace::bootstrap(ROOT_RADIX, CNodeGuard::NONE)
            .unwrap_or_else(|e| panic!("bootstrap failed: {e}"));
        let Cap::CNode { id: root_id, .. } = root else {
            unreachable!("bootstrap returns a CNode")
        };
        Self {
            irq: IrqControl::new(platform, config)
                .unwrap_or_else(|e| panic!("invalid config: {e}")),
            cspace,
            root,
            root_id,
            thread: Thread::running_on(0),
        }
    }

    pub fn control_slot(&self) -> SlotRef {
        SlotRef::new(self.root_id, Slot::IrqControl.index())
    }

    pub fn control_cap(&self) -> Cap {
        Cap::IrqControl { badge: Badge::NONE }
    }

    /// Slot `index` of the root CNode.
    pub fn slot(&self, index: usize) -> SlotRef {
        SlotRef::new(self.root_id, index)
    }

    pub fn cap_at(&self, index: usize) -> Cap {
        self.cspace.cap_at(self.slot(index)).unwrap_or_default()
    }

    /// Invoke the IRQControl capability with the root CNode as extra cap.
    pub fn invoke(&mut self, label: u64, args: &[u64]) -> SyscallResult {
        let caps = [self.root];
        self.invoke_with_caps(label, args, &caps)
    }

    pub fn invoke_with_caps(&mut self, label: u64, args: &[u64], caps: &[Cap]) -> SyscallResult {
        let inv = Invocation {
            info: MessageInfo::new(label, caps.len() as u8, args.len() as u8),
            args,
            extra_caps: caps,
            src_slot: self.control_slot(),
        };
        self.thread = Thread::running_on(self.thread.core());
        let control = self.control_cap();
        decode_invocation(&control, &inv, &self.irq, &mut self.cspace, &mut self.thread)
    }

    pub fn handle(&mut self, cap: &Cap, label: u64, args: &[u64], reply: &mut [u64]) -> i64 {
        let caps = [self.root];
        let inv = Invocation {
            info: MessageInfo::new(label, 1, args.len() as u8),
            args,
            extra_caps: &caps,
            src_slot: self.control_slot(),
        };
        handle_invocation(cap, &inv, &self.irq, &mut self.cspace, &mut self.thread, reply)
    }
}
