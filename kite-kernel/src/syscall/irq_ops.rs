//! IRQControl invocations
//!
//! This module decodes invocations on the IRQControl capability:
//! - IrqIssueIrqHandler: Create an IRQHandler without trigger configuration
//! - IrqIssueIrqHandlerTrigger: Create an IRQHandler and program its trigger
//! - IrqIssueIrqHandlerTriggerCore: Create an IRQHandler bound to a core (SMP)
//! - IrqIssueSgiSignal: Create an SGI-Signal capability (non-SMP)
//! - IrqSetIrqTargetCore: Hand a shared interrupt to another CPU interface (multikernel)
//!
//! Every check runs before the first side effect. Handler issuance holds the
//! registry lock from the active check until the new identity is marked
//! active, and inserts the capability before marking, so a failed insert
//! leaves the identity inactive.

use kite_cap::objects::irq::{CoreId, IrqIdentity, IrqNumber, NUM_SGIS, SPI_BASE, Trigger};
use kite_cap::{CNodeOps, Cap, SlotRef};
use kite_pal::{InterruptController, TargetRouting};
use kite_syscall::InvocationLabel;

use crate::irq::IrqControl;
use crate::sched::Thread;

use super::Invocation;
use super::error::{SyscallError, SyscallResult};

/// Argument index of the target core in IrqIssueIrqHandlerTriggerCore.
const FOR_CORE_TARGET_ARG: u64 = 4;

/// Argument index of the target in IrqIssueSgiSignal and IrqSetIrqTargetCore.
const TARGET_ARG: u64 = 1;

/// Decode an invocation on the IRQControl capability.
pub fn decode_irq_control<C, S>(
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
) -> SyscallResult
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    let label = InvocationLabel::from_raw(inv.label())
        .filter(|label| irq_control.config().irq_control_label_enabled(*label));
    let Some(label) = label else {
        log::warn!(
            "IRQControl: illegal operation (label {}, {} build)",
            inv.label(),
            irq_control.config().topology().name()
        );
        return Err(SyscallError::IllegalOperation);
    };

    log::trace!("IRQControl: {} length={}", label.name(), inv.length());

    match label {
        InvocationLabel::IrqIssueIrqHandler => issue_irq_handler(inv, irq_control, cspace, thread),
        InvocationLabel::IrqIssueIrqHandlerTrigger => {
            issue_irq_handler_trigger(inv, irq_control, cspace, thread)
        }
        InvocationLabel::IrqIssueIrqHandlerTriggerCore => {
            issue_irq_handler_trigger_core(inv, irq_control, cspace, thread)
        }
        InvocationLabel::IrqIssueSgiSignal => issue_sgi_signal(inv, irq_control, cspace, thread),
        InvocationLabel::IrqSetIrqTargetCore => set_irq_target_core(inv, irq_control, thread),
        InvocationLabel::SgiSignalGenerate => Err(SyscallError::IllegalOperation),
    }
}

/// A validated request for a new IRQHandler capability.
struct HandlerRequest {
    id: IrqIdentity,
    trigger: Option<Trigger>,
    /// Distributor routing to program, for shared interrupts bound to a core.
    route_to: Option<CoreId>,
    root: Cap,
    index: u64,
    depth: u64,
}

/// Destination CNode, or `TruncatedMessage` if the message is too short.
fn dest_root<'a>(inv: &Invocation<'a>, min_length: usize) -> Result<&'a Cap, SyscallError> {
    match inv.extra_cap(0) {
        Some(root) if inv.length() >= min_length => Ok(root),
        _ => {
            log::warn!(
                "IRQControl: truncated message (length {}, {} extra caps)",
                inv.length(),
                inv.info.extra_caps
            );
            Err(SyscallError::TruncatedMessage)
        }
    }
}

fn require_trigger_support<C: InterruptController>(irq_control: &IrqControl<C>) -> Result<(), SyscallError> {
    if irq_control.platform().supports_trigger() {
        return Ok(());
    }
    log::warn!("IRQControl: this platform does not support setting the IRQ trigger");
    Err(SyscallError::IllegalOperation)
}

fn check_irq<C: InterruptController>(irq_control: &IrqControl<C>, raw: u64) -> Result<IrqNumber, SyscallError> {
    irq_control.platform().check_irq(raw).map_err(|e| {
        log::warn!("IRQControl: rejecting IRQ {}: {}", raw, e);
        SyscallError::from(e)
    })
}

/// Banked interrupts can only be claimed per core on SMP builds.
fn reject_private_on_smp<C: InterruptController>(
    irq_control: &IrqControl<C>,
    id: IrqIdentity,
) -> Result<(), SyscallError> {
    if irq_control.config().is_smp() && id.is_private() {
        log::warn!(
            "IRQControl: trying to get a handler on private IRQ {}: use IssueIrqHandlerTriggerCore",
            id.irq
        );
        return Err(SyscallError::IllegalOperation);
    }
    Ok(())
}

/// Handle IrqIssueIrqHandler.
///
/// # ABI
///
/// - arg0: IRQ number
/// - arg1: destination slot index
/// - arg2: destination depth
/// - extra cap 0: destination CNode
fn issue_irq_handler<C, S>(
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
) -> SyscallResult
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    let root = dest_root(inv, 3)?;
    let irq = check_irq(irq_control, inv.arg(0))?;
    let id = IrqIdentity::new(irq, thread.core());
    reject_private_on_smp(irq_control, id)?;

    let request = HandlerRequest {
        id,
        trigger: None,
        route_to: None,
        root: *root,
        index: inv.arg(1),
        depth: inv.arg(2),
    };
    issue_handler(request, inv.src_slot, irq_control, cspace, thread)
}

/// Handle IrqIssueIrqHandlerTrigger.
///
/// # ABI
///
/// - arg0: IRQ number
/// - arg1: trigger (0 = level, non-zero = edge)
/// - arg2: destination slot index
/// - arg3: destination depth
/// - extra cap 0: destination CNode
fn issue_irq_handler_trigger<C, S>(
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
) -> SyscallResult
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    let root = dest_root(inv, 4)?;
    require_trigger_support(irq_control)?;
    let irq = check_irq(irq_control, inv.arg(0))?;
    let id = IrqIdentity::local(irq);
    reject_private_on_smp(irq_control, id)?;

    let request = HandlerRequest {
        id,
        trigger: Some(Trigger::from_word(inv.arg(1))),
        route_to: None,
        root: *root,
        index: inv.arg(2),
        depth: inv.arg(3),
    };
    issue_handler(request, inv.src_slot, irq_control, cspace, thread)
}

/// Handle IrqIssueIrqHandlerTriggerCore.
///
/// # ABI
///
/// - arg0: IRQ number
/// - arg1: trigger (0 = level, non-zero = edge)
/// - arg2: destination slot index
/// - arg3: destination depth (low 8 bits)
/// - arg4: target core
/// - extra cap 0: destination CNode
fn issue_irq_handler_trigger_core<C, S>(
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
) -> SyscallResult
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    let root = dest_root(inv, 5)?;
    require_trigger_support(irq_control)?;
    let irq = check_irq(irq_control, inv.arg(0))?;

    // The target must be a node of this kernel with a CPU interface behind it.
    let target = inv.arg(4);
    let nodes = irq_control.config().max_nodes() as u64;
    let interfaces = u64::from(irq_control.platform().info().cpu_interfaces);
    if target >= nodes.min(interfaces) {
        log::warn!("IRQControl: target core {} is invalid", target);
        return Err(SyscallError::InvalidArgument {
            index: FOR_CORE_TARGET_ARG,
        });
    }
    let core = target as CoreId;
    let id = IrqIdentity::new(irq, core);

    let request = HandlerRequest {
        id,
        trigger: Some(Trigger::from_word(inv.arg(1))),
        // Private interrupts are banked; only shared ones need routing.
        route_to: if id.is_private() { None } else { Some(core) },
        root: *root,
        index: inv.arg(2),
        depth: inv.arg(3) & 0xff,
    };
    issue_handler(request, inv.src_slot, irq_control, cspace, thread)
}

/// Common tail of handler issuance: active check, destination checks, then
/// configure hardware, insert and mark active.
fn issue_handler<C, S>(
    request: HandlerRequest,
    src: SlotRef,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
) -> SyscallResult
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    let id = request.id;
    let mut registry = irq_control.registry().lock();

    if registry.is_active(id) {
        log::warn!("IRQControl: rejecting request for {}: already active", id);
        return Err(SyscallError::RevokeFirst);
    }

    let dest = cspace
        .lookup_target_slot(&request.root, request.index, request.depth)
        .map_err(|e| {
            log::warn!("IRQControl: target slot for new IRQHandler invalid ({}): {}", id, e);
            SyscallError::from(e)
        })?;
    cspace.ensure_empty(dest).map_err(|e| {
        log::warn!("IRQControl: target slot for new IRQHandler not empty ({})", id);
        SyscallError::from(e)
    })?;

    let platform = irq_control.platform();
    if let Some(trigger) = request.trigger {
        platform.set_trigger(id.irq, trigger)?;
    }
    if let Some(core) = request.route_to {
        platform.set_target(id.irq, core)?;
    }

    let cap = Cap::IrqHandler {
        irq: id,
        trigger: request.trigger,
    };
    cspace.insert(cap, src, dest)?;
    registry.activate(id);
    drop(registry);

    thread.mark_runnable();
    log::trace!("IRQControl: issued handler for {} into slot {}", id, dest.index);
    Ok(0)
}

/// Handle IrqIssueSgiSignal.
///
/// # ABI
///
/// - arg0: SGI number
/// - arg1: target CPU interface
/// - arg2: destination slot index
/// - arg3: destination depth
/// - extra cap 0: destination CNode
fn issue_sgi_signal<C, S>(
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
) -> SyscallResult
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    let root = dest_root(inv, 4)?;
    let sgi = inv.arg(0);
    let target = inv.arg(1);

    if sgi >= u64::from(NUM_SGIS) {
        log::warn!("IRQControl: IssueSgiSignal: invalid SGI {:#x}", sgi);
        return Err(SyscallError::RangeError {
            min: 0,
            max: u64::from(NUM_SGIS - 1),
        });
    }
    if !irq_control.platform().sgi_target_valid(target) {
        log::warn!("IRQControl: IssueSgiSignal: invalid SGI target {:#x}", target);
        return Err(SyscallError::InvalidArgument { index: TARGET_ARG });
    }

    let dest = cspace.lookup_target_slot(root, inv.arg(2), inv.arg(3)).map_err(|e| {
        log::warn!("IRQControl: IssueSgiSignal: target slot invalid: {}", e);
        SyscallError::from(e)
    })?;
    cspace.ensure_empty(dest).map_err(|e| {
        log::warn!("IRQControl: IssueSgiSignal: target slot not empty");
        SyscallError::from(e)
    })?;

    let cap = Cap::SgiSignal {
        irq: sgi as IrqNumber,
        target,
    };
    cspace.insert(cap, inv.src_slot, dest)?;
    thread.mark_runnable();
    log::trace!("IRQControl: issued SGI {} -> {} into slot {}", sgi, target, dest.index);
    Ok(0)
}

/// Handle IrqSetIrqTargetCore.
///
/// Only an instance that currently receives the interrupt may hand it off.
/// The ownership read and the routing write are not atomic against other
/// instances, and the registry lock is not taken.
///
/// # ABI
///
/// - arg0: IRQ number (shared peripheral)
/// - arg1: target CPU interface
fn set_irq_target_core<C: InterruptController>(
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    thread: &mut Thread,
) -> SyscallResult {
    if inv.length() < 2 {
        log::warn!("IRQControl: SetIrqTargetCore: truncated message");
        return Err(SyscallError::TruncatedMessage);
    }
    let irq = check_irq(irq_control, inv.arg(0))?;
    let target = inv.arg(1);
    let platform = irq_control.platform();

    if irq < SPI_BASE {
        log::warn!("IRQControl: SetIrqTargetCore: IRQ {} is not shared", irq);
        return Err(SyscallError::RangeError {
            min: u64::from(SPI_BASE),
            max: u64::from(platform.info().max_irq),
        });
    }

    let routing = TargetRouting::new(platform);
    match routing.owns(irq) {
        Ok(true) => {}
        Ok(false) => {
            log::warn!("IRQControl: SetIrqTargetCore: IRQ {} is not routed to us", irq);
            return Err(SyscallError::IllegalOperation);
        }
        Err(e) => {
            log::warn!("IRQControl: SetIrqTargetCore: cannot read target of IRQ {}: {}", irq, e);
            return Err(SyscallError::IllegalOperation);
        }
    }

    if target >= u64::from(platform.info().cpu_interfaces) {
        log::warn!("IRQControl: SetIrqTargetCore: target interface {} is invalid", target);
        return Err(SyscallError::InvalidArgument { index: TARGET_ARG });
    }

    routing.retarget(irq, target as u8)?;
    thread.mark_runnable();
    log::trace!("IRQControl: IRQ {} handed to interface {}", irq, target);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use kite_cap::objects::irq::IrqState;
    use kite_cap::{CapError, CapResult};
    use kite_pal::{GicV2Distributor, PlatformInfo};

    use super::super::error::LookupFault;
    use super::super::test_support::{
        FakeController, Harness, HwEvent, ROOT_RADIX, distributor_frame, peek8, peek32,
    };
    use super::*;
    use crate::cap::CSpace;
    use crate::config::{ConfigError, IrqConfig};
    use crate::sched::ThreadState;

    const DEPTH: u64 = ROOT_RADIX as u64;

    const ISSUE: u64 = InvocationLabel::IrqIssueIrqHandler.raw();
    const TRIGGER: u64 = InvocationLabel::IrqIssueIrqHandlerTrigger.raw();
    const FOR_CORE: u64 = InvocationLabel::IrqIssueIrqHandlerTriggerCore.raw();
    const SGI: u64 = InvocationLabel::IrqIssueSgiSignal.raw();
    const SET_TARGET: u64 = InvocationLabel::IrqSetIrqTargetCore.raw();

    fn smp() -> Harness {
        Harness::new(IrqConfig::smp(4).unwrap())
    }

    #[test]
    fn test_issue_trigger_success_ordering() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        assert_eq!(h.invoke(TRIGGER, &[42, 1, 10, DEPTH]), Ok(0));

        assert_eq!(
            h.cap_at(10),
            Cap::IrqHandler {
                irq: IrqIdentity::local(42),
                trigger: Some(Trigger::Edge),
            }
        );
        assert_eq!(h.cspace.slot(h.slot(10)).unwrap().parent, Some(h.control_slot()));
        assert_eq!(h.irq.state(IrqIdentity::local(42)), IrqState::Active);
        assert_eq!(h.irq.platform().events(), vec![HwEvent::Trigger(42, Trigger::Edge)]);
        assert_eq!(h.thread.state(), ThreadState::Restart);
    }

    #[test]
    fn test_no_duplicate_handlers() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        assert_eq!(h.invoke(TRIGGER, &[42, 0, 10, DEPTH]), Ok(0));
        assert_eq!(h.invoke(TRIGGER, &[42, 0, 11, DEPTH]), Err(SyscallError::RevokeFirst));
        assert_eq!(h.invoke(ISSUE, &[42, 12, DEPTH]), Err(SyscallError::RevokeFirst));
        assert_eq!(h.cap_at(11), Cap::Null);
        assert_eq!(h.thread.state(), ThreadState::Running);
    }

    #[test]
    fn test_generic_issue_has_no_trigger() {
        let mut h = Harness::with_platform(FakeController::without_trigger(), IrqConfig::uniprocessor());
        assert_eq!(h.invoke(ISSUE, &[27, 10, DEPTH]), Ok(0));
        assert_eq!(
            h.cap_at(10),
            Cap::IrqHandler {
                irq: IrqIdentity::local(27),
                trigger: None,
            }
        );
        assert!(h.irq.platform().events().is_empty());
    }

    #[test]
    fn test_truncated_messages() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        assert_eq!(h.invoke(ISSUE, &[42, 10]), Err(SyscallError::TruncatedMessage));
        assert_eq!(h.invoke(TRIGGER, &[42, 0, 10]), Err(SyscallError::TruncatedMessage));
        assert_eq!(h.invoke(SGI, &[1, 0, 10]), Err(SyscallError::TruncatedMessage));
        assert_eq!(
            h.invoke_with_caps(TRIGGER, &[42, 0, 10, DEPTH], &[]),
            Err(SyscallError::TruncatedMessage)
        );
        assert_eq!(h.irq.registry().active_count(), 0);
    }

    #[test]
    fn test_trigger_unsupported() {
        let mut h = Harness::with_platform(FakeController::without_trigger(), IrqConfig::uniprocessor());
        assert_eq!(h.invoke(TRIGGER, &[42, 1, 10, DEPTH]), Err(SyscallError::IllegalOperation));
        assert_eq!(h.cap_at(10), Cap::Null);
    }

    #[test]
    fn test_irq_out_of_range() {
        let info = PlatformInfo {
            max_irq: 287,
            ..PlatformInfo::GICV2_DEFAULT
        };
        let mut h = Harness::with_platform(FakeController::with_info(info), IrqConfig::uniprocessor());
        assert_eq!(
            h.invoke(TRIGGER, &[288, 1, 10, DEPTH]),
            Err(SyscallError::RangeError { min: 0, max: 287 })
        );
        assert_eq!(h.invoke(TRIGGER, &[287, 1, 10, DEPTH]), Ok(0));
    }

    #[test]
    fn test_lookup_failures_propagate() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        assert_eq!(
            h.invoke(TRIGGER, &[42, 0, 10, 4]),
            Err(SyscallError::FailedLookup(LookupFault::DepthMismatch))
        );
        assert_eq!(
            h.invoke(TRIGGER, &[42, 0, 10, 0]),
            Err(SyscallError::RangeError { min: 1, max: 64 })
        );
        let not_cnode = [Cap::IrqControl { badge: Default::default() }];
        assert_eq!(
            h.invoke_with_caps(TRIGGER, &[42, 0, 10, DEPTH], &not_cnode),
            Err(SyscallError::FailedLookup(LookupFault::InvalidRoot))
        );
        assert!(!h.irq.is_active(IrqIdentity::local(42)));
        assert!(h.irq.platform().events().is_empty());
    }

    #[test]
    fn test_occupied_destination() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        // Slot 3 holds the IRQControl capability.
        assert_eq!(h.invoke(TRIGGER, &[42, 0, 3, DEPTH]), Err(SyscallError::DeleteFirst));
        assert!(!h.irq.is_active(IrqIdentity::local(42)));
        assert!(h.irq.platform().events().is_empty());
    }

    /// CSpace whose inserts always fail after the emptiness check passed.
    struct FailingInsert(CSpace);

    impl CNodeOps for FailingInsert {
        fn lookup_target_slot(&self, root: &Cap, index: u64, depth: u64) -> CapResult<SlotRef> {
            self.0.lookup_target_slot(root, index, depth)
        }

        fn ensure_empty(&self, slot: SlotRef) -> CapResult<()> {
            self.0.ensure_empty(slot)
        }

        fn insert(&mut self, _cap: Cap, _src: SlotRef, _dest: SlotRef) -> CapResult<()> {
            Err(CapError::ObjectNotFound)
        }
    }

    #[test]
    fn test_failed_insert_leaves_registry_inactive() {
        let h = Harness::new(IrqConfig::uniprocessor());
        let mut cspace = FailingInsert(CSpace::bootstrap(ROOT_RADIX, Default::default()).unwrap().0);
        let mut thread = Thread::running_on(0);
        let caps = [h.root];
        let args = [42, 1, 10, DEPTH];
        let inv = Invocation {
            info: kite_syscall::MessageInfo::new(TRIGGER, 1, 4),
            args: &args,
            extra_caps: &caps,
            src_slot: h.control_slot(),
        };

        let result = decode_irq_control(&inv, &h.irq, &mut cspace, &mut thread);
        assert!(result.is_err());
        assert_eq!(h.irq.state(IrqIdentity::local(42)), IrqState::Inactive);
        assert_eq!(thread.state(), ThreadState::Running);
    }

    #[test]
    fn test_smp_rejects_private_on_shared_path() {
        let mut h = smp();
        assert_eq!(h.invoke(TRIGGER, &[27, 0, 10, DEPTH]), Err(SyscallError::IllegalOperation));
        assert_eq!(h.invoke(TRIGGER, &[3, 0, 10, DEPTH]), Err(SyscallError::IllegalOperation));
        assert_eq!(h.invoke(ISSUE, &[27, 10, DEPTH]), Err(SyscallError::IllegalOperation));
        assert_eq!(h.invoke(ISSUE, &[3, 10, DEPTH]), Err(SyscallError::IllegalOperation));
        assert_eq!(h.cap_at(10), Cap::Null);
        assert_eq!(h.irq.registry().active_count(), 0);
        assert!(h.irq.platform().events().is_empty());

        assert_eq!(h.invoke(FOR_CORE, &[27, 0, 10, DEPTH, 2]), Ok(0));
        assert_eq!(
            h.cap_at(10),
            Cap::IrqHandler {
                irq: IrqIdentity::new(27, 2),
                trigger: Some(Trigger::Level),
            }
        );
        // Banked interrupts are not routed.
        assert_eq!(h.irq.platform().events(), vec![HwEvent::Trigger(27, Trigger::Level)]);
    }

    #[test]
    fn test_private_irq_per_core() {
        let mut h = smp();
        assert_eq!(h.invoke(FOR_CORE, &[27, 0, 10, DEPTH, 0]), Ok(0));
        assert_eq!(h.invoke(FOR_CORE, &[27, 0, 11, DEPTH, 1]), Ok(0));
        assert_eq!(
            h.invoke(FOR_CORE, &[27, 0, 12, DEPTH, 1]),
            Err(SyscallError::RevokeFirst)
        );
    }

    #[test]
    fn test_shared_irq_for_core_scenario() {
        let mut h = smp();
        assert_eq!(h.invoke(FOR_CORE, &[42, 1, 10, DEPTH, 1]), Ok(0));
        assert_eq!(h.irq.state(IrqIdentity::new(42, 1)), IrqState::Active);
        assert_eq!(
            h.irq.platform().events(),
            vec![HwEvent::Trigger(42, Trigger::Edge), HwEvent::Target(42, 1)]
        );

        assert_eq!(
            h.invoke(FOR_CORE, &[42, 1, 11, DEPTH, 1]),
            Err(SyscallError::RevokeFirst)
        );
        assert_eq!(h.cap_at(11), Cap::Null);
    }

    #[test]
    fn test_for_core_target_validation() {
        let mut h = smp();
        assert_eq!(
            h.invoke(FOR_CORE, &[42, 1, 10, DEPTH, 4]),
            Err(SyscallError::InvalidArgument { index: 4 })
        );
        assert_eq!(h.invoke(FOR_CORE, &[42, 1, 10, DEPTH]), Err(SyscallError::TruncatedMessage));
        // Only the low byte of the depth is used.
        assert_eq!(h.invoke(FOR_CORE, &[42, 1, 10, 0x100 | DEPTH, 3]), Ok(0));
    }

    #[test]
    fn test_generic_issue_on_smp_takes_shared_irq() {
        let mut h = smp();
        assert_eq!(h.invoke(ISSUE, &[42, 10, DEPTH]), Ok(0));
        assert_eq!(h.irq.state(IrqIdentity::new(42, 0)), IrqState::Active);
    }

    #[test]
    fn test_for_core_failures_leave_hardware_untouched() {
        let mut h = smp();
        let failures: [&[u64]; 4] = [
            &[42, 1, 10, DEPTH, 4],
            &[42, 1, 10, DEPTH, 9],
            &[42, 1, 10, 4, 1],
            &[42, 1, 3, DEPTH, 1],
        ];
        for args in failures {
            assert!(h.invoke(FOR_CORE, args).is_err(), "{:?}", args);
        }
        assert!(h.irq.platform().events().is_empty());
        assert_eq!(h.irq.registry().active_count(), 0);
    }

    fn invoke_for_core<C: InterruptController>(
        irq: &IrqControl<C>,
        cspace: &mut CSpace,
        root: Cap,
        args: &[u64],
    ) -> SyscallResult {
        let Cap::CNode { id, .. } = root else { unreachable!() };
        let caps = [root];
        let inv = Invocation {
            info: kite_syscall::MessageInfo::new(FOR_CORE, 1, args.len() as u8),
            args,
            extra_caps: &caps,
            src_slot: SlotRef::new(id, 3),
        };
        decode_irq_control(&inv, irq, cspace, &mut Thread::running_on(0))
    }

    #[test]
    fn test_for_core_against_gicv2_distributor() {
        let base = distributor_frame();
        // QEMU virt: 288 interrupt IDs, 4 CPU interfaces.
        let info = PlatformInfo::from_typer(8, 3);
        let gic = || unsafe { GicV2Distributor::with_info(base, info) }.unwrap();

        assert_eq!(
            IrqControl::new(gic(), IrqConfig::smp(8).unwrap()).err(),
            Some(ConfigError::NodesExceedInterfaces {
                nodes: 8,
                interfaces: 4
            })
        );

        let irq = IrqControl::new(gic(), IrqConfig::smp(4).unwrap()).unwrap();
        let (mut cspace, root) = CSpace::bootstrap(ROOT_RADIX, Default::default()).unwrap();

        for target in [4, 5, 8] {
            assert_eq!(
                invoke_for_core(&irq, &mut cspace, root, &[42, 1, 10, DEPTH, target]),
                Err(SyscallError::InvalidArgument { index: 4 })
            );
        }
        assert_eq!(
            invoke_for_core(&irq, &mut cspace, root, &[42, 1, 3, DEPTH, 1]),
            Err(SyscallError::DeleteFirst)
        );
        assert_eq!(peek32(base, 0xc08), 0);
        assert_eq!(peek8(base, 0x800 + 42), 0);
        assert_eq!(irq.registry().active_count(), 0);

        assert_eq!(invoke_for_core(&irq, &mut cspace, root, &[42, 1, 10, DEPTH, 3]), Ok(0));
        assert_eq!(peek32(base, 0xc08), 1 << 21);
        assert_eq!(peek8(base, 0x800 + 42), 0b1000);
        assert_eq!(irq.state(IrqIdentity::new(42, 3)), IrqState::Active);
    }

    #[test]
    fn test_handler_deleted_reopens_identity() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        assert_eq!(h.invoke(TRIGGER, &[42, 0, 10, DEPTH]), Ok(0));

        let dest = h.slot(10);
        let cap = h.cspace.delete(dest).unwrap();
        h.irq.handler_deleted(cap.irq_handler_identity().unwrap());

        assert_eq!(h.invoke(TRIGGER, &[42, 0, 10, DEPTH]), Ok(0));
    }

    #[test]
    fn test_concurrent_issue_exactly_one_wins() {
        use std::sync::Barrier;

        for _ in 0..64 {
            let irq = IrqControl::new(FakeController::new(), IrqConfig::smp(2).unwrap()).unwrap();
            let barrier = Barrier::new(2);

            let results: Vec<SyscallResult> = std::thread::scope(|s| {
                let workers: Vec<_> = (0..2u8)
                    .map(|core| {
                        let irq = &irq;
                        let barrier = &barrier;
                        s.spawn(move || {
                            let (mut cspace, root) =
                                CSpace::bootstrap(ROOT_RADIX, Default::default()).unwrap();
                            let Cap::CNode { id, .. } = root else { unreachable!() };
                            let mut thread = Thread::running_on(core);
                            let caps = [root];
                            let args = [42, 1, 10, DEPTH, 1];
                            let inv = Invocation {
                                info: kite_syscall::MessageInfo::new(FOR_CORE, 1, 5),
                                args: &args,
                                extra_caps: &caps,
                                src_slot: SlotRef::new(id, 3),
                            };
                            barrier.wait();
                            decode_irq_control(&inv, irq, &mut cspace, &mut thread)
                        })
                    })
                    .collect();
                workers.into_iter().map(|w| w.join().unwrap()).collect()
            });

            let wins = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(wins, 1, "{:?}", results);
            assert!(results.contains(&Err(SyscallError::RevokeFirst)));
            assert_eq!(irq.registry().active_count(), 1);
        }
    }

    #[test]
    fn test_sgi_signal_range() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        assert_eq!(
            h.invoke(SGI, &[16, 0, 10, DEPTH]),
            Err(SyscallError::RangeError { min: 0, max: 15 })
        );
        assert_eq!(h.invoke(SGI, &[15, 0, 10, DEPTH]), Ok(0));
        assert_eq!(h.cap_at(10), Cap::SgiSignal { irq: 15, target: 0 });
        // SGI capabilities do not touch the registry.
        assert_eq!(h.irq.registry().active_count(), 0);
        assert!(h.irq.platform().events().is_empty());
    }

    #[test]
    fn test_sgi_signal_target_validation() {
        let mut h = Harness::new(IrqConfig::multikernel());
        assert_eq!(
            h.invoke(SGI, &[1, 8, 10, DEPTH]),
            Err(SyscallError::InvalidArgument { index: 1 })
        );
        assert_eq!(h.invoke(SGI, &[1, 7, 10, DEPTH]), Ok(0));
        assert_eq!(h.invoke(SGI, &[2, 7, 10, DEPTH]), Err(SyscallError::DeleteFirst));
    }

    #[test]
    fn test_labels_outside_topology_are_illegal() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        assert_eq!(h.invoke(FOR_CORE, &[42, 1, 10, DEPTH, 0]), Err(SyscallError::IllegalOperation));
        assert_eq!(h.invoke(SET_TARGET, &[42, 1]), Err(SyscallError::IllegalOperation));

        let mut h = smp();
        assert_eq!(h.invoke(SGI, &[1, 0, 10, DEPTH]), Err(SyscallError::IllegalOperation));
    }

    #[test]
    fn test_unknown_label_has_no_side_effects() {
        let mut h = Harness::new(IrqConfig::uniprocessor());
        for label in [0, 6, 7, 0xdead] {
            assert_eq!(h.invoke(label, &[42, 1, 10, DEPTH]), Err(SyscallError::IllegalOperation));
        }
        assert_eq!(h.cap_at(10), Cap::Null);
        assert_eq!(h.irq.registry().active_count(), 0);
        assert!(h.irq.platform().events().is_empty());
        assert_eq!(h.thread.state(), ThreadState::Running);
    }

    fn multikernel() -> Harness {
        let h = Harness::with_platform(FakeController::new().self_mask(0b0001), IrqConfig::multikernel());
        h.irq.platform().route(50, 0b0001);
        h
    }

    #[test]
    fn test_set_target_hands_off_owned_irq() {
        let mut h = multikernel();
        assert_eq!(h.invoke(SET_TARGET, &[50, 2]), Ok(0));
        assert_eq!(h.irq.platform().events(), vec![HwEvent::Target(50, 2)]);
        assert_eq!(h.thread.state(), ThreadState::Restart);

        // Now routed elsewhere, so this instance can no longer move it.
        assert_eq!(h.invoke(SET_TARGET, &[50, 0]), Err(SyscallError::IllegalOperation));
    }

    #[test]
    fn test_set_target_ownership_check() {
        let mut h = multikernel();
        h.irq.platform().route(60, 0b0100);
        assert_eq!(h.invoke(SET_TARGET, &[60, 0]), Err(SyscallError::IllegalOperation));
        assert!(h.irq.platform().events().is_empty());

        let mut h = Harness::with_platform(
            FakeController::new().failing_target_reads(),
            IrqConfig::multikernel(),
        );
        assert_eq!(h.invoke(SET_TARGET, &[50, 1]), Err(SyscallError::IllegalOperation));
    }

    #[test]
    fn test_set_target_argument_checks() {
        let mut h = multikernel();
        assert_eq!(h.invoke(SET_TARGET, &[50]), Err(SyscallError::TruncatedMessage));
        assert_eq!(
            h.invoke(SET_TARGET, &[27, 1]),
            Err(SyscallError::RangeError { min: 32, max: 1019 })
        );
        assert_eq!(
            h.invoke(SET_TARGET, &[1020, 1]),
            Err(SyscallError::RangeError { min: 0, max: 1019 })
        );
        assert_eq!(
            h.invoke(SET_TARGET, &[50, 8]),
            Err(SyscallError::InvalidArgument { index: 1 })
        );
        assert!(h.irq.platform().events().is_empty());
        assert_eq!(h.irq.registry().active_count(), 0);
    }
}
