//! SGISignal invocations
//!
//! An SGI-Signal capability names one software-generated interrupt and one
//! target, both validated when the capability was issued. Invoking it with
//! any label raises that interrupt.

use kite_cap::objects::irq::IrqNumber;
use kite_pal::InterruptController;

use crate::sched::Thread;

use super::Invocation;
use super::error::SyscallResult;

/// Handle an invocation on an SGI-Signal capability.
///
/// # Returns
///
/// - 0; generating an SGI cannot fail
pub fn decode_sgi_signal<C: InterruptController + ?Sized>(
    irq: IrqNumber,
    target: u64,
    inv: &Invocation<'_>,
    platform: &C,
    thread: &mut Thread,
) -> SyscallResult {
    log::trace!("SGISignal: SGI {} -> {} (label {})", irq, target, inv.label());
    thread.mark_runnable();
    platform.send_sgi(irq, target);
    Ok(0)
}
