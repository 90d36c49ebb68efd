//! Object invocation interface
//!
//! An invocation is a system call made on a capability: the kernel has
//! already resolved the invoked capability and any extra capabilities, and
//! hands the decoder the message-info word and the argument words.
//!
//! # ABI
//!
//! Following seL4 conventions:
//! - message-info word: label, extra capability count and argument length
//! - argument words: read positionally, never past `length`
//! - return value: 0 on success, negative [`ErrorCode`](kite_syscall::ErrorCode)
//!   on failure with detail words written to the caller's message buffer
//!
//! # Dispatch
//!
//! [`decode_invocation`] matches the invoked capability exhaustively and
//! routes to the decoder for its kind.

pub mod error;
pub mod irq_ops;
pub mod sgi_ops;
#[cfg(test)]
pub(crate) mod test_support;

use kite_cap::{CNodeOps, Cap, SlotRef};
use kite_pal::InterruptController;
use kite_syscall::{MessageInfo, get_arg};

use crate::irq::IrqControl;
use crate::sched::Thread;

use error::{SyscallError, SyscallResult, to_return_value};

/// A decoded invocation on one capability.
#[derive(Clone, Copy, Debug)]
pub struct Invocation<'a> {
    /// Message-info word.
    pub info: MessageInfo,
    /// Argument words as supplied by the caller.
    pub args: &'a [u64],
    /// Extra capabilities, already looked up.
    pub extra_caps: &'a [Cap],
    /// Slot holding the invoked capability.
    pub src_slot: SlotRef,
}

impl<'a> Invocation<'a> {
    #[inline]
    pub const fn label(&self) -> u64 {
        self.info.label
    }

    /// Number of argument words the caller declared.
    #[inline]
    pub const fn length(&self) -> usize {
        self.info.length as usize
    }

    /// Argument word `index`, 0 if it lies beyond the declared length.
    pub fn arg(&self, index: usize) -> u64 {
        if index >= self.length() {
            return 0;
        }
        get_arg(self.args, index)
    }

    /// Extra capability `index`, if the caller supplied one.
    pub fn extra_cap(&self, index: usize) -> Option<&'a Cap> {
        if index >= self.info.extra_caps as usize {
            return None;
        }
        self.extra_caps.get(index).filter(|cap| !cap.is_null())
    }
}

/// Decode and perform an invocation on `cap`.
pub fn decode_invocation<C, S>(
    cap: &Cap,
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
) -> SyscallResult
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    match cap {
        Cap::IrqControl { .. } => irq_ops::decode_irq_control(inv, irq_control, cspace, thread),
        Cap::SgiSignal { irq, target } => {
            sgi_ops::decode_sgi_signal(*irq, *target, inv, irq_control.platform(), thread)
        }
        Cap::IrqHandler { .. } | Cap::CNode { .. } => {
            log::warn!("invoke: {} has no invocations here (label {})", cap.name(), inv.label());
            Err(SyscallError::IllegalOperation)
        }
        Cap::Null => {
            log::warn!("invoke: attempted to invoke a null capability");
            Err(SyscallError::InvalidCapability { index: 0 })
        }
    }
}

/// Perform an invocation and produce the raw return value.
///
/// On failure the error's detail words are written to the front of `reply`.
pub fn handle_invocation<C, S>(
    cap: &Cap,
    inv: &Invocation<'_>,
    irq_control: &IrqControl<C>,
    cspace: &mut S,
    thread: &mut Thread,
    reply: &mut [u64],
) -> i64
where
    C: InterruptController,
    S: CNodeOps + ?Sized,
{
    let result = decode_invocation(cap, inv, irq_control, cspace, thread);
    if let Err(e) = result {
        e.write_detail(reply);
        log::trace!("invoke: {} failed: {}", cap.name(), e);
    }
    to_return_value(result)
}
