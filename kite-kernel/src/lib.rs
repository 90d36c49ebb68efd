//! # kite-kernel
//!
//! Interrupt control for the Kite microkernel on ARM GIC platforms.
//!
//! User-level drivers never touch the interrupt controller directly. They
//! hold capabilities, and the kernel decodes invocations on those
//! capabilities into checked operations on the GIC:
//!
//! | Invocation | Effect |
//! |------------|--------|
//! | `IssueIrqHandler` | New IRQHandler cap for an IRQ on the calling core |
//! | `IssueIrqHandlerTrigger` | As above, also programming level/edge trigger |
//! | `IssueIrqHandlerTriggerCore` | As above, for a chosen core (SMP) |
//! | `IssueSgiSignal` | New SGI-Signal cap for one SGI and target |
//! | `SetIrqTargetCore` | Re-route a shared interrupt (multikernel) |
//!
//! # Modules
//!
//! - [`irq`]: the IRQControl object and the active interrupt registry
//! - [`syscall`]: invocation decoding and error reporting
//! - [`cap`]: CNode storage and slot resolution
//! - [`config`]: build topology (uniprocessor, SMP, multikernel)
//! - [`sched`]: the invoking thread's state
//! - [`logging`]: `log` backend writing to a lock-free ring buffer

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod cap;
pub mod config;
pub mod irq;
pub mod logging;
pub mod sched;
pub mod syscall;

pub use config::{IrqConfig, Topology};
pub use irq::IrqControl;
pub use syscall::{Invocation, decode_invocation, handle_invocation};
