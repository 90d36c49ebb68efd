//! Kite Capability Primitives
//!
//! This crate provides the capability types shared by the Kite kernel and
//! its userspace ABI, following seL4's capability model.
//!
//! # Overview
//!
//! A **capability** is an unforgeable token naming a kernel object and the
//! operations its holder may perform. Capabilities live in slots of CNodes;
//! a CSpace is the tree of CNodes reachable from a thread's root CNode.
//!
//! # Core Types
//!
//! - [`Cap`]: The closed set of capability kinds, matched exhaustively
//! - [`CapSlot`]: A slot holding zero or one capability plus its derivation parent
//! - [`SlotRef`]: Address of a slot (CNode id + index)
//! - [`Badge`]: Provenance tag carried by minted capabilities
//! - [`CPtr`]: Capability pointer for addressing slots in the CSpace
//!
//! # Interrupt Objects
//!
//! The [`objects::irq`] module defines the interrupt identity model used by
//! the IRQControl, IRQHandler and SGI-Signal capabilities:
//!
//! | Capability | Authority |
//! |------------|-----------|
//! | `IrqControl` | Create handler and SGI-signal capabilities, retarget shared interrupts |
//! | `IrqHandler` | Receive one interrupt identity |
//! | `SgiSignal` | Send one software-generated interrupt to one target |
//!
//! # Kernel Integration
//!
//! This crate defines the capability logic; the kernel provides storage.
//! The [`CNodeOps`] trait is the interface between slot resolution in the
//! kernel and the invocation decoders that insert new capabilities.
//!
//! [`CNodeOps`]: cnode::CNodeOps

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

mod badge;
mod cap;
pub mod cnode;
mod cptr;
mod error;
pub mod objects;
pub mod root_slots;
mod slot;

pub use badge::Badge;
pub use cap::Cap;
pub use cnode::{CNodeGuard, CNodeId, CNodeOps, CNodeRadix, MAX_CNODE_RADIX, MIN_CNODE_RADIX};
pub use cptr::{CPtr, CptrDepth};
pub use error::{CapError, CapResult};
pub use slot::{CapSlot, SlotRef};
