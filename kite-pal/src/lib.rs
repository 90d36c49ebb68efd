//! Platform Abstraction Layer
//!
//! Provides the interrupt-controller abstraction used by the kernel's IRQ
//! capability decoders:
//! - GICv2 distributor (QEMU virt and most Cortex-A boards)
//!
//! All platform-specific code is behind the [`InterruptController`] trait.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod gic;
pub mod platform;

pub use gic::{GicError, GicV2Distributor, InterruptController, TargetMask, TargetRouting};
pub use platform::PlatformInfo;
