//! Kite Invocation ABI
//!
//! Shared definitions for kernel-userspace communication.
//! This crate is `no_std` and has no external dependencies, allowing it to
//! be used in both the kernel and userspace.
//!
//! # Modules
//!
//! - [`numbers`] - Invocation labels
//! - [`error`] - Error codes and error detail layout
//! - [`message`] - Message-info word and argument buffer access

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod message;
pub mod numbers;

pub use error::ErrorCode;
pub use kite_cap::root_slots;
pub use message::{MSG_MAX_EXTRA_CAPS, MSG_MAX_LENGTH, MessageInfo, get_arg};
pub use numbers::InvocationLabel;
