//! Capability storage
//!
//! The kernel side of the capability model: CNode storage, CPtr resolution
//! and the [`CNodeOps`](kite_cap::CNodeOps) implementation invocation
//! decoders use to place new capabilities.

pub mod cspace;

pub use cspace::CSpace;
