//! Capability error types
//!
//! This module defines the errors reported by the CSpace collaborator while
//! resolving, checking and filling capability slots.

use core::fmt;

/// Errors that can occur during capability slot operations.
///
/// The invocation decoders never wrap these; they are converted one-to-one
/// into syscall failures so the caller sees exactly what the lookup saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use = "capability errors must be handled"]
pub enum CapError {
    /// The capability used as a CSpace root is not a CNode capability.
    InvalidRoot,

    /// The slot index is out of bounds for the CNode.
    InvalidIndex,

    /// The requested resolution depth is outside `1..=64`.
    InvalidDepth,

    /// CPtr guard value did not match.
    ///
    /// The guard bits in the CPtr did not match the CNode's guard.
    GuardMismatch,

    /// CPtr resolution depth mismatch.
    ///
    /// Resolution ran out of bits part way through a CNode level, or bits
    /// were left over after reaching a slot that is not a CNode.
    DepthMismatch,

    /// The destination slot is already occupied.
    ///
    /// Capabilities cannot overwrite existing capabilities.
    /// Delete the existing capability first.
    SlotOccupied,

    /// The source slot is empty (no capability present).
    EmptySlot,

    /// The CNode referenced by a capability does not exist.
    ObjectNotFound,
}

impl CapError {
    /// Get a short description of the error.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRoot => "CSpace root is not a CNode",
            Self::InvalidIndex => "invalid slot index",
            Self::InvalidDepth => "invalid resolution depth",
            Self::GuardMismatch => "CPtr guard mismatch",
            Self::DepthMismatch => "CPtr resolution depth mismatch",
            Self::SlotOccupied => "destination slot is occupied",
            Self::EmptySlot => "slot is empty",
            Self::ObjectNotFound => "object not found",
        }
    }

    /// Whether this error is a lookup fault (as opposed to a slot state error).
    #[must_use]
    pub const fn is_lookup_fault(self) -> bool {
        !matches!(self, Self::SlotOccupied | Self::EmptySlot | Self::InvalidDepth)
    }
}

impl fmt::Display for CapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result type for capability operations.
pub type CapResult<T> = Result<T, CapError>;
