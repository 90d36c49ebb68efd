//! Invocation errors
//!
//! [`SyscallError`] is the failure an invocation decoder reports. Each
//! variant maps to one wire [`ErrorCode`]; some carry detail words that the
//! kernel writes into the caller's message buffer alongside the code.

use core::fmt;

use kite_cap::CapError;
use kite_pal::GicError;
use kite_syscall::ErrorCode;
use kite_syscall::error::MAX_ERROR_DETAIL_WORDS;

/// Largest CPtr resolution depth, in bits.
const WORD_BITS: u64 = 64;

/// Why a capability lookup failed.
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupFault {
    /// The CSpace root is not a CNode.
    InvalidRoot = 0,
    /// Resolution reached a slot with nothing usable in it.
    MissingCapability = 1,
    /// The CPtr ran out of bits mid-level, or bits were left over at a leaf.
    DepthMismatch = 2,
    /// A CNode guard did not match.
    GuardMismatch = 3,
}

/// Invocation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallError {
    /// Argument `index` failed a platform validity check.
    InvalidArgument { index: u64 },
    /// Capability argument `index` is of the wrong kind.
    InvalidCapability { index: u64 },
    /// Not permitted, or not available in this build.
    IllegalOperation,
    /// A numeric argument lies outside `min..=max`.
    RangeError { min: u64, max: u64 },
    /// Destination lookup failed.
    FailedLookup(LookupFault),
    /// Too few argument words or extra capabilities.
    TruncatedMessage,
    /// Destination slot occupied.
    DeleteFirst,
    /// Interrupt already has a live handler capability.
    RevokeFirst,
    /// Out of memory.
    NotEnoughMemory,
}

/// Detail words accompanying an error code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ErrorDetail {
    words: [u64; MAX_ERROR_DETAIL_WORDS],
    len: usize,
}

impl ErrorDetail {
    const fn none() -> Self {
        Self {
            words: [0; MAX_ERROR_DETAIL_WORDS],
            len: 0,
        }
    }

    const fn one(a: u64) -> Self {
        Self {
            words: [a, 0],
            len: 1,
        }
    }

    const fn two(a: u64, b: u64) -> Self {
        Self {
            words: [a, b],
            len: 2,
        }
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.words[..self.len]
    }
}

impl SyscallError {
    /// The wire error code.
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::InvalidCapability { .. } => ErrorCode::InvalidCapability,
            Self::IllegalOperation => ErrorCode::IllegalOperation,
            Self::RangeError { .. } => ErrorCode::RangeError,
            Self::FailedLookup(_) => ErrorCode::FailedLookup,
            Self::TruncatedMessage => ErrorCode::TruncatedMessage,
            Self::DeleteFirst => ErrorCode::DeleteFirst,
            Self::RevokeFirst => ErrorCode::RevokeFirst,
            Self::NotEnoughMemory => ErrorCode::NotEnoughMemory,
        }
    }

    /// Convert to raw i64 for return.
    #[inline]
    pub const fn as_i64(self) -> i64 {
        self.code().as_i64()
    }

    /// Get the error name for logging.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.code().name()
    }

    /// Detail words for the caller's message buffer.
    pub const fn detail_words(self) -> ErrorDetail {
        match self {
            Self::InvalidArgument { index } | Self::InvalidCapability { index } => {
                ErrorDetail::one(index)
            }
            Self::RangeError { min, max } => ErrorDetail::two(min, max),
            Self::FailedLookup(fault) => ErrorDetail::one(fault as u64),
            Self::IllegalOperation
            | Self::TruncatedMessage
            | Self::DeleteFirst
            | Self::RevokeFirst
            | Self::NotEnoughMemory => ErrorDetail::none(),
        }
    }

    /// Copy the detail words to the front of `out`, returning how many were written.
    pub fn write_detail(self, out: &mut [u64]) -> usize {
        let detail = self.detail_words();
        let words = detail.as_slice();
        let n = words.len().min(out.len());
        out[..n].copy_from_slice(&words[..n]);
        n
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { index } => write!(f, "{} (argument {})", self.name(), index),
            Self::InvalidCapability { index } => write!(f, "{} (cap {})", self.name(), index),
            Self::RangeError { min, max } => write!(f, "{} ({}..={})", self.name(), min, max),
            Self::FailedLookup(fault) => write!(f, "{} ({:?})", self.name(), fault),
            _ => f.write_str(self.name()),
        }
    }
}

impl From<CapError> for SyscallError {
    fn from(e: CapError) -> Self {
        match e {
            CapError::SlotOccupied => Self::DeleteFirst,
            CapError::InvalidDepth => Self::RangeError {
                min: 1,
                max: WORD_BITS,
            },
            CapError::InvalidRoot => Self::FailedLookup(LookupFault::InvalidRoot),
            CapError::GuardMismatch => Self::FailedLookup(LookupFault::GuardMismatch),
            CapError::DepthMismatch => Self::FailedLookup(LookupFault::DepthMismatch),
            CapError::InvalidIndex | CapError::EmptySlot | CapError::ObjectNotFound => {
                Self::FailedLookup(LookupFault::MissingCapability)
            }
        }
    }
}

impl From<GicError> for SyscallError {
    fn from(e: GicError) -> Self {
        match e {
            GicError::IrqOutOfRange { min, max } => Self::RangeError { min, max },
            GicError::TriggerUnsupported | GicError::NotShared(_) | GicError::TargetOutOfRange(_) => {
                Self::IllegalOperation
            }
        }
    }
}

/// Invocation result type.
pub type SyscallResult = Result<i64, SyscallError>;

/// Convert an invocation result to a raw return value.
#[inline]
pub fn to_return_value(result: SyscallResult) -> i64 {
    match result {
        Ok(v) => v,
        Err(e) => e.as_i64(),
    }
}
