//! Invocation error codes
//!
//! Defines the error codes returned from object invocations. Negative values
//! indicate errors, zero indicates success. Some errors carry detail words
//! that the kernel writes to the start of the caller's message buffer:
//!
//! | Code | Detail words |
//! |------|--------------|
//! | `InvalidArgument` | `[argument index]` |
//! | `InvalidCapability` | `[capability index]` |
//! | `RangeError` | `[min, max]` |
//! | `FailedLookup` | `[lookup fault kind]` |

/// Invocation return codes.
#[repr(i64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// Success.
    Ok = 0,
    /// An argument failed a platform-specific validity check.
    InvalidArgument = -1,
    /// A capability argument is of the wrong kind.
    InvalidCapability = -2,
    /// The operation is not permitted or not supported here.
    IllegalOperation = -3,
    /// A numeric argument is outside a closed range.
    RangeError = -4,
    /// Alignment error.
    AlignmentError = -5,
    /// Capability lookup failed.
    FailedLookup = -6,
    /// Not enough argument words or extra capabilities.
    TruncatedMessage = -7,
    /// Destination slot occupied.
    DeleteFirst = -8,
    /// Object already has an outstanding capability.
    RevokeFirst = -9,
    /// Out of memory.
    NotEnoughMemory = -10,
}

/// Number of detail words an error can carry.
pub const MAX_ERROR_DETAIL_WORDS: usize = 2;

impl ErrorCode {
    /// Convert to raw i64 for return.
    #[inline]
    pub const fn as_i64(self) -> i64 {
        self as i64
    }

    /// Check if this represents success.
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Try to convert from a raw i64 value.
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            -1 => Some(Self::InvalidArgument),
            -2 => Some(Self::InvalidCapability),
            -3 => Some(Self::IllegalOperation),
            -4 => Some(Self::RangeError),
            -5 => Some(Self::AlignmentError),
            -6 => Some(Self::FailedLookup),
            -7 => Some(Self::TruncatedMessage),
            -8 => Some(Self::DeleteFirst),
            -9 => Some(Self::RevokeFirst),
            -10 => Some(Self::NotEnoughMemory),
            _ => None,
        }
    }

    /// Get the error name for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidCapability => "InvalidCapability",
            Self::IllegalOperation => "IllegalOperation",
            Self::RangeError => "RangeError",
            Self::AlignmentError => "AlignmentError",
            Self::FailedLookup => "FailedLookup",
            Self::TruncatedMessage => "TruncatedMessage",
            Self::DeleteFirst => "DeleteFirst",
            Self::RevokeFirst => "RevokeFirst",
            Self::NotEnoughMemory => "NotEnoughMemory",
        }
    }
}
