//! Message-info word and argument buffer
//!
//! An invocation carries a message-info word describing the message, a
//! buffer of positional argument words, and up to [`MSG_MAX_EXTRA_CAPS`]
//! extra capability pointers.
//!
//! # Message-info Layout
//!
//! ```text
//! 63                    12 11     9 8   7 6        0
//! |        label         | unwrap | caps |  length  |
//! ```

/// Maximum number of argument words in a message.
pub const MSG_MAX_LENGTH: usize = 120;

/// Maximum number of extra capabilities in a message.
pub const MSG_MAX_EXTRA_CAPS: usize = 3;

const LENGTH_BITS: u32 = 7;
const EXTRA_CAPS_SHIFT: u32 = 7;
const EXTRA_CAPS_BITS: u32 = 2;
const UNWRAPPED_SHIFT: u32 = 9;
const UNWRAPPED_BITS: u32 = 3;
const LABEL_SHIFT: u32 = 12;

/// Decoded message-info word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MessageInfo {
    /// Invocation label.
    pub label: u64,
    /// Bitmask of extra caps that were unwrapped.
    pub caps_unwrapped: u8,
    /// Number of extra capabilities.
    pub extra_caps: u8,
    /// Number of argument words.
    pub length: u8,
}

impl MessageInfo {
    /// Build a message-info value.
    ///
    /// `length` is clamped to [`MSG_MAX_LENGTH`] and `extra_caps` to
    /// [`MSG_MAX_EXTRA_CAPS`].
    #[must_use]
    pub const fn new(label: u64, extra_caps: u8, length: u8) -> Self {
        let length = if length as usize > MSG_MAX_LENGTH {
            MSG_MAX_LENGTH as u8
        } else {
            length
        };
        let extra_caps = if extra_caps as usize > MSG_MAX_EXTRA_CAPS {
            MSG_MAX_EXTRA_CAPS as u8
        } else {
            extra_caps
        };
        Self {
            label,
            caps_unwrapped: 0,
            extra_caps,
            length,
        }
    }

    /// Decode from the raw word.
    ///
    /// Out-of-range length and extra-cap counts are clamped, so a hostile
    /// caller cannot make the kernel read beyond the argument buffer.
    #[must_use]
    pub const fn from_word(word: u64) -> Self {
        let length = (word & field_mask(LENGTH_BITS)) as u8;
        let extra_caps = ((word >> EXTRA_CAPS_SHIFT) & field_mask(EXTRA_CAPS_BITS)) as u8;
        let mut info = Self::new(word >> LABEL_SHIFT, extra_caps, length);
        info.caps_unwrapped = ((word >> UNWRAPPED_SHIFT) & field_mask(UNWRAPPED_BITS)) as u8;
        info
    }

    /// Encode to the raw word.
    #[must_use]
    pub const fn to_word(self) -> u64 {
        (self.label << LABEL_SHIFT)
            | ((self.caps_unwrapped as u64 & field_mask(UNWRAPPED_BITS)) << UNWRAPPED_SHIFT)
            | ((self.extra_caps as u64 & field_mask(EXTRA_CAPS_BITS)) << EXTRA_CAPS_SHIFT)
            | (self.length as u64 & field_mask(LENGTH_BITS))
    }
}

const fn field_mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// Read positional argument `index`.
///
/// Returns 0 for words beyond the end of `args`; decoders check the
/// message length before reading.
#[inline]
#[must_use]
pub fn get_arg(args: &[u64], index: usize) -> u64 {
    args.get(index).copied().unwrap_or(0)
}
