//! Kernel Log Ring Buffer
//!
//! Stores kernel log messages in a lock-free ring buffer for userspace draining.
//!
//! # Design
//!
//! - Lock-free MPMC queue using thingbuf
//! - 256 fixed-size log entry slots
//! - Interrupt-safe: no locks, safe to call from any context
//! - Overflow drops new messages (returns Full)

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use thingbuf::StaticThingBuf;

/// Maximum size of a single log entry's content (target + message)
pub const LOG_ENTRY_CONTENT_SIZE: usize = 240;

/// Number of log entry slots in the buffer
pub const LOG_BUFFER_SLOTS: usize = 256;

/// A single log entry with fixed-size storage
#[derive(Clone)]
pub struct LogEntry {
    /// Position of this entry in the order records were logged
    pub sequence: u64,
    /// Log level (0=Error, 1=Warn, 2=Info, 3=Debug, 4=Trace)
    pub level: u8,
    /// Length of the target string
    pub target_len: u8,
    /// Length of the message
    pub message_len: u16,
    /// Combined target + message content
    /// Layout: [target bytes][message bytes]
    pub content: [u8; LOG_ENTRY_CONTENT_SIZE],
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            sequence: 0,
            level: 0,
            target_len: 0,
            message_len: 0,
            content: [0u8; LOG_ENTRY_CONTENT_SIZE],
        }
    }
}

impl LogEntry {
    /// Create a new log entry, truncating target and message to fit.
    pub fn new(sequence: u64, level: log::Level, target: &str, message: &str) -> Self {
        let mut entry = Self {
            sequence,
            level: level_to_u8(level),
            ..Self::default()
        };

        let target_len =
            floor_char_boundary(target, LOG_ENTRY_CONTENT_SIZE.min(u8::MAX as usize));
        entry.content[..target_len].copy_from_slice(&target.as_bytes()[..target_len]);
        entry.target_len = target_len as u8;

        let remaining = LOG_ENTRY_CONTENT_SIZE - target_len;
        let message_len = floor_char_boundary(message, remaining);
        entry.content[target_len..target_len + message_len]
            .copy_from_slice(&message.as_bytes()[..message_len]);
        entry.message_len = message_len as u16;

        entry
    }

    /// Get the target string
    pub fn target(&self) -> &str {
        let len = self.target_len as usize;
        core::str::from_utf8(&self.content[..len]).unwrap_or("<invalid>")
    }

    /// Get the message string
    pub fn message(&self) -> &str {
        let target_len = self.target_len as usize;
        let message_len = self.message_len as usize;
        core::str::from_utf8(&self.content[target_len..target_len + message_len])
            .unwrap_or("<invalid>")
    }

    pub fn level(&self) -> log::Level {
        u8_to_level(self.level)
    }

    /// Write "[LEVEL] target: message\n" to the front of `out`.
    ///
    /// Returns the number of bytes written, or `None` if the entry does not fit.
    pub fn format_into(&self, out: &mut [u8]) -> Option<usize> {
        let level = level_tag(self.level);
        let target = self.target().as_bytes();
        let message = self.message().as_bytes();
        let needed = level.len() + 1 + target.len() + 2 + message.len() + 1;
        if needed > out.len() {
            return None;
        }

        let parts: [&[u8]; 6] = [level.as_bytes(), b" ", target, b": ", message, b"\n"];
        let mut written = 0;
        for part in parts {
            out[written..written + part.len()].copy_from_slice(part);
            written += part.len();
        }
        Some(written)
    }
}

/// Largest prefix length of `s` no longer than `max` that ends on a char boundary.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut len = max;
    while !s.is_char_boundary(len) {
        len -= 1;
    }
    len
}

fn level_to_u8(level: log::Level) -> u8 {
    match level {
        log::Level::Error => 0,
        log::Level::Warn => 1,
        log::Level::Info => 2,
        log::Level::Debug => 3,
        log::Level::Trace => 4,
    }
}

/// Convert u8 back to log level
pub fn u8_to_level(val: u8) -> log::Level {
    match val {
        0 => log::Level::Error,
        1 => log::Level::Warn,
        2 => log::Level::Info,
        3 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

fn level_tag(level: u8) -> &'static str {
    match level {
        0 => "[ERROR]",
        1 => "[WARN ]",
        2 => "[INFO ]",
        3 => "[DEBUG]",
        _ => "[TRACE]",
    }
}

/// Lock-free log buffer using thingbuf
static LOG_BUFFER: StaticThingBuf<LogEntry, LOG_BUFFER_SLOTS> = StaticThingBuf::new();

static BUFFER_ENABLED: AtomicBool = AtomicBool::new(false);
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);
static DROPPED: AtomicU64 = AtomicU64::new(0);

/// Enable the log buffer
pub fn enable() {
    BUFFER_ENABLED.store(true, Ordering::Release);
}

/// Allocate the next sequence number.
pub fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Push a log entry to the buffer
///
/// This is lock-free and interrupt-safe.
/// Returns true if the entry was queued, false if the buffer is full.
pub fn push(entry: LogEntry) -> bool {
    if !BUFFER_ENABLED.load(Ordering::Acquire) {
        return false;
    }

    let queued = LOG_BUFFER.push(entry).is_ok();
    if !queued {
        DROPPED.fetch_add(1, Ordering::Relaxed);
    }
    queued
}

/// Pop a log entry from the buffer
///
/// Returns None if the buffer is empty.
pub fn pop() -> Option<LogEntry> {
    if !BUFFER_ENABLED.load(Ordering::Acquire) {
        return None;
    }

    LOG_BUFFER.pop()
}

/// Drain entries into a byte buffer
///
/// Formats each log entry and writes it to the output buffer.
/// Returns the number of bytes written.
pub fn drain(out: &mut [u8]) -> usize {
    if !BUFFER_ENABLED.load(Ordering::Acquire) {
        return 0;
    }

    let mut written = 0;
    while let Some(entry) = LOG_BUFFER.pop() {
        match entry.format_into(&mut out[written..]) {
            Some(n) => written += n,
            // The popped entry is lost.
            None => break,
        }
    }
    written
}

/// Discard everything currently queued.
pub fn reset_read_position() {
    if !BUFFER_ENABLED.load(Ordering::Acquire) {
        return;
    }

    while LOG_BUFFER.pop().is_some() {}
}

/// Statistics about the log buffer
#[derive(Debug, Clone, Copy)]
pub struct LogBufferStats {
    /// Number of entries currently in the buffer
    pub entries: usize,
    /// Total capacity
    pub capacity: usize,
    /// Entries dropped because the buffer was full
    pub dropped: u64,
}

/// Get log buffer statistics
pub fn stats() -> LogBufferStats {
    LogBufferStats {
        entries: LOG_BUFFER.len(),
        capacity: LOG_BUFFER.capacity(),
        dropped: DROPPED.load(Ordering::Relaxed),
    }
}
