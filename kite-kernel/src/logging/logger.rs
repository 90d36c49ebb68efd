//! Kernel Logging
//!
//! Provides logging infrastructure using the `log` crate.
//!
//! # Log Output
//!
//! Log messages are written to:
//! 1. A lock-free ring buffer (for userspace draining)
//! 2. An optional console sink installed by the platform during bring-up

use core::fmt::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::logging::buffer::{self, LogEntry};

/// Console output callback.
pub type ConsoleSink = fn(&str);

static CONSOLE: Mutex<Option<ConsoleSink>> = Mutex::new(None);

/// Stack buffer for formatting log messages before pushing to the lock-free queue
struct MessageBuffer {
    data: [u8; buffer::LOG_ENTRY_CONTENT_SIZE],
    len: usize,
}

impl MessageBuffer {
    const fn new() -> Self {
        Self {
            data: [0u8; buffer::LOG_ENTRY_CONTENT_SIZE],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        core::str::from_utf8(&self.data[..self.len]).unwrap_or("<invalid>")
    }
}

impl Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let remaining = buffer::LOG_ENTRY_CONTENT_SIZE - self.len;
        let mut to_copy = s.len().min(remaining);
        while !s.is_char_boundary(to_copy) {
            to_copy -= 1;
        }
        self.data[self.len..self.len + to_copy].copy_from_slice(&s.as_bytes()[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}

/// Kernel logger implementation
struct KernelLogger;

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let sequence = buffer::next_sequence();

        // Format message into stack buffer (no locks!)
        let mut msg_buf = MessageBuffer::new();
        let _ = write!(msg_buf, "{}", record.args());

        buffer::push(LogEntry::new(
            sequence,
            record.level(),
            record.target(),
            msg_buf.as_str(),
        ));

        let sink = *CONSOLE.lock();
        if let Some(puts) = sink {
            let level_str = match record.level() {
                Level::Error => "ERROR",
                Level::Warn => " WARN",
                Level::Info => " INFO",
                Level::Debug => "DEBUG",
                Level::Trace => "TRACE",
            };
            let mut console_buf = MessageBuffer::new();
            let _ = writeln!(
                console_buf,
                "[{:>6}] {} {}: {}",
                sequence,
                level_str,
                record.target(),
                msg_buf.as_str()
            );
            puts(console_buf.as_str());
        }
    }

    fn flush(&self) {}
}

/// Global logger instance
static LOGGER: KernelLogger = KernelLogger;

/// Initialise the logging system
pub fn init() {
    buffer::enable();

    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Debug))
        .ok();
}

/// Mirror log records to `sink` as well as the ring buffer.
pub fn set_console(sink: ConsoleSink) {
    *CONSOLE.lock() = Some(sink);
}

/// Stop mirroring to the console
///
/// Call this when a userspace console driver has taken over and drains the
/// ring buffer itself.
pub fn disable_console() {
    *CONSOLE.lock() = None;
}
