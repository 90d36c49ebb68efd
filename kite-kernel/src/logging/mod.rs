pub mod buffer;
pub mod logger;

pub use logger::{disable_console, init, set_console};
