//! Handler implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "file")]
pub mod rotating_file;

#[cfg(feature = "console")]
pub use console::ConsoleHandler;
#[cfg(feature = "file")]
pub use file::FileHandler;
#[cfg(feature = "file")]
pub use rotating_file::{FileTarget, RotatingFileWriter, DEFAULT_FILE_PATTERN, MAX_UNIQUE_ATTEMPTS};

pub use crate::core::Handler;
