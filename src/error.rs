//! Unified error type for simplepio.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for on-target logging.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Peripheral I/O
    /// The platform transport reported a failure.
    Io(IoError),

    // Startup
    /// The running board has no known pin-name mapping for a required role.
    UnknownBoard,

    /// The scheduler was built with an empty task list.
    NoTasks,

    /// More tasks than `config::MAX_TASKS` were supplied.
    TooManyTasks,

    // Dispatch
    /// The command queue has no free slot; nothing was enqueued.
    QueueFull,

    /// The scheduler has been shut down and accepts no further commands.
    ShutDown,
}

/// Failures reported by the peripheral transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// The name is not part of the platform's enumeration.
    NotFound,
    /// The peripheral is already open; handles are single-user.
    Busy,
    /// Bus or register transfer failed.
    Transfer,
    /// Raw platform error code.
    Errno(i32),
}

// Convenience conversions

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "peripheral I/O error: {}", e),
            Error::UnknownBoard => f.write_str("unknown board"),
            Error::NoTasks => f.write_str("no tasks to schedule"),
            Error::TooManyTasks => f.write_str("too many tasks"),
            Error::QueueFull => f.write_str("command queue full"),
            Error::ShutDown => f.write_str("scheduler shut down"),
        }
    }
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IoError::NotFound => f.write_str("no such peripheral"),
            IoError::Busy => f.write_str("peripheral busy"),
            IoError::Transfer => f.write_str("transfer failed"),
            IoError::Errno(code) => write!(f, "errno {}", code),
        }
    }
}
