//! Peripheral task scheduler with exclusive handle lifecycle management.
//!
//! A fixed list of peripheral [`Task`](task::Task)s (GPIO blink, LED blink,
//! servo PWM sweep, BMP280 temperature poll) is cycled by external
//! triggers. At most one task runs at a time on a single worker, and the
//! selected task is always released before the selection moves on.
//!
//! The platform transport (enumerating and opening named peripherals) is
//! supplied by the caller through [`peripheral::PeripheralManager`].
//!
//! Usage: `cargo test` runs everything on the host.
//!
//! Logging goes through `defmt` (feature `defmt`) or `log` (feature `log`).

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in every module.
mod fmt;

pub mod bmp280;
pub mod board;
pub mod config;
pub mod error;
pub mod input;
pub mod peripheral;
pub mod scheduler;
pub mod task;

pub use bmp280::{CalibrationData, Celsius};
pub use board::{Board, PinRole};
pub use error::{Error, IoError};
pub use input::Trigger;
pub use scheduler::{Command, TaskScheduler, Worker, WorkerState};
pub use task::{board_tasks, Task, TaskList};
