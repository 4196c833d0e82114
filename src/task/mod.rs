//! Peripheral tasks.
//!
//! A [`Task`] is one bounded unit of peripheral activity. `run` always
//! returns after a fixed number of steps; `release` frees whatever handle
//! the task still holds and is a no-op when there is none.
//!
//! Handle policy differs per variant:
//!
//! | variant          | handle lifetime                 |
//! |------------------|---------------------------------|
//! | GPIO blink       | opened and closed inside `run`  |
//! | LED blink        | opened and closed per LED       |
//! | PWM sweep        | first `run` until `release`     |
//! | Temperature poll | first `run` until `release`     |
//!
//! I/O errors never leave a task: they are logged at this boundary and the
//! run ends without a result. A failure does not release a held handle.

pub mod gpio;
pub mod led;
pub mod pwm;
pub mod temperature;

use embedded_hal_async::delay::DelayNs;

pub use gpio::GpioBlink;
pub use led::LedBlink;
pub use pwm::PwmSweep;
pub use temperature::TemperaturePoll;

use crate::bmp280::Celsius;
use crate::board::{Board, PinRole};
use crate::config::{BMP280_I2C_ADDRESS, MAX_TASKS, PREFERRED_GPIO_PORT};
use crate::error::Error;
use crate::peripheral::PeripheralManager;

/// Ordered task list; insertion order is cycle order.
pub type TaskList<P> = heapless::Vec<Task<P>, MAX_TASKS>;

/// The demo task set for `board`: GPIO blink, LED blink, servo sweep and
/// temperature poll, in that order.
///
/// Every port is resolved up front, so a board without a servo or sensor
/// mapping fails with [`Error::UnknownBoard`] before a scheduler exists.
pub fn board_tasks<P: PeripheralManager>(board: Board) -> Result<TaskList<P>, Error> {
    let pwm = board.require(PinRole::Pwm)?;
    let bus = board.require(PinRole::I2c)?;
    info!("Board {:?}: servo on {}, sensor on {}", board, pwm, bus);

    crate::scheduler::task_list([
        Task::gpio_blink(PREFERRED_GPIO_PORT),
        Task::led_blink(),
        Task::pwm_sweep(pwm),
        Task::temperature_poll(bus),
    ])
}

pub enum Task<P: PeripheralManager> {
    GpioBlink(GpioBlink),
    LedBlink(LedBlink),
    PwmSweep(PwmSweep<P::Pwm>),
    TemperaturePoll(TemperaturePoll<P::I2c>),
}

impl<P: PeripheralManager> Task<P> {
    /// Blink `preferred` if the platform has it, else the first GPIO.
    pub fn gpio_blink(preferred: &'static str) -> Self {
        Task::GpioBlink(GpioBlink::new(preferred))
    }

    pub fn led_blink() -> Self {
        Task::LedBlink(LedBlink::new())
    }

    pub fn pwm_sweep(port: &'static str) -> Self {
        Task::PwmSweep(PwmSweep::new(port))
    }

    /// Poll a BMP280 at the default address on `bus`.
    pub fn temperature_poll(bus: &'static str) -> Self {
        Task::TemperaturePoll(TemperaturePoll::new(bus, BMP280_I2C_ADDRESS))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Task::GpioBlink(_) => "GpioBlink",
            Task::LedBlink(_) => "LedBlink",
            Task::PwmSweep(_) => "PwmSweep",
            Task::TemperaturePoll(_) => "TemperaturePoll",
        }
    }

    /// Whether a peripheral handle is held between runs.
    pub fn holds_handle(&self) -> bool {
        match self {
            Task::GpioBlink(_) | Task::LedBlink(_) => false,
            Task::PwmSweep(t) => t.is_open(),
            Task::TemperaturePoll(t) => t.is_open(),
        }
    }

    /// Run one unit of work. Returns a reading when the task produced one.
    pub async fn run<D: DelayNs>(&mut self, platform: &mut P, delay: &mut D) -> Option<Celsius> {
        let name = self.name();
        info!("Executing task {}", name);

        let result = match self {
            Task::GpioBlink(t) => t.run(platform, delay).await.map(|_| None),
            Task::LedBlink(t) => t.run(platform, delay).await.map(|_| None),
            Task::PwmSweep(t) => t.run(platform, delay).await.map(|_| None),
            Task::TemperaturePoll(t) => t.run(platform).map(Some),
        };

        match result {
            Ok(reading) => reading,
            Err(e) => {
                error!("Error on peripheral I/O in {}: {:?}", name, e);
                None
            }
        }
    }

    /// Free any held handle. Idempotent.
    pub fn release(&mut self) {
        match self {
            Task::GpioBlink(_) | Task::LedBlink(_) => {}
            Task::PwmSweep(t) => t.release(),
            Task::TemperaturePoll(t) => t.release(),
        }
    }
}
