//! Platform peripheral transport.
//!
//! The platform owns enumeration and opening of named peripherals; this
//! crate only consumes the primitive operations below. Every call blocks
//! on the underlying transport and must only be made from the worker.
//!
//! Handles are single-user: opening a name that is already open fails
//! with [`IoError::Busy`]. `close` consumes the handle, so a handle can
//! never be closed twice.

use embedded_hal::i2c::I2c;
use heapless::{String, Vec};

use crate::config::{MAX_PORTS, MAX_PORT_NAME_LEN};
use crate::error::IoError;

/// A peripheral name as reported by the platform enumeration.
pub type PortName = String<MAX_PORT_NAME_LEN>;

/// Result of one enumeration.
pub type PortList = Vec<PortName, MAX_PORTS>;

/// Peripheral kinds the platform can enumerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralKind {
    Gpio,
    Led,
    Pwm,
    I2c,
}

/// Release an opened peripheral.
pub trait Close {
    fn close(self) -> Result<(), IoError>;
}

/// Digital pin.
pub trait GpioPin: Close {
    /// Switch to output, driving `initially_high` immediately.
    fn set_output(&mut self, initially_high: bool) -> Result<(), IoError>;
    fn set_value(&mut self, high: bool) -> Result<(), IoError>;
}

/// Onboard LED with a brightness scale of `0..=max_brightness()`.
pub trait LedHandle: Close {
    fn max_brightness(&mut self) -> Result<u32, IoError>;
    fn set_brightness(&mut self, level: u32) -> Result<(), IoError>;
}

/// PWM output channel.
pub trait PwmChannel: Close {
    fn set_frequency_hz(&mut self, hz: f64) -> Result<(), IoError>;
    /// Duty cycle in percent (0.0 ..= 100.0).
    fn set_duty_cycle(&mut self, percent: f64) -> Result<(), IoError>;
    fn set_enabled(&mut self, enabled: bool) -> Result<(), IoError>;
}

/// Register-addressed I2C device.
pub trait RegisterDevice: Close {
    fn read_reg_byte(&mut self, reg: u8) -> Result<u8, IoError>;
    fn write_reg_byte(&mut self, reg: u8, value: u8) -> Result<(), IoError>;
    /// Burst read starting at `reg`, filling `buf`.
    fn read_reg_buffer(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), IoError>;
}

/// Enumeration and opening of named peripherals.
pub trait PeripheralManager {
    type Gpio: GpioPin;
    type Led: LedHandle;
    type Pwm: PwmChannel;
    type I2c: RegisterDevice;

    fn list(&mut self, kind: PeripheralKind) -> Result<PortList, IoError>;
    fn open_gpio(&mut self, name: &str) -> Result<Self::Gpio, IoError>;
    fn open_led(&mut self, name: &str) -> Result<Self::Led, IoError>;
    fn open_pwm(&mut self, name: &str) -> Result<Self::Pwm, IoError>;
    fn open_i2c(&mut self, bus: &str, address: u8) -> Result<Self::I2c, IoError>;
}

/// [`RegisterDevice`] over any `embedded-hal` I2C bus.
///
/// Register reads are a single write-then-read transaction; writes send
/// `[reg, value]`.
pub struct BusDevice<I2C> {
    bus: I2C,
    address: u8,
}

impl<I2C: I2c> BusDevice<I2C> {
    pub fn new(bus: I2C, address: u8) -> Self {
        Self { bus, address }
    }

}

impl<I2C: I2c> Close for BusDevice<I2C> {
    fn close(self) -> Result<(), IoError> {
        drop(self.bus);
        Ok(())
    }
}

impl<I2C: I2c> RegisterDevice for BusDevice<I2C> {
    fn read_reg_byte(&mut self, reg: u8) -> Result<u8, IoError> {
        let mut buf = [0u8; 1];
        self.read_reg_buffer(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write_reg_byte(&mut self, reg: u8, value: u8) -> Result<(), IoError> {
        self.bus
            .write(self.address, &[reg, value])
            .map_err(|_| IoError::Transfer)
    }

    fn read_reg_buffer(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), IoError> {
        self.bus
            .write_read(self.address, &[reg], buf)
            .map_err(|_| IoError::Transfer)
    }
}
