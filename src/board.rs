//! Board detection and pin-name resolution.
//!
//! Maps a logical role (status LED, button, servo PWM, sensor bus) to the
//! platform-specific port name of each supported board. Tasks and the
//! scheduler only ever see the resolved name.
//!
//! | role   | edison | rpi3  | imx6ul  |
//! |--------|--------|-------|---------|
//! | LED    | IO13   | BCM6  | 26      |
//! | Button | IO12   | BCM21 | GPIO_25 |
//! | PWM    | IO6    | PWM0  | 26      |
//! | I2C    | I2C6   | I2C1  | -       |

use crate::error::Error;

/// Boards with a known pin mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Board {
    /// Intel Edison on the Arduino breakout.
    Edison,
    /// Raspberry Pi 3.
    RaspberryPi3,
    /// NXP i.MX6UL.
    Imx6ul,
}

/// Logical peripheral roles a board maps to a port name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// GPIO driving an LED.
    Led,
    /// GPIO wired to a push button.
    Button,
    /// PWM output driving the servo.
    Pwm,
    /// I2C bus the temperature sensor sits on.
    I2c,
}

impl Board {
    /// Identify the board from the platform's device string.
    pub fn from_device(device: &str) -> Result<Self, Error> {
        match device {
            "edison" => Ok(Board::Edison),
            "rpi3" => Ok(Board::RaspberryPi3),
            "imx6ul" | "nxp" => Ok(Board::Imx6ul),
            _ => {
                error!("Unknown board device {}", device);
                Err(Error::UnknownBoard)
            }
        }
    }

    /// Port name for `role`, if this board has one.
    pub fn port(self, role: PinRole) -> Option<&'static str> {
        match (self, role) {
            (Board::Edison, PinRole::Led) => Some("IO13"),
            (Board::Edison, PinRole::Button) => Some("IO12"),
            (Board::Edison, PinRole::Pwm) => Some("IO6"),
            (Board::Edison, PinRole::I2c) => Some("I2C6"),

            (Board::RaspberryPi3, PinRole::Led) => Some("BCM6"),
            (Board::RaspberryPi3, PinRole::Button) => Some("BCM21"),
            (Board::RaspberryPi3, PinRole::Pwm) => Some("PWM0"),
            (Board::RaspberryPi3, PinRole::I2c) => Some("I2C1"),

            (Board::Imx6ul, PinRole::Led) => Some("26"),
            (Board::Imx6ul, PinRole::Button) => Some("GPIO_25"),
            (Board::Imx6ul, PinRole::Pwm) => Some("26"),
            // No confirmed sensor bus on this board.
            (Board::Imx6ul, PinRole::I2c) => None,
        }
    }

    /// Like [`Board::port`], but an unmapped role is a startup error.
    pub fn require(self, role: PinRole) -> Result<&'static str, Error> {
        self.port(role).ok_or_else(|| {
            error!("Board {:?} has no port for {:?}", self, role);
            Error::UnknownBoard
        })
    }
}
