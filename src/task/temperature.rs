//! BMP280 temperature poll over I2C.
//!
//! On the first run of an activation the device is opened, identified,
//! switched to normal mode and its calibration words read. Every run then
//! does one burst read and reports the compensated value. The device stays
//! open until [`TemperaturePoll::release`].

use crate::bmp280::{
    self, CalibrationData, Celsius, CALIB_LEN, CHIP_ID, REG_CALIB, REG_CTRL_MEAS, REG_ID,
    REG_TEMP, TEMP_BURST_LEN,
};
use crate::error::IoError;
use crate::peripheral::{PeripheralManager, RegisterDevice};

pub struct TemperaturePoll<H> {
    bus: &'static str,
    address: u8,
    device: Option<H>,
    calibration: Option<CalibrationData>,
}

impl<H: RegisterDevice> TemperaturePoll<H> {
    pub const fn new(bus: &'static str, address: u8) -> Self {
        Self {
            bus,
            address,
            device: None,
            calibration: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Calibration of the current activation, once read.
    pub fn calibration(&self) -> Option<CalibrationData> {
        self.calibration
    }

    pub fn run<P>(&mut self, platform: &mut P) -> Result<Celsius, IoError>
    where
        P: PeripheralManager<I2c = H>,
    {
        let device = match &mut self.device {
            Some(device) => device,
            None => {
                debug!("Opening I2C device for the sensor: {}", self.bus);
                self.device.insert(platform.open_i2c(self.bus, self.address)?)
            }
        };

        let calibration = match self.calibration {
            Some(calibration) => calibration,
            None => {
                let calibration = activate(device)?;
                self.calibration = Some(calibration);
                calibration
            }
        };

        let mut buf = [0u8; TEMP_BURST_LEN];
        device.read_reg_buffer(REG_TEMP, &mut buf)?;
        let raw = bmp280::decode_raw(buf[0], buf[1], buf[2]);
        let temperature = bmp280::compensate(raw, &calibration);
        info!("temperature: {}", temperature.0);
        Ok(temperature)
    }

    /// Close the device and forget the calibration. Safe to repeat.
    pub fn release(&mut self) {
        self.calibration = None;
        if let Some(device) = self.device.take() {
            info!("Closing sensor device on {}", self.bus);
            if let Err(e) = device.close() {
                error!("Error closing I2C device on {}: {:?}", self.bus, e);
            }
        }
    }
}

/// Identify the chip, start measuring and read the trimming words.
fn activate<H: RegisterDevice>(device: &mut H) -> Result<CalibrationData, IoError> {
    let chip_id = device.read_reg_byte(REG_ID)?;
    if chip_id != CHIP_ID {
        warn!("Unexpected sensor chip id {}", chip_id);
    } else {
        debug!("Sensor chip id: {}", chip_id);
    }

    device.write_reg_byte(REG_CTRL_MEAS, bmp280::ctrl_meas_value())?;

    let mut regs = [0u8; CALIB_LEN];
    device.read_reg_buffer(REG_CALIB, &mut regs)?;
    let calibration = CalibrationData::from_registers(&regs);
    debug!("Sensor calibration: {:?}", calibration);
    Ok(calibration)
}
