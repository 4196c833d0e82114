//! BMP280 temperature decoding.
//!
//! Raw register layout (datasheet rev. 1.26):
//! ```text
//! 0x88..0x8D  dig_T1 (u16 LE), dig_T2 (i16 LE), dig_T3 (i16 LE)
//! 0xD0        chip id, 0x58
//! 0xF4        ctrl_meas: osrs_t[7:5] osrs_p[4:2] mode[1:0]
//! 0xFA..0xFC  temp msb[7:0], lsb[7:0], xlsb[7:4]
//! ```
//!
//! Everything here is pure; the register traffic lives in
//! [`crate::task::temperature`].

/// Chip identification register.
pub const REG_ID: u8 = 0xD0;
/// Measurement control register.
pub const REG_CTRL_MEAS: u8 = 0xF4;
/// First of three temperature data registers.
pub const REG_TEMP: u8 = 0xFA;
/// First temperature calibration register (dig_T1 LSB).
pub const REG_CALIB: u8 = 0x88;

/// Value of [`REG_ID`] on a genuine BMP280.
pub const CHIP_ID: u8 = 0x58;

/// ctrl_meas mode bits: normal (continuous) mode.
pub const POWER_MODE_NORMAL: u8 = 0b0000_0011;
/// ctrl_meas osrs_t bits: temperature oversampling x1.
pub const OVERSAMPLING_TEMP_1X: u8 = 0b0010_0000;

/// Number of bytes in one temperature burst.
pub const TEMP_BURST_LEN: usize = 3;
/// Number of bytes holding dig_T1..dig_T3.
pub const CALIB_LEN: usize = 6;

/// Compensated temperature in degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Celsius(pub f64);

/// Factory temperature trimming values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
}

impl CalibrationData {
    pub const fn new(dig_t1: u16, dig_t2: i16, dig_t3: i16) -> Self {
        Self {
            dig_t1,
            dig_t2,
            dig_t3,
        }
    }

    /// Parse the six bytes read from [`REG_CALIB`] onwards.
    pub fn from_registers(regs: &[u8; CALIB_LEN]) -> Self {
        Self {
            dig_t1: u16::from_le_bytes([regs[0], regs[1]]),
            dig_t2: to_signed(u16::from_le_bytes([regs[2], regs[3]])),
            dig_t3: to_signed(u16::from_le_bytes([regs[4], regs[5]])),
        }
    }
}

/// Reinterpret a register word as two's complement.
pub const fn to_signed(word: u16) -> i16 {
    word as i16
}

/// Assemble the 20-bit raw temperature from one burst.
///
/// The low nibble of `xlsb` carries no temperature bits and is masked off.
pub const fn decode_raw(msb: u8, lsb: u8, xlsb: u8) -> u32 {
    (((msb as u32) << 16) | ((lsb as u32) << 8) | ((xlsb & 0xF0) as u32)) >> 4
}

/// Double-precision compensation, datasheet section 8.1.
///
/// Operation order follows the datasheet exactly; do not refactor the
/// arithmetic or results drift from the reference values.
pub fn compensate(raw: u32, cal: &CalibrationData) -> Celsius {
    let adc_t = raw as f64;
    let dig_t1 = cal.dig_t1 as f64;
    let dig_t2 = cal.dig_t2 as f64;
    let dig_t3 = cal.dig_t3 as f64;

    let var1 = (adc_t / 16384.0 - dig_t1 / 1024.0) * dig_t2;
    let var2 = ((adc_t / 131072.0 - dig_t1 / 8192.0) * (adc_t / 131072.0 - dig_t1 / 8192.0))
        * dig_t3;
    Celsius((var1 + var2) / 5120.0)
}

/// Fixed-point compensation, datasheet section 3.11.3.
///
/// Returns hundredths of a degree (2508 = 25.08 °C). Intermediates are
/// 64-bit: a 20-bit raw value with arbitrary trimming words overflows the
/// datasheet's 32-bit products. The result always fits in `i32`.
pub fn compensate_fixed(raw: u32, cal: &CalibrationData) -> i32 {
    let adc_t = i64::from(raw);
    let dig_t1 = i64::from(cal.dig_t1);
    let dig_t2 = i64::from(cal.dig_t2);
    let dig_t3 = i64::from(cal.dig_t3);

    let var1 = (((adc_t >> 3) - (dig_t1 << 1)) * dig_t2) >> 11;
    let delta = (adc_t >> 4) - dig_t1;
    let var2 = (((delta * delta) >> 12) * dig_t3) >> 14;
    let t_fine = var1 + var2;
    ((t_fine * 5 + 128) >> 8) as i32
}

/// ctrl_meas value written on activation: normal mode, temperature x1,
/// pressure skipped.
pub const fn ctrl_meas_value() -> u8 {
    POWER_MODE_NORMAL | OVERSAMPLING_TEMP_1X
}
