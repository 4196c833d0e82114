//! Recording fake of the platform peripheral layer.
//!
//! Enforces the single-user contract (re-opening an open name fails with
//! `Busy`) and panics on a close of a handle that is not open, so a
//! double close shows up as a test failure.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use simplepio::bmp280::{REG_CALIB, REG_ID, REG_TEMP};
use simplepio::peripheral::{
    Close, GpioPin, LedHandle, PeripheralKind, PeripheralManager, PortList, PortName, PwmChannel,
    RegisterDevice,
};
use simplepio::IoError;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Open(PeripheralKind, String),
    Close(PeripheralKind, String),
    Output(String, bool),
    GpioWrite(String, bool),
    Brightness(String, u32),
    PwmFrequency(f64),
    PwmDuty(f64),
    PwmEnabled(bool),
    RegRead(u8, usize),
    RegWrite(u8, u8),
}

pub struct State {
    pub gpios: Vec<&'static str>,
    pub leds: Vec<&'static str>,
    pub pwms: Vec<&'static str>,
    pub buses: Vec<&'static str>,
    pub max_brightness: u32,
    pub open: Vec<(PeripheralKind, String)>,
    pub events: Vec<Event>,
    pub registers: [u8; 256],
    /// Number of upcoming register reads that fail.
    pub failing_reads: usize,
    /// Number of upcoming GPIO writes that succeed before one fails.
    pub gpio_writes_before_failure: Option<usize>,
}

impl Default for State {
    fn default() -> Self {
        let mut registers = [0u8; 256];
        registers[REG_ID as usize] = 0x58;
        // dig_T1 = 27504, dig_T2 = 26435, dig_T3 = -1000
        registers[REG_CALIB as usize..REG_CALIB as usize + 6]
            .copy_from_slice(&[0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC]);
        // adc_T = 519888
        registers[REG_TEMP as usize..REG_TEMP as usize + 3].copy_from_slice(&[0x7E, 0xED, 0x00]);

        Self {
            gpios: Vec::new(),
            leds: Vec::new(),
            pwms: Vec::new(),
            buses: Vec::new(),
            max_brightness: 255,
            open: Vec::new(),
            events: Vec::new(),
            registers,
            failing_reads: 0,
            gpio_writes_before_failure: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct FakePlatform {
    pub state: Rc<RefCell<State>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gpios(self, names: &[&'static str]) -> Self {
        self.state.borrow_mut().gpios = names.to_vec();
        self
    }

    pub fn with_leds(self, names: &[&'static str]) -> Self {
        self.state.borrow_mut().leds = names.to_vec();
        self
    }

    pub fn with_pwms(self, names: &[&'static str]) -> Self {
        self.state.borrow_mut().pwms = names.to_vec();
        self
    }

    pub fn with_buses(self, names: &[&'static str]) -> Self {
        self.state.borrow_mut().buses = names.to_vec();
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn open_handles(&self) -> usize {
        self.state.borrow().open.len()
    }

    pub fn is_open(&self, kind: PeripheralKind, name: &str) -> bool {
        self.state
            .borrow()
            .open
            .iter()
            .any(|(k, n)| *k == kind && n == name)
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.state.borrow().events.iter().filter(|e| pred(e)).count()
    }

    /// Position of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.state.borrow().events.iter().position(|e| pred(e))
    }

    pub fn fail_next_reads(&self, n: usize) {
        self.state.borrow_mut().failing_reads = n;
    }

    pub fn fail_gpio_write_after(&self, n: usize) {
        self.state.borrow_mut().gpio_writes_before_failure = Some(n);
    }

    fn open(&mut self, kind: PeripheralKind, name: &str) -> Result<FakeHandle, IoError> {
        let mut state = self.state.borrow_mut();
        let known = match kind {
            PeripheralKind::Gpio => &state.gpios,
            PeripheralKind::Led => &state.leds,
            PeripheralKind::Pwm => &state.pwms,
            PeripheralKind::I2c => &state.buses,
        };
        if !known.iter().any(|n| *n == name) {
            return Err(IoError::NotFound);
        }
        if state.open.iter().any(|(k, n)| *k == kind && n == name) {
            return Err(IoError::Busy);
        }
        state.open.push((kind, name.to_string()));
        state.events.push(Event::Open(kind, name.to_string()));
        Ok(FakeHandle {
            kind,
            name: name.to_string(),
            state: self.state.clone(),
        })
    }
}

impl PeripheralManager for FakePlatform {
    type Gpio = FakeHandle;
    type Led = FakeHandle;
    type Pwm = FakeHandle;
    type I2c = FakeHandle;

    fn list(&mut self, kind: PeripheralKind) -> Result<PortList, IoError> {
        let state = self.state.borrow();
        let names = match kind {
            PeripheralKind::Gpio => &state.gpios,
            PeripheralKind::Led => &state.leds,
            PeripheralKind::Pwm => &state.pwms,
            PeripheralKind::I2c => &state.buses,
        };
        Ok(names
            .iter()
            .map(|n| PortName::try_from(*n).unwrap())
            .collect())
    }

    fn open_gpio(&mut self, name: &str) -> Result<FakeHandle, IoError> {
        self.open(PeripheralKind::Gpio, name)
    }

    fn open_led(&mut self, name: &str) -> Result<FakeHandle, IoError> {
        self.open(PeripheralKind::Led, name)
    }

    fn open_pwm(&mut self, name: &str) -> Result<FakeHandle, IoError> {
        self.open(PeripheralKind::Pwm, name)
    }

    fn open_i2c(&mut self, bus: &str, _address: u8) -> Result<FakeHandle, IoError> {
        self.open(PeripheralKind::I2c, bus)
    }
}

pub struct FakeHandle {
    kind: PeripheralKind,
    name: String,
    state: Rc<RefCell<State>>,
}

impl FakeHandle {
    fn record(&self, event: Event) {
        self.state.borrow_mut().events.push(event);
    }
}

impl Close for FakeHandle {
    fn close(self) -> Result<(), IoError> {
        let mut state = self.state.borrow_mut();
        let pos = state
            .open
            .iter()
            .position(|(k, n)| *k == self.kind && *n == self.name)
            .unwrap_or_else(|| panic!("close of {:?} {} which is not open", self.kind, self.name));
        state.open.remove(pos);
        state.events.push(Event::Close(self.kind, self.name.clone()));
        Ok(())
    }
}

impl GpioPin for FakeHandle {
    fn set_output(&mut self, initially_high: bool) -> Result<(), IoError> {
        self.record(Event::Output(self.name.clone(), initially_high));
        Ok(())
    }

    fn set_value(&mut self, high: bool) -> Result<(), IoError> {
        {
            let mut state = self.state.borrow_mut();
            if let Some(remaining) = state.gpio_writes_before_failure.as_mut() {
                if *remaining == 0 {
                    state.gpio_writes_before_failure = None;
                    return Err(IoError::Errno(5));
                }
                *remaining -= 1;
            }
        }
        self.record(Event::GpioWrite(self.name.clone(), high));
        Ok(())
    }
}

impl LedHandle for FakeHandle {
    fn max_brightness(&mut self) -> Result<u32, IoError> {
        Ok(self.state.borrow().max_brightness)
    }

    fn set_brightness(&mut self, level: u32) -> Result<(), IoError> {
        self.record(Event::Brightness(self.name.clone(), level));
        Ok(())
    }
}

impl PwmChannel for FakeHandle {
    fn set_frequency_hz(&mut self, hz: f64) -> Result<(), IoError> {
        self.record(Event::PwmFrequency(hz));
        Ok(())
    }

    fn set_duty_cycle(&mut self, percent: f64) -> Result<(), IoError> {
        self.record(Event::PwmDuty(percent));
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), IoError> {
        self.record(Event::PwmEnabled(enabled));
        Ok(())
    }
}

impl RegisterDevice for FakeHandle {
    fn read_reg_byte(&mut self, reg: u8) -> Result<u8, IoError> {
        let mut buf = [0u8; 1];
        self.read_reg_buffer(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write_reg_byte(&mut self, reg: u8, value: u8) -> Result<(), IoError> {
        let mut state = self.state.borrow_mut();
        state.registers[reg as usize] = value;
        state.events.push(Event::RegWrite(reg, value));
        Ok(())
    }

    fn read_reg_buffer(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), IoError> {
        let mut state = self.state.borrow_mut();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(IoError::Transfer);
        }
        let start = reg as usize;
        buf.copy_from_slice(&state.registers[start..start + buf.len()]);
        state.events.push(Event::RegRead(reg, buf.len()));
        Ok(())
    }
}

/// Delay that returns immediately and remembers how long it was asked to wait.
#[derive(Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
