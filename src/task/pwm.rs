//! Servo sweep over PWM.
//!
//! The channel is opened on the first run and stays open across runs,
//! together with the sweep angle. [`PwmSweep::release`] closes the channel
//! and rewinds the angle, so the next activation starts from 0 degrees.

use embedded_hal_async::delay::DelayNs;

use crate::config::{
    SERVO_ANGLE_STEP_DEG, SERVO_MAX_ANGLE_DEG, SERVO_MAX_PULSE_MS, SERVO_MIN_PULSE_MS,
    SERVO_PULSE_PERIOD_MS, SERVO_STEPS_PER_RUN, SERVO_STEP_INTERVAL_MS,
};
use crate::error::IoError;
use crate::peripheral::{PeripheralManager, PwmChannel};

pub struct PwmSweep<H> {
    port: &'static str,
    pwm: Option<H>,
    enabled: bool,
    angle: u16,
}

impl<H: PwmChannel> PwmSweep<H> {
    pub const fn new(port: &'static str) -> Self {
        Self {
            port,
            pwm: None,
            enabled: false,
            angle: 0,
        }
    }

    /// Angle the next sub-step will drive.
    pub fn angle(&self) -> u16 {
        self.angle
    }

    pub fn is_open(&self) -> bool {
        self.pwm.is_some()
    }

    pub async fn run<P, D>(&mut self, platform: &mut P, delay: &mut D) -> Result<(), IoError>
    where
        P: PeripheralManager<Pwm = H>,
        D: DelayNs,
    {
        debug!("Servo sweep from {} degrees", self.angle);

        let pwm = match &mut self.pwm {
            Some(pwm) => pwm,
            None => {
                let pwm = platform.open_pwm(self.port)?;
                info!("Opened PWM port {}", self.port);
                self.enabled = false;
                self.pwm.insert(pwm)
            }
        };

        // Frequency and initial duty cycle go in before enabling.
        if !self.enabled {
            pwm.set_frequency_hz(1000.0 / SERVO_PULSE_PERIOD_MS)?;
            pwm.set_duty_cycle(duty_cycle_for(self.angle))?;
            pwm.set_enabled(true)?;
            self.enabled = true;
        }

        for _ in 0..SERVO_STEPS_PER_RUN {
            pwm.set_duty_cycle(duty_cycle_for(self.angle))?;
            self.angle = next_angle(self.angle);
            delay.delay_ms(SERVO_STEP_INTERVAL_MS).await;
        }
        Ok(())
    }

    /// Close the channel if open and rewind the sweep. Safe to call any
    /// number of times.
    pub fn release(&mut self) {
        self.enabled = false;
        self.angle = 0;
        if let Some(pwm) = self.pwm.take() {
            info!("Closing PWM port {}", self.port);
            if let Err(e) = pwm.close() {
                error!("Error closing PWM port {}: {:?}", self.port, e);
            }
        }
    }
}

/// Advance by one step, wrapping at the top of the range.
pub fn next_angle(angle: u16) -> u16 {
    (angle + SERVO_ANGLE_STEP_DEG) % SERVO_MAX_ANGLE_DEG
}

/// Active pulse duration (ms) for `angle`, linear over the servo range.
pub fn pulse_ms_for(angle: u16) -> f64 {
    let angle = angle.min(SERVO_MAX_ANGLE_DEG) as f64;
    let span = SERVO_MAX_PULSE_MS - SERVO_MIN_PULSE_MS;
    SERVO_MIN_PULSE_MS + span * angle / SERVO_MAX_ANGLE_DEG as f64
}

/// Duty cycle (percent of the period) for `angle`.
pub fn duty_cycle_for(angle: u16) -> f64 {
    100.0 * pulse_ms_for(angle) / SERVO_PULSE_PERIOD_MS
}
