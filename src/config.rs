//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, servo geometry, and capacity limits live here
//! so they can be tuned in one place.

// Scheduler

/// Depth of the command queue between the controller and the worker.
pub const COMMAND_QUEUE_DEPTH: usize = 8;

/// Maximum number of tasks a scheduler can cycle through.
pub const MAX_TASKS: usize = 8;

// Enumeration

/// Maximum number of peripherals returned by one enumeration.
pub const MAX_PORTS: usize = 16;

/// Maximum length of a peripheral name ("IO13", "BCM21", "I2C1", ...).
pub const MAX_PORT_NAME_LEN: usize = 16;

// GPIO blink

/// Port with an onboard LED on the Edison Arduino breakout.
/// Used when present in the enumeration, otherwise the first port is used.
pub const PREFERRED_GPIO_PORT: &str = "IO13";

/// Number of level writes per run. Even, so the pin ends where it started.
pub const GPIO_BLINK_COUNT: u32 = 30;

/// Pause between level writes (ms).
pub const GPIO_BLINK_INTERVAL_MS: u32 = 50;

// LED blink

/// Number of brightness writes per LED per run.
pub const LED_BLINK_COUNT: u32 = 10;

/// Pause between brightness writes (ms).
pub const LED_BLINK_INTERVAL_MS: u32 = 200;

// Servo (PWM sweep)

/// Servo PWM period (ms). 20 ms = 50 Hz.
pub const SERVO_PULSE_PERIOD_MS: f64 = 20.0;

/// Active pulse at the minimum angle (ms). Most servos sit around 1 ms.
pub const SERVO_MIN_PULSE_MS: f64 = 0.9;

/// Active pulse at the maximum angle (ms). Most servos sit around 2 ms.
pub const SERVO_MAX_PULSE_MS: f64 = 2.09;

/// Angle range upper bound (degrees, exclusive for the sweep).
pub const SERVO_MAX_ANGLE_DEG: u16 = 180;

/// Angle advance per sub-step (degrees).
pub const SERVO_ANGLE_STEP_DEG: u16 = 1;

/// Sub-steps per run.
pub const SERVO_STEPS_PER_RUN: u32 = 10;

/// Pause between sub-steps (ms).
pub const SERVO_STEP_INTERVAL_MS: u32 = 200;

// Temperature sensor

/// BMP280 I2C address with SDO pulled high.
pub const BMP280_I2C_ADDRESS: u8 = 0x77;

// Input

/// Scan code of the Edison RM button - selects the next task.
pub const BUTTON_ADVANCE_SCAN_CODE: u16 = 148;

/// Scan code of the Edison PWR button - executes the selected task.
pub const BUTTON_EXECUTE_SCAN_CODE: u16 = 116;
