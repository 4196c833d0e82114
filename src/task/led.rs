//! Onboard LED blink.
//!
//! Walks every enumerated LED in turn, each one opened and closed before
//! the next, so at most one LED handle is held at a time.

use embedded_hal_async::delay::DelayNs;

use crate::config::{LED_BLINK_COUNT, LED_BLINK_INTERVAL_MS};
use crate::error::IoError;
use crate::peripheral::{Close, LedHandle, PeripheralKind, PeripheralManager};

#[derive(Default)]
pub struct LedBlink;

impl LedBlink {
    pub const fn new() -> Self {
        Self
    }

    pub async fn run<P, D>(&mut self, platform: &mut P, delay: &mut D) -> Result<(), IoError>
    where
        P: PeripheralManager,
        D: DelayNs,
    {
        let leds = platform.list(PeripheralKind::Led)?;
        if leds.is_empty() {
            info!("No onboard LED available on this device.");
            return Ok(());
        }
        debug!("List of available LEDs: {:?}", leds);

        for name in leds.iter() {
            let mut led = platform.open_led(name)?;
            let blinked = blink(&mut led, delay).await;
            let closed = led.close();
            blinked?;
            closed?;
        }
        Ok(())
    }
}

/// Alternate between full and zero brightness, ending dark.
async fn blink<L: LedHandle, D: DelayNs>(led: &mut L, delay: &mut D) -> Result<(), IoError> {
    let max = led.max_brightness()?;
    for i in 0..LED_BLINK_COUNT {
        led.set_brightness(if i % 2 == 0 { max } else { 0 })?;
        delay.delay_ms(LED_BLINK_INTERVAL_MS).await;
    }
    Ok(())
}
