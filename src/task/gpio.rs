//! GPIO blink.
//!
//! Stateless between runs: the pin is opened, blinked and closed inside a
//! single `run`, so there is nothing to release afterwards.

use embedded_hal_async::delay::DelayNs;

use crate::config::{GPIO_BLINK_COUNT, GPIO_BLINK_INTERVAL_MS};
use crate::error::IoError;
use crate::peripheral::{Close, GpioPin, PeripheralKind, PeripheralManager, PortName};

pub struct GpioBlink {
    preferred: &'static str,
}

impl GpioBlink {
    pub const fn new(preferred: &'static str) -> Self {
        Self { preferred }
    }

    pub async fn run<P, D>(&mut self, platform: &mut P, delay: &mut D) -> Result<(), IoError>
    where
        P: PeripheralManager,
        D: DelayNs,
    {
        let ports = platform.list(PeripheralKind::Gpio)?;
        let Some(port) = select_port(&ports, self.preferred) else {
            info!("No GPIO port available on this device.");
            return Ok(());
        };
        debug!("List of available GPIO ports: {:?}", ports);

        // Single-user resource: close on every path once opened.
        let mut pin = platform.open_gpio(port)?;
        let blinked = blink(&mut pin, delay).await;
        let closed = pin.close();
        blinked?;
        closed
    }
}

/// The preferred port if enumerated, else the first one.
pub fn select_port<'a>(ports: &'a [PortName], preferred: &str) -> Option<&'a str> {
    ports
        .iter()
        .find(|name| name.as_str() == preferred)
        .or_else(|| ports.first())
        .map(|name| name.as_str())
}

async fn blink<G: GpioPin, D: DelayNs>(pin: &mut G, delay: &mut D) -> Result<(), IoError> {
    pin.set_output(false)?;
    for i in 0..GPIO_BLINK_COUNT {
        pin.set_value(i % 2 == 0)?;
        delay.delay_ms(GPIO_BLINK_INTERVAL_MS).await;
    }
    pin.set_value(false)
}
