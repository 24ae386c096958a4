//! Monotonic clock and async delays backed by the embassy time driver.

use embassy_time::{Delay, Instant};
use embedded_hal_async::delay::DelayNs;
use invisyrinth_core::Clock;

/// [`Clock`] plus async [`DelayNs`] for the sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

impl DelayNs for EmbassyClock {
    async fn delay_ns(&mut self, ns: u32) {
        DelayNs::delay_ns(&mut Delay, ns).await;
    }

    async fn delay_us(&mut self, us: u32) {
        DelayNs::delay_us(&mut Delay, us).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        DelayNs::delay_ms(&mut Delay, ms).await;
    }
}
