//! Exclusive access to the single ADC unit.
//!
//! Only one conversion may be in flight on the unit.  `SharedAdc` holds the
//! reservation for the whole start → complete (or cancel) window, so the
//! interrupt-completed water conversion and the polled light conversion
//! can never overlap.
//!
//! ```text
//!   sampler ──reserve──▶ start(Interrupt) ──▶ wait(AdcCompletion, deadline)
//!                                   ISR ──complete(raw)──┘
//!   sampler ──reserve──▶ start(Polled) ──▶ spin on poll() until deadline
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, with_timeout};

use crate::app::ports::{AdcChannel, AdcPort, Completion};
use crate::error::{Error, Resource, Result, SensorError};

/// ISR → sampler completion signal carrying the raw conversion result.
pub struct AdcCompletion {
    done: Signal<CriticalSectionRawMutex, u16>,
}

impl AdcCompletion {
    pub const fn new() -> Self {
        Self { done: Signal::new() }
    }

    /// Interrupt-safe: never blocks.
    pub fn complete(&self, raw: u16) {
        self.done.signal(raw);
    }

    fn reset(&self) {
        self.done.reset();
    }

    async fn wait(&self) -> u16 {
        self.done.wait().await
    }
}

impl Default for AdcCompletion {
    fn default() -> Self {
        Self::new()
    }
}

/// Water-channel completion signalled by the device ADC interrupt.
pub static WATER_ADC_DONE: AdcCompletion = AdcCompletion::new();

pub struct SharedAdc<A> {
    unit: Mutex<CriticalSectionRawMutex, A>,
    lock_wait: Duration,
}

impl<A: AdcPort> SharedAdc<A> {
    pub const fn new(adc: A, lock_wait: Duration) -> Self {
        Self {
            unit: Mutex::new(adc),
            lock_wait,
        }
    }

    /// Give the unit back, e.g. to inspect it after a test run.
    pub fn into_inner(self) -> A {
        self.unit.into_inner()
    }

    async fn reserve(&self) -> Result<MutexGuard<'_, CriticalSectionRawMutex, A>> {
        with_timeout(self.lock_wait, self.unit.lock())
            .await
            .map_err(|_| Error::Contention(Resource::AdcUnit))
    }

    /// Start a conversion and suspend until `done` fires or `timeout`
    /// passes.  A stalled conversion is cancelled before the unit is freed.
    pub async fn convert_interrupt(
        &self,
        channel: AdcChannel,
        done: &AdcCompletion,
        timeout: Duration,
    ) -> Result<u16> {
        let mut adc = self.reserve().await?;
        done.reset();
        adc.start(channel, Completion::Interrupt)?;

        match with_timeout(timeout, done.wait()).await {
            Ok(raw) => Ok(raw),
            Err(_) => {
                adc.cancel();
                Err(SensorError::ConversionTimeout.into())
            }
        }
    }

    /// Start a conversion and spin on its completion flag until `timeout`.
    pub async fn convert_polled(&self, channel: AdcChannel, timeout: Duration) -> Result<u16> {
        let mut adc = self.reserve().await?;
        adc.start(channel, Completion::Polled)?;

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(raw) = adc.poll() {
                return Ok(raw);
            }
            if Instant::now() >= deadline {
                adc.cancel();
                return Err(SensorError::ConversionTimeout.into());
            }
            core::hint::spin_loop();
        }
    }
}
