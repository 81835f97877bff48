//! Shared sensor state store.
//!
//! The one record that the sampler, the protocol client and the actuation
//! loop share.  Every accessor takes the lock with a bounded wait; a writer
//! only touches its own fields, and `snapshot()` copies the whole record,
//! so a reader never sees a half-applied update.
//!
//! ```text
//!  sampler ──update_water_level / update_light──┐
//!                                                ├─▶ SensorStore ─▶ snapshot() ─▶ actuation
//!  protocol ──update_remote_readings────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
#[cfg(test)]
use embassy_sync::mutex::MutexGuard;
use embassy_time::{Duration, Instant, with_timeout};

use crate::config::ADC_MAX_RAW;
use crate::error::{Error, Resource, Result};

/// Latest accepted value from every producer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// Smoothed soil moisture, 0–100 %.
    pub water_level_pct: u8,
    /// Raw light ADC value, 0–4095 (higher = brighter).
    pub light_raw: u16,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// Monotonic ms of the most recent accepted update, 0 if none yet.
    pub timestamp_ms: u64,
}

impl SensorSnapshot {
    /// Power-on record: everything zeroed.
    pub const EMPTY: Self = Self {
        water_level_pct: 0,
        light_raw: 0,
        temperature_c: 0.0,
        humidity_pct: 0.0,
        timestamp_ms: 0,
    };
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self::EMPTY
    }
}

pub struct SensorStore {
    record: Mutex<CriticalSectionRawMutex, SensorSnapshot>,
    lock_wait: Duration,
}

impl SensorStore {
    pub const fn new(lock_wait: Duration) -> Self {
        Self {
            record: Mutex::new(SensorSnapshot::EMPTY),
            lock_wait,
        }
    }

    /// Store a smoothed water level (clamped to 100 %).
    pub async fn update_water_level(&self, pct: u8) -> Result<()> {
        let pct = pct.min(100);
        self.with_record(|r| {
            r.water_level_pct = pct;
            r.timestamp_ms = now_ms();
        })
        .await
    }

    /// Store a raw light reading (clamped to the ADC range).
    pub async fn update_light(&self, raw: u16) -> Result<()> {
        let raw = raw.min(ADC_MAX_RAW);
        self.with_record(|r| {
            r.light_raw = raw;
            r.timestamp_ms = now_ms();
        })
        .await
    }

    /// Store both remote values in one locked update.
    pub async fn update_remote_readings(&self, temperature_c: f32, humidity_pct: f32) -> Result<()> {
        self.with_record(|r| {
            r.temperature_c = temperature_c;
            r.humidity_pct = humidity_pct;
            r.timestamp_ms = now_ms();
        })
        .await
    }

    /// Consistent copy of the whole record.
    pub async fn snapshot(&self) -> Result<SensorSnapshot> {
        self.with_record(|r| *r).await
    }

    /// Hold the record lock, as a slow writer would.
    #[cfg(test)]
    pub(crate) async fn hold(&self) -> MutexGuard<'_, CriticalSectionRawMutex, SensorSnapshot> {
        self.record.lock().await
    }

    async fn with_record<R>(&self, f: impl FnOnce(&mut SensorSnapshot) -> R) -> Result<R> {
        let mut record = with_timeout(self.lock_wait, self.record.lock())
            .await
            .map_err(|_| Error::Contention(Resource::SensorStore))?;
        Ok(f(&mut record))
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}
