//! Local analog sampling: soil water level and ambient light.
//!
//! The water channel is interrupt-completed and smoothed over the last
//! five samples; the light channel is busy-polled and only clamped.  Each
//! fresh value goes straight into the [`SensorStore`].  When a conversion
//! stalls or the ADC is busy, the sampler reports the last-known value as
//! stale and leaves that store field alone.

pub mod adc;
pub mod smoothing;

use embassy_time::{Duration, Ticker};
use log::debug;

use crate::app::events::{PipelineEvent, Stage};
use crate::app::ports::{AdcChannel, AdcPort, EventSink, Transport};
use crate::config::{ADC_MAX_RAW, Calibration};
use crate::error::Error;
use crate::link::telemetry::TelemetryPublisher;
use crate::store::SensorStore;
use adc::{AdcCompletion, SharedAdc};
use smoothing::MovingAverage;

/// Samples in the water-level moving average.
pub const WATER_WINDOW: usize = 5;

/// Result of one sampling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalReading {
    /// Smoothed soil moisture, 0–100 %.
    pub water_pct: u8,
    /// Light ADC value, 0–4095.
    pub light_raw: u16,
    /// `water_pct` is carried over from an earlier cycle.
    pub water_stale: bool,
    /// `light_raw` is carried over from an earlier cycle.
    pub light_stale: bool,
}

/// Map a raw water-probe reading onto 0–100 % using the dry/wet points.
pub fn water_percent(raw: u16, cal: &Calibration) -> u8 {
    let dry = u32::from(cal.water_dry_raw);
    let wet = u32::from(cal.water_wet_raw);
    if wet <= dry {
        return 0;
    }
    let raw = u32::from(raw).clamp(dry, wet);
    ((raw - dry) * 100 / (wet - dry)) as u8
}

pub struct LocalSampler<'a, A: AdcPort, E: EventSink> {
    adc: &'a SharedAdc<A>,
    water_done: &'a AdcCompletion,
    store: &'a SensorStore,
    sink: E,
    calibration: Calibration,
    conversion_timeout: Duration,
    water_avg: MovingAverage<WATER_WINDOW>,
    last: LocalReading,
}

impl<'a, A: AdcPort, E: EventSink> LocalSampler<'a, A, E> {
    pub fn new(
        adc: &'a SharedAdc<A>,
        water_done: &'a AdcCompletion,
        store: &'a SensorStore,
        sink: E,
        calibration: Calibration,
        conversion_timeout: Duration,
    ) -> Self {
        Self {
            adc,
            water_done,
            store,
            sink,
            calibration,
            conversion_timeout,
            water_avg: MovingAverage::new(),
            last: LocalReading::default(),
        }
    }

    /// Read both channels once and publish fresh values to the store.
    pub async fn sample(&mut self) -> LocalReading {
        let water_raw = self
            .adc
            .convert_interrupt(AdcChannel::Water, self.water_done, self.conversion_timeout)
            .await;
        let water = match water_raw {
            Ok(raw) => {
                let pct = water_percent(raw, &self.calibration);
                Some(self.water_avg.push(u16::from(pct)) as u8)
            }
            Err(e) => {
                self.skipped(e);
                None
            }
        };

        let light_raw = self
            .adc
            .convert_polled(AdcChannel::Light, self.conversion_timeout)
            .await;
        let light = match light_raw {
            Ok(raw) => Some(raw.min(ADC_MAX_RAW)),
            Err(e) => {
                self.skipped(e);
                None
            }
        };

        if let Some(pct) = water {
            if let Err(e) = self.store.update_water_level(pct).await {
                self.skipped(e);
            }
        }
        if let Some(raw) = light {
            if let Err(e) = self.store.update_light(raw).await {
                self.skipped(e);
            }
        }

        let reading = LocalReading {
            water_pct: water.unwrap_or(self.last.water_pct),
            light_raw: light.unwrap_or(self.last.light_raw),
            water_stale: water.is_none(),
            light_stale: light.is_none(),
        };
        debug!(
            "sampler: water={}%{} light={}{}",
            reading.water_pct,
            if reading.water_stale { " (stale)" } else { "" },
            reading.light_raw,
            if reading.light_stale { " (stale)" } else { "" },
        );
        self.last = reading;
        self.sink.emit(&PipelineEvent::LocalSampled(reading));
        reading
    }

    fn skipped(&mut self, cause: Error) {
        self.sink.emit(&PipelineEvent::Skipped {
            stage: Stage::Sampler,
            cause,
        });
    }

    /// Sample forever, one cycle per `period`, optionally reporting each
    /// cycle to the co-processor.
    pub async fn run<T: Transport>(
        &mut self,
        period: Duration,
        telemetry: Option<&TelemetryPublisher<'_, T>>,
    ) -> ! {
        let mut ticker = Ticker::every(period);
        loop {
            let reading = self.sample().await;
            if let Some(publisher) = telemetry {
                if let Err(cause) = publisher.publish(&reading).await {
                    debug!("telemetry: skipped ({})", cause);
                    self.sink.emit(&PipelineEvent::Skipped {
                        stage: Stage::Telemetry,
                        cause,
                    });
                }
            }
            ticker.next().await;
        }
    }
}
