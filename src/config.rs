//! System configuration parameters
//!
//! All tunable parameters for the PlantCare pipeline.  Values are fixed at
//! startup: `main` validates them once and an invalid set halts boot.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Full-scale reading of the 12-bit ADC.
pub const ADC_MAX_RAW: u16 = 4095;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub timing: Timing,
    pub calibration: Calibration,
    pub thresholds: Thresholds,
    /// Send `{"photo":..,"water":..}` lines to the co-processor after each
    /// sampling cycle.
    pub telemetry_enabled: bool,
    /// When false the actuation loop keeps the buzzer silent (motif `Off`).
    pub audio_enabled: bool,
    /// Co-processor UART baud rate.
    pub baud_rate: u32,
}

/// Periods, deadlines and lock bounds (milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// How long the protocol client waits for a response line.
    pub request_timeout_ms: u32,
    /// Period between `GET_DHT` requests.
    pub remote_poll_interval_ms: u32,
    /// Period between local ADC sampling cycles.
    pub sensor_poll_interval_ms: u32,
    /// Period of the actuation decision loop.
    pub actuation_interval_ms: u32,
    /// Upper bound on any store or link lock wait.
    pub lock_wait_ms: u32,
    /// Deadline for a single ADC conversion.
    pub adc_conversion_timeout_ms: u32,
}

/// Raw ADC calibration points.  Higher raw = wetter / brighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Raw water-channel reading for bone-dry soil (0 %).
    pub water_dry_raw: u16,
    /// Raw water-channel reading for saturated soil (100 %).
    pub water_wet_raw: u16,
    /// At or below this light reading the LED is fully off.
    pub led_floor_raw: u16,
    /// At or above this light reading the LED is fully on.
    pub led_ceiling_raw: u16,
}

/// "Content plant" predicates evaluated by the actuation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Water level at or above this is wet enough.
    pub water_wet_pct: u8,
    /// Light at or below this is not too bright.
    pub light_bright_max_raw: u16,
    /// Temperature at or below this is not stressful.
    pub temperature_stress_c: f32,
    /// Humidity at or below this is not stressful.
    pub humidity_stress_pct: f32,
    /// When set, water below this plays the alert motif instead.
    pub water_alert_below_pct: Option<u8>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            calibration: Calibration::default(),
            thresholds: Thresholds::default(),
            telemetry_enabled: true,
            audio_enabled: true,
            baud_rate: 9600,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            request_timeout_ms: 1000,
            remote_poll_interval_ms: 2000,
            sensor_poll_interval_ms: 2000,
            actuation_interval_ms: 1000,
            lock_wait_ms: 20,
            adc_conversion_timeout_ms: 10,
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            water_dry_raw: 0,
            water_wet_raw: ADC_MAX_RAW,
            led_floor_raw: 300,
            led_ceiling_raw: 3300,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            water_wet_pct: 40,
            light_bright_max_raw: 3000,
            temperature_stress_c: 30.0,
            humidity_stress_pct: 80.0,
            water_alert_below_pct: None,
        }
    }
}

impl Timing {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.into())
    }

    pub fn remote_poll_interval(&self) -> Duration {
        Duration::from_millis(self.remote_poll_interval_ms.into())
    }

    pub fn sensor_poll_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_poll_interval_ms.into())
    }

    pub fn actuation_interval(&self) -> Duration {
        Duration::from_millis(self.actuation_interval_ms.into())
    }

    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms.into())
    }

    pub fn adc_conversion_timeout(&self) -> Duration {
        Duration::from_millis(self.adc_conversion_timeout_ms.into())
    }

    /// How long a telemetry report may wait for the link: long enough to
    /// outlast one full exchange.
    pub fn telemetry_wait(&self) -> Duration {
        self.request_timeout() + self.lock_wait()
    }
}

impl SystemConfig {
    /// Reject parameter sets the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.timing;
        if t.remote_poll_interval_ms == 0
            || t.sensor_poll_interval_ms == 0
            || t.actuation_interval_ms == 0
        {
            return Err(Error::Config("task periods must be non-zero"));
        }
        if t.request_timeout_ms == 0 || t.request_timeout_ms >= t.remote_poll_interval_ms {
            return Err(Error::Config("request timeout must be shorter than the poll period"));
        }
        if t.lock_wait_ms == 0 || t.lock_wait_ms >= t.actuation_interval_ms {
            return Err(Error::Config("lock wait must be a short non-zero bound"));
        }
        if t.adc_conversion_timeout_ms == 0 || t.adc_conversion_timeout_ms >= t.sensor_poll_interval_ms {
            return Err(Error::Config("ADC conversion timeout out of range"));
        }

        let c = &self.calibration;
        if c.water_dry_raw >= c.water_wet_raw || c.water_wet_raw > ADC_MAX_RAW {
            return Err(Error::Config("water calibration must satisfy dry < wet <= 4095"));
        }
        if c.led_floor_raw >= c.led_ceiling_raw || c.led_ceiling_raw > ADC_MAX_RAW {
            return Err(Error::Config("LED breakpoints must satisfy floor < ceiling <= 4095"));
        }

        let th = &self.thresholds;
        if th.water_wet_pct > 100 || th.light_bright_max_raw > ADC_MAX_RAW {
            return Err(Error::Config("water/light threshold out of range"));
        }
        if !(-40.0..=80.0).contains(&th.temperature_stress_c) {
            return Err(Error::Config("temperature stress threshold out of range"));
        }
        if !(0.0..=100.0).contains(&th.humidity_stress_pct) {
            return Err(Error::Config("humidity stress threshold out of range"));
        }
        if let Some(alert) = th.water_alert_below_pct {
            if alert >= th.water_wet_pct {
                return Err(Error::Config("water alert level must sit below the wet threshold"));
            }
        }
        if self.baud_rate == 0 {
            return Err(Error::Config("baud rate must be non-zero"));
        }
        Ok(())
    }
}
