//! Snapshot → actuator command mapping.
//!
//! LED: linear between the floor and ceiling light readings, clamped to
//! 0 below the floor and 255 above the ceiling.
//!
//! Motif: `Happy` only when all four content predicates hold, `Sad`
//! otherwise.  An optional low-water alert level overrides both.

use super::ActuatorCommand;
use super::motif::AudioMotif;
use crate::config::{Calibration, Thresholds};
use crate::store::SensorSnapshot;

/// LED duty for a raw light reading (truncating).
pub fn led_intensity(light_raw: u16, cal: &Calibration) -> u8 {
    if light_raw <= cal.led_floor_raw {
        return 0;
    }
    if light_raw >= cal.led_ceiling_raw {
        return u8::MAX;
    }
    let span = u32::from(cal.led_ceiling_raw - cal.led_floor_raw);
    let above = u32::from(light_raw - cal.led_floor_raw);
    (above * u32::from(u8::MAX) / span) as u8
}

/// The four "content plant" checks, kept separate for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentChecks {
    pub water_ok: bool,
    pub light_ok: bool,
    pub temperature_ok: bool,
    pub humidity_ok: bool,
}

impl ContentChecks {
    pub fn evaluate(s: &SensorSnapshot, th: &Thresholds) -> Self {
        Self {
            water_ok: s.water_level_pct >= th.water_wet_pct,
            light_ok: s.light_raw <= th.light_bright_max_raw,
            temperature_ok: s.temperature_c <= th.temperature_stress_c,
            humidity_ok: s.humidity_pct <= th.humidity_stress_pct,
        }
    }

    pub fn all(&self) -> bool {
        self.water_ok && self.light_ok && self.temperature_ok && self.humidity_ok
    }
}

pub fn select_motif(s: &SensorSnapshot, th: &Thresholds) -> AudioMotif {
    if let Some(alert_below) = th.water_alert_below_pct {
        if s.water_level_pct < alert_below {
            return AudioMotif::Alert;
        }
    }
    if ContentChecks::evaluate(s, th).all() {
        AudioMotif::Happy
    } else {
        AudioMotif::Sad
    }
}

/// Full decision for one actuation cycle.
pub fn decide(s: &SensorSnapshot, cal: &Calibration, th: &Thresholds, audio_enabled: bool) -> ActuatorCommand {
    ActuatorCommand {
        led_intensity: led_intensity(s.light_raw, cal),
        audio_motif: if audio_enabled {
            select_motif(s, th)
        } else {
            AudioMotif::Off
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> SensorSnapshot {
        SensorSnapshot {
            water_level_pct: 60,
            light_raw: 1500,
            temperature_c: 22.0,
            humidity_pct: 50.0,
            timestamp_ms: 1,
        }
    }

    #[test]
    fn led_breakpoints() {
        let cal = Calibration::default();
        assert_eq!(led_intensity(0, &cal), 0);
        assert_eq!(led_intensity(cal.led_floor_raw, &cal), 0);
        assert_eq!(led_intensity(cal.led_ceiling_raw, &cal), 255);
        assert_eq!(led_intensity(4095, &cal), 255);
    }

    #[test]
    fn led_midpoint_is_half_scale() {
        let cal = Calibration::default();
        let mid = (cal.led_floor_raw + cal.led_ceiling_raw) / 2;
        assert_eq!(led_intensity(mid, &cal), 127);
    }

    #[test]
    fn all_checks_pass_is_happy() {
        let th = Thresholds::default();
        assert_eq!(select_motif(&content(), &th), AudioMotif::Happy);
    }

    #[test]
    fn any_single_failure_is_sad() {
        let th = Thresholds::default();
        let mut dry = content();
        dry.water_level_pct = th.water_wet_pct - 1;
        let mut glaring = content();
        glaring.light_raw = th.light_bright_max_raw + 1;
        let mut hot = content();
        hot.temperature_c = th.temperature_stress_c + 0.5;
        let mut muggy = content();
        muggy.humidity_pct = th.humidity_stress_pct + 0.5;

        for s in [dry, glaring, hot, muggy] {
            assert_eq!(select_motif(&s, &th), AudioMotif::Sad, "{:?}", s);
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        let th = Thresholds::default();
        let mut edge = content();
        edge.water_level_pct = th.water_wet_pct;
        edge.light_raw = th.light_bright_max_raw;
        edge.temperature_c = th.temperature_stress_c;
        edge.humidity_pct = th.humidity_stress_pct;
        assert!(ContentChecks::evaluate(&edge, &th).all());
    }

    #[test]
    fn alert_only_when_configured() {
        let mut th = Thresholds::default();
        let mut parched = content();
        parched.water_level_pct = 5;
        assert_eq!(select_motif(&parched, &th), AudioMotif::Sad);

        th.water_alert_below_pct = Some(10);
        assert_eq!(select_motif(&parched, &th), AudioMotif::Alert);
    }

    #[test]
    fn muted_audio_still_drives_led() {
        let cmd = decide(&content(), &Calibration::default(), &Thresholds::default(), false);
        assert_eq!(cmd.audio_motif, AudioMotif::Off);
        assert!(cmd.led_intensity > 0);
    }
}
