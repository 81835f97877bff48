//! Passive buzzer driven by a bit-banged square wave.
//!
//! A tone of `f` Hz toggles the pin every `500_000 / f` µs for the note's
//! duration.  Rests hold the pin low for the same time.  Playback blocks
//! the calling task, which is what the actuation loop expects.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::control::motif::Note;
use crate::error::ActuatorError;

pub struct Buzzer<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Buzzer<P, D> {
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// Half of one square-wave period, µs.
pub fn half_period_us(freq_hz: u16) -> u32 {
    500_000 / u32::from(freq_hz.max(1))
}

impl<P: OutputPin, D: DelayNs> Buzzer<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    pub fn play(&mut self, note: Note) -> Result<(), ActuatorError> {
        if note.is_rest() {
            self.silence()?;
            self.delay.delay_ms(u32::from(note.duration_ms));
            return Ok(());
        }

        let half = half_period_us(note.freq_hz);
        let cycles = u32::from(note.duration_ms) * 1000 / (2 * half);
        for _ in 0..cycles {
            self.pin.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
            self.delay.delay_us(half);
            self.pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
            self.delay.delay_us(half);
        }
        Ok(())
    }

    pub fn silence(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct Pin {
        rising: u32,
        high: bool,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.high {
                self.rising += 1;
            }
            self.high = true;
            Ok(())
        }
    }

    /// Accumulates requested delay instead of sleeping.
    #[derive(Default)]
    struct Clock {
        elapsed_ns: u64,
    }

    impl DelayNs for Clock {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns += u64::from(ns);
        }
    }

    #[test]
    fn half_period_matches_frequency() {
        assert_eq!(half_period_us(1000), 500);
        assert_eq!(half_period_us(2000), 250);
        assert_eq!(half_period_us(0), 500_000);
    }

    #[test]
    fn tone_produces_expected_cycles() {
        let mut bz = Buzzer::new(Pin::default(), Clock::default());
        bz.play(Note::tone(1000, 100)).unwrap();
        assert_eq!(bz.pin.rising, 100);
        assert_eq!(bz.delay.elapsed_ns, 100_000_000);
        assert!(!bz.pin.high);
    }

    #[test]
    fn rest_keeps_pin_low() {
        let mut bz = Buzzer::new(Pin::default(), Clock::default());
        bz.play(Note::rest(60)).unwrap();
        assert_eq!(bz.pin.rising, 0);
        assert_eq!(bz.delay.elapsed_ns, 60_000_000);
    }
}
