//! Hardware adapter: bridges the output drivers to [`ActuatorPort`].
//!
//! Owns the mood LED and the buzzer.  Generic over the embedded-hal pin
//! and PWM types so the same adapter runs against LEDC/GPIO on the device
//! and against recording fakes in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::ActuatorPort;
use crate::control::motif::Note;
use crate::drivers::buzzer::Buzzer;
use crate::drivers::status_led::StatusLed;
use crate::error::ActuatorError;

/// Concrete adapter that combines the output drivers behind the port.
pub struct HardwareActuators<L, B, D> {
    led: StatusLed<L>,
    buzzer: Buzzer<B, D>,
}

impl<L, B, D> HardwareActuators<L, B, D>
where
    L: SetDutyCycle,
    B: OutputPin,
    D: DelayNs,
{
    pub fn new(led: StatusLed<L>, buzzer: Buzzer<B, D>) -> Self {
        Self { led, buzzer }
    }

    pub fn led(&self) -> &StatusLed<L> {
        &self.led
    }

    /// LED dark, buzzer idle.
    pub fn all_off(&mut self) {
        if let Err(e) = self.led.off() {
            warn!("hardware: LED off failed: {}", e);
        }
        self.silence();
    }
}

impl<L, B, D> ActuatorPort for HardwareActuators<L, B, D>
where
    L: SetDutyCycle,
    B: OutputPin,
    D: DelayNs,
{
    fn set_led(&mut self, intensity: u8) -> Result<(), ActuatorError> {
        self.led.set_intensity(intensity)
    }

    fn play_note(&mut self, note: Note) -> Result<(), ActuatorError> {
        self.buzzer.play(note)
    }

    fn silence(&mut self) {
        if let Err(e) = self.buzzer.silence() {
            warn!("hardware: buzzer silence failed: {}", e);
        }
    }
}
