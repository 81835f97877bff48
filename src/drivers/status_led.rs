//! Mood LED driver.
//!
//! One PWM channel; intensity 0–255 maps onto the channel's full duty
//! range.  Generic over `embedded_hal::pwm::SetDutyCycle` so the LEDC
//! adapter drives it on the device and a recording fake drives it in tests.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::ActuatorError;

pub struct StatusLed<P> {
    pwm: P,
    current: u8,
}

impl<P: SetDutyCycle> StatusLed<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, current: 0 }
    }

    pub fn set_intensity(&mut self, level: u8) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX))
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.current = level;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.set_intensity(0)
    }

    pub fn current(&self) -> u8 {
        self.current
    }
}
