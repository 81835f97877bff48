//! ESP32 peripheral adapters.
//!
//! Thin wrappers that expose the raw `hw_init` register helpers through
//! the port traits and embedded-hal traits the pipeline is generic over.
//!
//! | Adapter       | Implements                    | Peripheral          |
//! |---------------|-------------------------------|---------------------|
//! | `EspAdc`      | `AdcPort`                     | ADC1 oneshot        |
//! | `UartTx`      | `Transport`                   | UART1 TX            |
//! | `LedcPwm`     | `pwm::SetDutyCycle`           | LEDC channel 0      |
//! | `BuzzerPin`   | `digital::OutputPin`          | buzzer GPIO         |
//! | `run_rx_pump` | feeds `RxFramer`              | UART1 RX            |

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use log::warn;

use crate::app::ports::{AdcChannel, AdcPort, Completion, Transport};
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::link::framer::RxFramer;
use crate::pins;
use crate::sensors::adc::WATER_ADC_DONE;

/// Raw `esp_err_t` from a failed driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EspError(pub i32);

impl pwm::Error for EspError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

impl digital::Error for EspError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

// ── ADC ───────────────────────────────────────────────────────

/// ADC1 in oneshot mode.
///
/// The oneshot driver converts synchronously, so "interrupt" completion
/// is delivered by signalling [`WATER_ADC_DONE`] straight after the read,
/// and polled completion is latched for the next `poll()`.
#[derive(Debug, Default)]
pub struct EspAdc {
    latched: Option<u16>,
}

impl EspAdc {
    pub fn new() -> Self {
        Self::default()
    }
}

fn channel_number(channel: AdcChannel) -> u32 {
    match channel {
        AdcChannel::Water => pins::WATER_ADC_CHANNEL,
        AdcChannel::Light => pins::LIGHT_ADC_CHANNEL,
    }
}

impl AdcPort for EspAdc {
    fn start(&mut self, channel: AdcChannel, completion: Completion) -> Result<(), SensorError> {
        let raw = hw_init::adc1_read(channel_number(channel)).ok_or(SensorError::StartFailed)?;
        match completion {
            Completion::Interrupt => WATER_ADC_DONE.complete(raw),
            Completion::Polled => self.latched = Some(raw),
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<u16> {
        self.latched.take()
    }

    fn cancel(&mut self) {
        self.latched = None;
    }
}

// ── UART ──────────────────────────────────────────────────────

/// Max wait for the TX FIFO to drain after a line.
const TX_FLUSH_TIMEOUT_MS: u32 = 50;
/// RX read granularity; bounds the pump's wake-up latency.
const RX_POLL_MS: u32 = 20;

/// Transmit half of the co-processor link.
#[derive(Debug, Default)]
pub struct UartTx;

impl Transport for UartTx {
    type Error = EspError;

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        hw_init::uart_write(data).map_err(EspError)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        hw_init::uart_flush(TX_FLUSH_TIMEOUT_MS).map_err(EspError)
    }
}

/// Drain the UART driver's RX ring into the framer forever.
pub fn run_rx_pump(framer: &mut RxFramer<'_>) -> ! {
    let mut buf = [0u8; 32];
    let mut reported_drops = 0;
    loop {
        let n = hw_init::uart_read(&mut buf, RX_POLL_MS);
        framer.on_bytes(&buf[..n]);
        if framer.dropped_lines() != reported_drops {
            reported_drops = framer.dropped_lines();
            warn!("link-rx: line queue full, {} lines dropped", reported_drops);
        }
    }
}

// ── LEDC ──────────────────────────────────────────────────────

/// Mood LED LEDC channel.
#[derive(Debug, Default)]
pub struct LedcPwm;

impl pwm::ErrorType for LedcPwm {
    type Error = EspError;
}

impl SetDutyCycle for LedcPwm {
    fn max_duty_cycle(&self) -> u16 {
        hw_init::LED_DUTY_MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), EspError> {
        hw_init::ledc_set(pins::MOOD_LED_LEDC_CHANNEL, duty).map_err(EspError)
    }
}

// ── Buzzer GPIO ───────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct BuzzerPin;

impl digital::ErrorType for BuzzerPin {
    type Error = EspError;
}

impl OutputPin for BuzzerPin {
    fn set_low(&mut self) -> Result<(), EspError> {
        hw_init::gpio_write(pins::BUZZER_GPIO, false).map_err(EspError)
    }

    fn set_high(&mut self) -> Result<(), EspError> {
        hw_init::gpio_write(pins::BUZZER_GPIO, true).map_err(EspError)
    }
}
