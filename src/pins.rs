//! GPIO / peripheral pin assignments for the PlantCare board.
//!
//! Single source of truth: every driver and adapter references this module
//! rather than hard-coding pin or channel numbers.

// ---------------------------------------------------------------------------
// Analog sensors (ADC1, 12 dB attenuation, 12-bit)
// ---------------------------------------------------------------------------

/// Capacitive soil/water probe.  Interrupt-completed conversion.
pub const WATER_ADC_GPIO: i32 = 5;
pub const WATER_ADC_CHANNEL: u32 = 4;

/// Photoresistor divider.  Busy-polled conversion.
pub const LIGHT_ADC_GPIO: i32 = 6;
pub const LIGHT_ADC_CHANNEL: u32 = 5;

// ---------------------------------------------------------------------------
// Co-processor UART (DHT bridge)
// ---------------------------------------------------------------------------

pub const LINK_UART_PORT: i32 = 1;
pub const LINK_UART_TX_GPIO: i32 = 17;
pub const LINK_UART_RX_GPIO: i32 = 18;
/// Driver-side receive ring buffer.
pub const LINK_UART_RX_BUF: i32 = 256;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Mood LED, driven by LEDC channel 0.
pub const MOOD_LED_GPIO: i32 = 11;
pub const MOOD_LED_LEDC_CHANNEL: u32 = 0;
/// LEDC frequency for the mood LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

/// Passive buzzer, square wave bit-banged on a plain GPIO.
pub const BUZZER_GPIO: i32 = 12;
