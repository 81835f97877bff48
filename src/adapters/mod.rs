//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                     |
//! |-------------|----------------|---------------------------------|
//! | `esp`       | AdcPort        | ESP32 ADC1 oneshot              |
//! |             | Transport      | UART1 to the co-processor       |
//! |             | embedded-hal   | LEDC PWM, buzzer GPIO           |
//! | `hardware`  | ActuatorPort   | mood LED + buzzer drivers       |
//! | `log_sink`  | EventSink      | Serial log output               |

#[cfg(feature = "espidf")]
pub mod esp;
pub mod hardware;
pub mod log_sink;
