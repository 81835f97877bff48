//! Output drivers, hardware initialisation, and task placement.

pub mod buzzer;
pub mod hw_init;
pub mod status_led;
pub mod task_pin;
