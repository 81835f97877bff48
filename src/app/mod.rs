//! Application boundary: port traits and outbound events.
//!
//! The pipeline stages in [`link`](crate::link), [`sensors`](crate::sensors)
//! and [`control`](crate::control) only see the outside world through the
//! traits in [`ports`], which keeps every stage testable without real
//! peripherals.

pub mod events;
pub mod ports;
