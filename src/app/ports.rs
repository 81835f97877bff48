//! Port traits: the hexagonal boundary between the pipeline and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ link / sensors / control (domain)
//! ```
//!
//! Driven adapters (UART, ADC, LED, buzzer, event sinks) implement these
//! traits.  The pipeline stages consume them via generics, so none of the
//! domain code touches ESP-IDF directly and every stage runs on the host
//! against mocks.

use crate::control::motif::Note;
use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Serial transport (driven adapter: domain → co-processor UART)
// ───────────────────────────────────────────────────────────────

/// Transmit side of the byte-oriented link to the co-processor.
///
/// The receive side is not part of this trait: received bytes are pushed
/// into an [`RxFramer`](crate::link::framer::RxFramer) by the UART
/// interrupt pump, never pulled by the protocol client.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Block until buffered output has left the FIFO.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// ADC port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The two analog inputs the sampler reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChannel {
    Water,
    Light,
}

/// How the caller learns that a conversion has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The driver signals the water-channel
    /// [`AdcCompletion`](crate::sensors::adc::AdcCompletion) from its ISR.
    Interrupt,
    /// The caller busy-polls [`AdcPort::poll`].
    Polled,
}

/// One ADC unit with a single conversion slot.
///
/// Callers must hold the [`SharedAdc`](crate::sensors::adc::SharedAdc)
/// reservation around `start` .. `poll`/`cancel`; the port itself does
/// not arbitrate.
pub trait AdcPort {
    /// Trigger a conversion on `channel`.
    fn start(&mut self, channel: AdcChannel, completion: Completion) -> Result<(), SensorError>;

    /// Completion flag for polled conversions.  `Some(raw)` once done.
    fn poll(&mut self) -> Option<u16>;

    /// Abandon an in-flight conversion so the unit is free again.
    fn cancel(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the actuation loop calls this to drive outputs.
pub trait ActuatorPort {
    /// Set the mood LED brightness (0 = off, 255 = full).
    fn set_led(&mut self, intensity: u8) -> Result<(), ActuatorError>;

    /// Play one note to completion.  `freq_hz == 0` is a rest.
    fn play_note(&mut self, note: Note) -> Result<(), ActuatorError>;

    /// Leave the buzzer idle.
    fn silence(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// Pipeline stages emit structured
/// [`PipelineEvent`](super::events::PipelineEvent)s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PipelineEvent);
}
