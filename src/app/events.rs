//! Outbound pipeline events.
//!
//! Each task emits these through the [`EventSink`](super::ports::EventSink)
//! port after every cycle.  Failures that the pipeline absorbs locally
//! still surface here so they can be logged and counted.

use crate::control::ActuatorCommand;
use crate::error::Error;
use crate::link::parse::RemoteReading;
use crate::sensors::LocalReading;

/// Which periodic task produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Protocol,
    Sampler,
    Telemetry,
    Actuation,
}

/// Structured events emitted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEvent {
    /// A response was parsed and written to the store.
    RemoteUpdated(RemoteReading),

    /// A request/response exchange failed; nothing was written.
    ExchangeFailed(Error),

    /// A sampling cycle finished (stale fields carry last-known values).
    LocalSampled(LocalReading),

    /// The actuation loop drove the outputs.
    Actuated(ActuatorCommand),

    /// A stage abandoned part of its cycle and will retry next period.
    Skipped { stage: Stage, cause: Error },
}
