//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing pipeline events to the ESP-IDF
//! logger (UART0 / USB-CDC console in production, stderr on the host).
//! Each task owns its own copy; the sink holds no state.

use log::{info, warn};

use crate::app::events::PipelineEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`PipelineEvent`] to the serial console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RemoteUpdated(r) => {
                info!(
                    "REMOTE | T={:.1}\u{00b0}C | RH={:.1}%",
                    r.temperature_c, r.humidity_pct
                );
            }
            PipelineEvent::ExchangeFailed(e) => {
                warn!("REMOTE | exchange failed: {}", e);
            }
            PipelineEvent::LocalSampled(l) => {
                info!(
                    "LOCAL  | water={}%{} | light={}{}",
                    l.water_pct,
                    if l.water_stale { "*" } else { "" },
                    l.light_raw,
                    if l.light_stale { "*" } else { "" },
                );
            }
            PipelineEvent::Actuated(cmd) => {
                info!(
                    "ACT    | led={} | motif={:?}",
                    cmd.led_intensity, cmd.audio_motif
                );
            }
            PipelineEvent::Skipped { stage, cause } => {
                warn!("SKIP   | {:?}: {}", stage, cause);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::Stage;
    use crate::control::ActuatorCommand;
    use crate::control::motif::AudioMotif;
    use crate::error::{Error, Resource, TransportError};
    use crate::link::parse::RemoteReading;
    use crate::sensors::LocalReading;

    #[test]
    fn renders_every_event_kind() {
        let mut sink = LogEventSink::new();
        sink.emit(&PipelineEvent::RemoteUpdated(RemoteReading {
            temperature_c: 21.5,
            humidity_pct: 48.0,
        }));
        sink.emit(&PipelineEvent::ExchangeFailed(TransportError::ResponseTimeout.into()));
        sink.emit(&PipelineEvent::LocalSampled(LocalReading {
            water_pct: 70,
            light_raw: 1200,
            water_stale: true,
            light_stale: false,
        }));
        sink.emit(&PipelineEvent::Actuated(ActuatorCommand {
            led_intensity: 90,
            audio_motif: AudioMotif::Happy,
        }));
        sink.emit(&PipelineEvent::Skipped {
            stage: Stage::Telemetry,
            cause: Error::Contention(Resource::SerialLink),
        });
    }
}
