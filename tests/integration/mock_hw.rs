//! Mock hardware adapters for integration tests.
//!
//! Records every actuator call and every byte written to the link so
//! tests can assert on full histories without touching real peripherals.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use plantcare::app::events::PipelineEvent;
use plantcare::app::ports::{ActuatorPort, AdcChannel, AdcPort, Completion, EventSink, Transport};
use plantcare::control::motif::{AudioMotif, Note};
use plantcare::error::{ActuatorError, SensorError};
use plantcare::link::framer::RxFramer;
use plantcare::link::protocol::REQUEST_LINE;
use plantcare::sensors::adc::AdcCompletion;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    SetLed(u8),
    Note(Note),
    Silence,
}

// ── MockActuators ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockActuators {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockActuators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn led_levels(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::SetLed(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Note(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// True when exactly `motif`'s notes were played, followed by silence.
    pub fn played(&self, motif: AudioMotif) -> bool {
        self.notes() == motif.notes() && self.calls.last() == Some(&ActuatorCall::Silence)
    }
}

impl ActuatorPort for MockActuators {
    fn set_led(&mut self, intensity: u8) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::SetLed(intensity));
        Ok(())
    }

    fn play_note(&mut self, note: Note) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Note(note));
        Ok(())
    }

    fn silence(&mut self) {
        self.calls.push(ActuatorCall::Silence);
    }
}

// ── Scripted co-processor ─────────────────────────────────────

/// UART whose far end answers each `GET_DHT` with the next scripted
/// reply, pushed byte-by-byte through the receive framer.  `None` in the
/// script means the co-processor stays silent for that request.
pub struct ScriptedCoprocessor<'a> {
    pub written: Arc<Mutex<Vec<u8>>>,
    replies: VecDeque<Option<&'static str>>,
    rx: RxFramer<'a>,
}

#[allow(dead_code)]
impl<'a> ScriptedCoprocessor<'a> {
    pub fn new(rx: RxFramer<'a>, replies: &[Option<&'static str>]) -> Self {
        Self {
            written: Arc::new(Mutex::new(Vec::new())),
            replies: replies.iter().copied().collect(),
            rx,
        }
    }

    /// Everything written so far, split into lines.
    pub fn sent_lines(written: &Arc<Mutex<Vec<u8>>>) -> Vec<String> {
        let bytes = written.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Transport for ScriptedCoprocessor<'_> {
    type Error = ();

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.written.lock().unwrap().extend_from_slice(data);
        if data == REQUEST_LINE {
            if let Some(Some(reply)) = self.replies.pop_front() {
                self.rx.on_bytes(reply.as_bytes());
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

// ── Scripted ADC ──────────────────────────────────────────────

/// Fixed raw value per channel.  Water conversions complete through the
/// shared completion signal, light conversions after a few polls.
pub struct MockAdc<'a> {
    done: &'a AdcCompletion,
    pub water_raw: u16,
    pub light_raw: u16,
    polls_left: u8,
    in_flight: bool,
    pub overlaps: u32,
}

impl<'a> MockAdc<'a> {
    pub fn new(done: &'a AdcCompletion, water_raw: u16, light_raw: u16) -> Self {
        Self {
            done,
            water_raw,
            light_raw,
            polls_left: 0,
            in_flight: false,
            overlaps: 0,
        }
    }
}

impl AdcPort for MockAdc<'_> {
    fn start(&mut self, channel: AdcChannel, completion: Completion) -> Result<(), SensorError> {
        if self.in_flight {
            self.overlaps += 1;
        }
        match (channel, completion) {
            (AdcChannel::Water, Completion::Interrupt) => self.done.complete(self.water_raw),
            (AdcChannel::Light, Completion::Polled) => {
                self.in_flight = true;
                self.polls_left = 3;
            }
            _ => return Err(SensorError::StartFailed),
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<u16> {
        if !self.in_flight {
            return None;
        }
        if self.polls_left > 0 {
            self.polls_left -= 1;
            return None;
        }
        self.in_flight = false;
        Some(self.light_raw)
    }

    fn cancel(&mut self) {
        self.in_flight = false;
    }
}

// ── Event recorder ────────────────────────────────────────────

/// Cloneable sink; every clone appends to the same history.
#[derive(Clone, Default)]
pub struct Recorder(pub Arc<Mutex<Vec<PipelineEvent>>>);

#[allow(dead_code)]
impl Recorder {
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl EventSink for Recorder {
    fn emit(&mut self, event: &PipelineEvent) {
        self.0.lock().unwrap().push(*event);
    }
}
