//! Actuation: snapshot → LED intensity + audio motif → outputs.

pub mod actuation;
pub mod mapping;
pub mod motif;

use motif::AudioMotif;

/// Derived every cycle, never stored beyond the outputs themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub led_intensity: u8,
    pub audio_motif: AudioMotif,
}
