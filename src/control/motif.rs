//! Audio motifs: fixed tone/duration sequences for each plant mood.

use crate::app::ports::ActuatorPort;
use crate::error::ActuatorError;

/// One tone.  `freq_hz == 0` is a rest of `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub freq_hz: u16,
    pub duration_ms: u16,
}

impl Note {
    pub const fn tone(freq_hz: u16, duration_ms: u16) -> Self {
        Self { freq_hz, duration_ms }
    }

    pub const fn rest(duration_ms: u16) -> Self {
        Self { freq_hz: 0, duration_ms }
    }

    pub const fn is_rest(&self) -> bool {
        self.freq_hz == 0
    }
}

/// Which sequence the actuation loop plays this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMotif {
    Off,
    Happy,
    Sad,
    Alert,
}

/// C-major arpeggio up to A5 and back down.
const HAPPY: [Note; 10] = [
    Note::tone(523, 150),
    Note::tone(659, 150),
    Note::tone(784, 200),
    Note::rest(60),
    Note::tone(784, 120),
    Note::tone(880, 120),
    Note::tone(784, 220),
    Note::rest(80),
    Note::tone(659, 160),
    Note::tone(523, 220),
];

/// Slow descending G4 → C4, resolving to D4.
const SAD: [Note; 7] = [
    Note::tone(392, 220),
    Note::rest(40),
    Note::tone(330, 220),
    Note::rest(40),
    Note::tone(262, 320),
    Note::rest(60),
    Note::tone(294, 420),
];

/// Three short 2 kHz beeps.
const ALERT: [Note; 6] = [
    Note::tone(2000, 150),
    Note::rest(80),
    Note::tone(2000, 150),
    Note::rest(80),
    Note::tone(2000, 150),
    Note::rest(80),
];

impl AudioMotif {
    pub fn notes(self) -> &'static [Note] {
        match self {
            Self::Off => &[],
            Self::Happy => &HAPPY,
            Self::Sad => &SAD,
            Self::Alert => &ALERT,
        }
    }

    /// Total playback time, rests included.
    pub fn duration_ms(self) -> u32 {
        self.notes().iter().map(|n| u32::from(n.duration_ms)).sum()
    }
}

/// Play `motif` to completion on `out`, then leave the buzzer silent.
pub fn play<P: ActuatorPort>(motif: AudioMotif, out: &mut P) -> Result<(), ActuatorError> {
    for &note in motif.notes() {
        if let Err(e) = out.play_note(note) {
            out.silence();
            return Err(e);
        }
    }
    out.silence();
    Ok(())
}
