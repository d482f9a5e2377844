//! # Recording Session
//!
//! One Record press: validate the settings, capture a clip, estimate its
//! pitch and map it onto the nearest note. Data flows one way through the
//! stages and nothing outlives the call except the returned `Reading`.

use tracing::{debug, info};

use crate::audio::{AudioBuffer, AudioSource};
use crate::config::TrainerSettings;
use crate::error::TuneError;
use crate::pitch::{self, PitchEstimate};
use crate::tuning::{self, NoteResult};

/// The successful result of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub note: NoteResult,
    /// The clip the note was measured from, kept for the waveform view.
    pub buffer: AudioBuffer,
}

/// Runs a capture-then-analyse cycle.
///
/// # Returns
/// * `Ok(reading)` - A pitch was found and mapped
/// * `Err(TuneError::InvalidInput)` - Settings rejected before the device was touched
/// * `Err(TuneError::Capture)` - The source failed to record
/// * `Err(TuneError::Silence)` - The clip held no clear pitch
pub fn run<S: AudioSource + ?Sized>(source: &mut S, settings: &TrainerSettings) -> Result<Reading, TuneError> {
    settings.validate()?;

    info!(
        "Recording for {} seconds at {} Hz...",
        settings.duration_secs, settings.sample_rate
    );
    let buffer = source.capture(settings.duration_secs, settings.sample_rate)?;

    analyse(buffer, settings)
}

/// Estimates and maps the pitch of an already recorded clip.
pub fn analyse(buffer: AudioBuffer, settings: &TrainerSettings) -> Result<Reading, TuneError> {
    let estimate = pitch::estimate_pitch(&buffer, &settings.estimator());
    debug!("Pitch estimate: {:?}", estimate);

    let frequency = match estimate {
        PitchEstimate::Detected { frequency, .. } => frequency,
        PitchEstimate::Absent => return Err(TuneError::Silence),
    };

    let note = tuning::map_frequency(frequency, &settings.tuning())?;
    info!(
        "Detected {} at {:.2} Hz ({:+.1} cents, {})",
        note.name(),
        frequency,
        note.cents,
        note.verdict
    );

    Ok(Reading { note, buffer })
}
