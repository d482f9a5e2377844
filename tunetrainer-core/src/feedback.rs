//! # Feedback Module
//!
//! Turns the outcome of a session into what the user reads: a headline, a
//! status line, detail lines, a color class and a meter position. The GUI
//! only draws what this module decides.

use crate::error::TuneError;
use crate::session::Reading;
use crate::tuning::Verdict;

/// Half-width of the cent meter in cents.
pub const METER_RANGE: f32 = 50.0;

pub const IDLE_MESSAGE: &str =
    "Press Record and play or sing a single note for about two seconds.";

pub const NO_PITCH_MESSAGE: &str = "No pitch detected. Try playing a clearer, sustained note.";

/// Color class of the output area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Idle,
    InTune,
    OffPitch,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub headline: String,
    pub status: Option<String>,
    pub details: Vec<String>,
    pub tone: Tone,
    /// Needle position from 0 (50 cents flat) to 100 (50 cents sharp).
    pub meter: Option<f32>,
    /// Signed cents behind the meter, for drawing.
    pub cents: Option<f32>,
    /// In-tune window the reading was judged against.
    pub tolerance: Option<f32>,
}

impl Feedback {
    pub fn idle() -> Self {
        Self {
            headline: IDLE_MESSAGE.to_string(),
            status: None,
            details: Vec::new(),
            tone: Tone::Idle,
            meter: None,
            cents: None,
            tolerance: None,
        }
    }

    /// Builds the feedback for a finished session.
    pub fn from_outcome(outcome: &Result<Reading, TuneError>) -> Self {
        match outcome {
            Ok(reading) => Self::from_reading(reading),
            Err(err) => Self::from_error(err),
        }
    }

    /// Builds the feedback for a reading. Status text and meter band use the
    /// tolerance stored in the note, the same one its verdict was judged with.
    pub fn from_reading(reading: &Reading) -> Self {
        let note = &reading.note;
        let cents_abs = note.cents.abs();
        let tolerance_cents = note.tolerance_cents;

        let (status, tone) = match note.verdict {
            Verdict::InTune => (format!("In tune (±{tolerance_cents} cents)"), Tone::InTune),
            Verdict::Sharp => (format!("{cents_abs:.1} cents sharp"), Tone::OffPitch),
            Verdict::Flat => (format!("{cents_abs:.1} cents flat"), Tone::OffPitch),
        };

        Self {
            headline: format!("Detected note: {}", note.name()),
            status: Some(status),
            details: vec![
                format!("Fundamental frequency: {:.2} Hz", note.detected_frequency),
                format!("Nearest note frequency: {:.2} Hz", note.reference_frequency),
                format!("Cent deviation: {:+.1} cents", note.cents),
                format!(
                    "Recorded {:.1} s at {} Hz",
                    reading.buffer.duration(),
                    reading.buffer.sample_rate()
                ),
            ],
            tone,
            meter: Some(meter_position(note.cents)),
            cents: Some(note.cents),
            tolerance: Some(tolerance_cents),
        }
    }

    pub fn from_error(err: &TuneError) -> Self {
        let (headline, tone) = match err {
            TuneError::Silence => (NO_PITCH_MESSAGE.to_string(), Tone::Warning),
            other => (other.to_string(), Tone::Error),
        };

        Self {
            headline,
            status: None,
            details: Vec::new(),
            tone,
            meter: None,
            cents: None,
            tolerance: None,
        }
    }
}

/// Maps cents onto the 0..=100 meter scale, clamping beyond ±50.
pub fn meter_position(cents: f32) -> f32 {
    (cents + METER_RANGE).clamp(0.0, 2.0 * METER_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;
    use crate::error::CaptureError;
    use crate::tuning::{TuningSettings, map_frequency};

    fn reading(freq: f32) -> Reading {
        Reading {
            note: map_frequency(freq, &TuningSettings::default()).unwrap(),
            buffer: AudioBuffer::new(vec![0.0; 88200], 44100),
        }
    }

    #[test]
    fn in_tune_reading() {
        let feedback = Feedback::from_reading(&reading(440.0));
        assert_eq!(feedback.headline, "Detected note: A4");
        assert_eq!(feedback.status.as_deref(), Some("In tune (±10 cents)"));
        assert_eq!(feedback.tone, Tone::InTune);
        assert_eq!(feedback.meter, Some(50.0));
        assert_eq!(feedback.details[0], "Fundamental frequency: 440.00 Hz");
        assert_eq!(feedback.details[1], "Nearest note frequency: 440.00 Hz");
        assert_eq!(feedback.details[2], "Cent deviation: +0.0 cents");
        assert_eq!(feedback.details[3], "Recorded 2.0 s at 44100 Hz");
    }

    #[test]
    fn sharp_and_flat_readings() {
        let sharp = Feedback::from_reading(&reading(445.0));
        assert_eq!(sharp.status.as_deref(), Some("19.6 cents sharp"));
        assert_eq!(sharp.tone, Tone::OffPitch);

        let flat = Feedback::from_reading(&reading(435.0));
        assert_eq!(flat.status.as_deref(), Some("19.8 cents flat"));
        assert_eq!(flat.details[2], "Cent deviation: -19.8 cents");
    }

    #[test]
    fn status_follows_the_judged_tolerance() {
        // 441 Hz is about 3.9 cents sharp of A4.
        let judged = |tolerance_cents: f32| Reading {
            note: map_frequency(
                441.0,
                &TuningSettings {
                    tolerance_cents,
                    ..TuningSettings::default()
                },
            )
            .unwrap(),
            buffer: AudioBuffer::new(vec![0.0; 44100], 44100),
        };

        let wide = Feedback::from_reading(&judged(10.0));
        assert_eq!(wide.status.as_deref(), Some("In tune (±10 cents)"));
        assert_eq!(wide.tone, Tone::InTune);
        assert_eq!(wide.tolerance, Some(10.0));

        let narrow = Feedback::from_reading(&judged(2.0));
        assert_eq!(narrow.status.as_deref(), Some("3.9 cents sharp"));
        assert_eq!(narrow.tone, Tone::OffPitch);
        assert_eq!(narrow.tolerance, Some(2.0));
    }

    #[test]
    fn tone_always_agrees_with_verdict() {
        for freq in [427.0, 436.0, 440.0, 441.0, 445.0, 452.0] {
            for tolerance_cents in [0.0, 2.0, 5.0, 10.0, 25.0] {
                let note = map_frequency(
                    freq,
                    &TuningSettings {
                        tolerance_cents,
                        ..TuningSettings::default()
                    },
                )
                .unwrap();
                let feedback = Feedback::from_reading(&Reading {
                    note,
                    buffer: AudioBuffer::new(Vec::new(), 44100),
                });
                let in_tune = feedback.tone == Tone::InTune;
                assert_eq!(
                    in_tune,
                    note.verdict == Verdict::InTune,
                    "{freq} Hz, ±{tolerance_cents}"
                );
                assert_eq!(in_tune, note.cents.abs() <= feedback.tolerance.unwrap());
            }
        }
    }

    #[test]
    fn silence_is_a_distinct_warning() {
        let feedback = Feedback::from_outcome(&Err(TuneError::Silence));
        assert_eq!(feedback.headline, NO_PITCH_MESSAGE);
        assert_eq!(feedback.tone, Tone::Warning);
        assert_eq!(feedback.meter, None);
    }

    #[test]
    fn capture_errors_show_their_message() {
        let feedback = Feedback::from_outcome(&Err(CaptureError::NoInputDevice.into()));
        assert_eq!(feedback.headline, "No input device available");
        assert_eq!(feedback.tone, Tone::Error);
    }

    #[test]
    fn meter_is_clamped() {
        assert_eq!(meter_position(0.0), 50.0);
        assert_eq!(meter_position(-50.0), 0.0);
        assert_eq!(meter_position(80.0), 100.0);
        assert_eq!(meter_position(12.5), 62.5);
    }
}
