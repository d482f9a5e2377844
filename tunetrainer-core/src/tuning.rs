//! # Musical Tuning Module
//!
//! This module maps a measured frequency onto the nearest equal-tempered note
//! and reports the deviation in cents together with an intonation verdict.
//!
//! ## Features
//! - Twelve-tone equal temperament around a configurable A4 reference
//! - Scientific pitch notation (MIDI 60 = C4)
//! - Explicit tie-break at exactly half a semitone
//! - Cent deviation calculations for tuning accuracy

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TuneError;

/// MIDI note number of the reference note A4.
pub const A4_MIDI: i32 = 69;

/// Standard concert pitch in Hz.
pub const CONCERT_PITCH: f32 = 440.0;

/// Offsets closer than this to an exact half semitone count as a tie.
const TIE_EPSILON: f64 = 1e-5;

/// One of the twelve pitch classes, spelled with sharps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Pitch class of a MIDI note number.
    pub fn from_midi(midi: i32) -> Self {
        Self::ALL[midi.rem_euclid(12) as usize]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Intonation verdict relative to the tolerance window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    InTune,
    Sharp,
    Flat,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::InTune => f.write_str("in tune"),
            Verdict::Sharp => f.write_str("sharp"),
            Verdict::Flat => f.write_str("flat"),
        }
    }
}

/// Parameters of the note mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningSettings {
    /// Frequency of A4 in Hz.
    pub reference_pitch: f32,
    /// Largest absolute deviation, in cents, still judged in tune.
    pub tolerance_cents: f32,
}

impl Default for TuningSettings {
    fn default() -> Self {
        Self {
            reference_pitch: CONCERT_PITCH,
            tolerance_cents: 10.0,
        }
    }
}

/// The nearest note to a measured frequency and how far off it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteResult {
    pub pitch_class: PitchClass,
    pub octave: i32,
    pub midi_note: i32,
    /// The measured frequency in Hz.
    pub detected_frequency: f32,
    /// Equal-tempered frequency of the nearest note in Hz.
    pub reference_frequency: f32,
    /// Signed deviation from the nearest note (positive = sharp).
    pub cents: f32,
    /// In-tune window the verdict was judged against.
    pub tolerance_cents: f32,
    pub verdict: Verdict,
}

impl NoteResult {
    /// Note name with octave, e.g. "A4" or "C#3".
    pub fn name(&self) -> String {
        format!("{}{}", self.pitch_class, self.octave)
    }
}

/// Maps a frequency to the nearest equal-tempered note.
///
/// The semitone offset from the reference is `12 * log2(f / reference)`. It
/// is rounded to the nearest whole semitone; an offset exactly halfway
/// between two notes resolves to the lower one, so the deviation is then
/// reported as +50 cents (sharp) rather than -50 cents (flat).
///
/// # Arguments
/// * `frequency` - Measured frequency in Hz
/// * `settings` - Reference pitch and in-tune tolerance
///
/// # Returns
/// * `Ok(note)` - Nearest note, cents deviation and verdict
/// * `Err(TuneError::InvalidInput)` - Frequency or reference pitch not positive and finite
pub fn map_frequency(frequency: f32, settings: &TuningSettings) -> Result<NoteResult, TuneError> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(TuneError::InvalidInput(format!(
            "frequency must be positive, got {frequency} Hz"
        )));
    }
    if !settings.reference_pitch.is_finite() || settings.reference_pitch <= 0.0 {
        return Err(TuneError::InvalidInput(format!(
            "reference pitch must be positive, got {} Hz",
            settings.reference_pitch
        )));
    }

    let offset = 12.0 * (frequency as f64 / settings.reference_pitch as f64).log2();
    let nearest = nearest_semitone(offset);
    let cents = (100.0 * (offset - nearest as f64)) as f32;
    let midi_note = A4_MIDI + nearest;

    Ok(NoteResult {
        pitch_class: PitchClass::from_midi(midi_note),
        octave: octave_of(midi_note),
        midi_note,
        detected_frequency: frequency,
        reference_frequency: midi_to_frequency(midi_note, settings.reference_pitch),
        cents,
        tolerance_cents: settings.tolerance_cents,
        verdict: classify(cents, settings.tolerance_cents),
    })
}

/// Rounds a semitone offset to the nearest integer, ties going down.
fn nearest_semitone(offset: f64) -> i32 {
    let lower = offset.floor();
    if offset - lower > 0.5 + TIE_EPSILON {
        lower as i32 + 1
    } else {
        lower as i32
    }
}

/// Octave number in scientific pitch notation.
pub fn octave_of(midi: i32) -> i32 {
    midi.div_euclid(12) - 1
}

/// Equal-tempered frequency of a MIDI note for the given A4 reference.
pub fn midi_to_frequency(midi: i32, reference_pitch: f32) -> f32 {
    (reference_pitch as f64 * 2f64.powf((midi - A4_MIDI) as f64 / 12.0)) as f32
}

/// Calculates the deviation from a target frequency in cents.
///
/// # Returns
/// * Cent deviation (positive = sharp, negative = flat)
pub fn cents_between(freq: f32, target_freq: f32) -> f32 {
    (1200.0 * (freq as f64 / target_freq as f64).log2()) as f32
}

/// Judges a deviation against the tolerance window (inclusive).
pub fn classify(cents: f32, tolerance_cents: f32) -> Verdict {
    if cents.abs() <= tolerance_cents {
        Verdict::InTune
    } else if cents > 0.0 {
        Verdict::Sharp
    } else {
        Verdict::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn map(freq: f32) -> NoteResult {
        map_frequency(freq, &TuningSettings::default()).unwrap()
    }

    #[test]
    fn exact_semitones_have_zero_deviation() {
        for n in -48..=39 {
            let freq = 440.0 * 2f32.powf(n as f32 / 12.0);
            let note = map(freq);
            assert_eq!(note.midi_note, 69 + n, "n = {n}");
            assert_eq!(note.pitch_class, PitchClass::from_midi(69 + n));
            assert_eq!(note.octave, (69 + n).div_euclid(12) - 1);
            assert_abs_diff_eq!(note.cents, 0.0, epsilon = 1e-3);
            assert_eq!(note.verdict, Verdict::InTune);
        }
    }

    #[test]
    fn well_known_notes() {
        assert_eq!(map(440.0).name(), "A4");
        assert_eq!(map(261.6256).name(), "C4");
        assert_eq!(map(27.5).name(), "A0");
        assert_eq!(map(4186.009).name(), "C8");
        assert_eq!(map(138.5913).name(), "C#3");
    }

    #[test]
    fn a_sharp_4_is_selected_over_a4() {
        let note = map(466.16);
        assert_eq!(note.name(), "A#4");
        assert_abs_diff_eq!(note.cents, 0.0, epsilon = 0.1);
        assert_abs_diff_eq!(cents_between(466.16, 440.0), 100.0, epsilon = 0.1);
        assert_abs_diff_eq!(note.reference_frequency, 466.1638, epsilon = 1e-3);
    }

    #[test]
    fn exact_half_semitone_resolves_to_lower_note_sharp() {
        let freq = 440.0 * 2f32.powf(1.0 / 24.0);
        let note = map(freq);
        assert_eq!(note.name(), "A4");
        assert_abs_diff_eq!(note.cents, 50.0, epsilon = 1e-2);
        assert_eq!(note.verdict, Verdict::Sharp);

        let below = map(440.0 * 2f32.powf(-1.0 / 24.0));
        assert_eq!(below.name(), "G#4");
        assert_abs_diff_eq!(below.cents, 50.0, epsilon = 1e-2);
        assert_eq!(below.verdict, Verdict::Sharp);
    }

    #[test]
    fn just_past_half_semitone_rounds_up() {
        // 453 Hz is 50.4 cents above A4.
        let note = map(453.0);
        assert_eq!(note.name(), "A#4");
        assert_abs_diff_eq!(note.cents, -49.6, epsilon = 0.1);
        assert_eq!(note.verdict, Verdict::Flat);
    }

    #[test]
    fn verdict_respects_tolerance_boundaries() {
        assert_eq!(classify(10.0, 10.0), Verdict::InTune);
        assert_eq!(classify(-10.0, 10.0), Verdict::InTune);
        assert_eq!(classify(10.01, 10.0), Verdict::Sharp);
        assert_eq!(classify(-10.01, 10.0), Verdict::Flat);
        assert_eq!(classify(0.0, 0.0), Verdict::InTune);
    }

    #[test]
    fn sharp_and_flat_notes() {
        let sharp = map(445.0);
        assert_eq!(sharp.name(), "A4");
        assert_abs_diff_eq!(sharp.cents, 19.56, epsilon = 0.05);
        assert_eq!(sharp.verdict, Verdict::Sharp);

        let flat = map(435.0);
        assert_eq!(flat.name(), "A4");
        assert_abs_diff_eq!(flat.cents, -19.79, epsilon = 0.05);
        assert_eq!(flat.verdict, Verdict::Flat);
    }

    #[test]
    fn result_carries_the_tolerance_it_was_judged_with() {
        let settings = TuningSettings {
            tolerance_cents: 2.0,
            ..TuningSettings::default()
        };
        let note = map_frequency(441.0, &settings).unwrap();
        assert_eq!(note.tolerance_cents, 2.0);
        assert_eq!(note.verdict, Verdict::Sharp);
    }

    #[test]
    fn non_positive_frequencies_are_rejected() {
        for freq in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                map_frequency(freq, &TuningSettings::default()),
                Err(TuneError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn invalid_reference_pitch_is_rejected() {
        let settings = TuningSettings {
            reference_pitch: 0.0,
            ..TuningSettings::default()
        };
        assert!(matches!(map_frequency(440.0, &settings), Err(TuneError::InvalidInput(_))));
    }

    #[test]
    fn alternative_reference_pitch() {
        let settings = TuningSettings {
            reference_pitch: 415.0,
            ..TuningSettings::default()
        };
        let note = map_frequency(415.0, &settings).unwrap();
        assert_eq!(note.name(), "A4");
        assert_abs_diff_eq!(note.cents, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn negative_midi_notes_keep_valid_names() {
        let note = map(5.0);
        assert!(note.midi_note < 0);
        assert_eq!(note.octave, -2);
        assert_eq!(note.pitch_class, PitchClass::from_midi(note.midi_note));
    }

    proptest! {
        #[test]
        fn mapping_is_idempotent(freq in 20.0f32..5000.0) {
            let settings = TuningSettings::default();
            prop_assert_eq!(map_frequency(freq, &settings).unwrap(), map_frequency(freq, &settings).unwrap());
        }

        #[test]
        fn cents_stay_within_half_semitone(freq in 20.0f32..5000.0) {
            let note = map(freq);
            prop_assert!(note.cents > -50.01 && note.cents <= 50.01, "cents = {}", note.cents);
            let recomputed = cents_between(freq, note.reference_frequency);
            prop_assert!((recomputed - note.cents).abs() < 1e-2);
        }
    }
}
