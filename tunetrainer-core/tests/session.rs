//! End-to-end session tests driven by synthetic audio sources.

use tunetrainer_core::{
    AudioBuffer, AudioSource, CaptureError, Feedback, Tone, TrainerSettings, TuneError, Verdict,
    audio::expected_sample_count, session,
};

/// Produces a pure sine at a fixed frequency.
struct ToneSource {
    frequency: f32,
    amplitude: f32,
    calls: usize,
}

impl ToneSource {
    fn new(frequency: f32) -> Self {
        Self {
            frequency,
            amplitude: 0.5,
            calls: 0,
        }
    }
}

impl AudioSource for ToneSource {
    fn capture(&mut self, duration_secs: f32, sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
        self.calls += 1;
        let len = expected_sample_count(duration_secs, sample_rate);
        let samples = (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * self.frequency * t).sin() * self.amplitude
            })
            .collect();
        Ok(AudioBuffer::new(samples, sample_rate))
    }
}

/// Fails every capture with the given error.
struct BrokenSource(CaptureError);

impl AudioSource for BrokenSource {
    fn capture(&mut self, _: f32, _: u32) -> Result<AudioBuffer, CaptureError> {
        Err(self.0.clone())
    }
}

#[test]
fn in_tune_a4_is_reported() {
    let mut source = ToneSource::new(440.0);
    let reading = session::run(&mut source, &TrainerSettings::default()).unwrap();

    assert_eq!(reading.note.name(), "A4");
    assert!(reading.note.cents.abs() < 5.0, "cents = {}", reading.note.cents);
    assert_eq!(reading.note.verdict, Verdict::InTune);
    assert_eq!(reading.buffer.len(), 88200);
    assert_eq!(source.calls, 1);
}

#[test]
fn sharp_note_is_reported_at_48k() {
    // About 30 cents above E4 (329.63 Hz).
    let mut source = ToneSource::new(335.4);
    let settings = TrainerSettings {
        sample_rate: 48000,
        duration_secs: 1.0,
        ..TrainerSettings::default()
    };
    let reading = session::run(&mut source, &settings).unwrap();

    assert_eq!(reading.note.name(), "E4");
    assert_eq!(reading.note.verdict, Verdict::Sharp);
    assert!((reading.note.cents - 30.0).abs() < 5.0, "cents = {}", reading.note.cents);
}

#[test]
fn silence_propagates_as_no_pitch() {
    let mut source = ToneSource {
        amplitude: 0.0,
        ..ToneSource::new(440.0)
    };
    let outcome = session::run(&mut source, &TrainerSettings::default());
    assert_eq!(outcome.clone().unwrap_err(), TuneError::Silence);

    let feedback = Feedback::from_outcome(&outcome);
    assert_eq!(feedback.tone, Tone::Warning);
    assert!(feedback.headline.starts_with("No pitch detected"));
}

#[test]
fn invalid_settings_never_reach_the_device() {
    let mut source = ToneSource::new(440.0);
    let settings = TrainerSettings {
        duration_secs: 0.0,
        ..TrainerSettings::default()
    };
    let err = session::run(&mut source, &settings).unwrap_err();

    assert!(matches!(err, TuneError::InvalidInput(_)));
    assert_eq!(source.calls, 0);
}

#[test]
fn capture_failures_surface_as_errors() {
    let mut source = BrokenSource(CaptureError::AccessDenied("Permission denied".to_string()));
    let outcome = session::run(&mut source, &TrainerSettings::default());

    assert!(matches!(
        outcome,
        Err(TuneError::Capture(CaptureError::AccessDenied(_)))
    ));
    assert_eq!(Feedback::from_outcome(&outcome).tone, Tone::Error);
}

#[test]
fn repeated_sessions_give_identical_results() {
    let settings = TrainerSettings::default();
    let first = session::run(&mut ToneSource::new(523.25), &settings).unwrap();
    let second = session::run(&mut ToneSource::new(523.25), &settings).unwrap();
    assert_eq!(first.note, second.note);
    assert_eq!(first.note.name(), "C5");
}
