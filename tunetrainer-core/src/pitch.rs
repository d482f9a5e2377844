//! # Pitch Estimation Module
//!
//! Estimates the fundamental frequency of a sustained note in a recorded clip.
//! The per-frame detection is done by the McLeod pitch method from the
//! `pitch-detection` crate; this module only frames the clip, gates frames on
//! loudness and clarity, and reduces the voiced frames to one median value.

use pitch_detection::detector::PitchDetector;
use pitch_detection::detector::mcleod::McLeodDetector;
use tracing::debug;

use crate::audio::AudioBuffer;

/// Analysis frame length in samples.
pub const FRAME_SIZE: usize = 2048;

/// Distance between the starts of consecutive frames.
pub const HOP_SIZE: usize = 512;

/// Clips shorter than this cannot hold even one period of the lowest note.
pub const MIN_FRAME_SIZE: usize = 256;

/// Lowest accepted fundamental (C2).
pub const MIN_FREQUENCY: f32 = 65.406;

/// Highest accepted fundamental (C7).
pub const MAX_FREQUENCY: f32 = 2093.005;

/// Thresholds applied to every analysis frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorSettings {
    /// Minimum RMS amplitude for a frame to count as sound rather than silence.
    pub amplitude_threshold: f32,
    /// Minimum McLeod clarity (0.0 to 1.0) for a frame to count as pitched.
    pub clarity_threshold: f32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            amplitude_threshold: 0.01,
            clarity_threshold: 0.7,
        }
    }
}

/// The estimator's answer for a whole clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchEstimate {
    Detected {
        /// Median fundamental of the voiced frames, in Hz.
        frequency: f32,
        /// Mean clarity of the voiced frames.
        clarity: f32,
        voiced_frames: usize,
    },
    /// Silence, noise, or a clip too short to analyse.
    Absent,
}

impl PitchEstimate {
    pub fn frequency(&self) -> Option<f32> {
        match self {
            PitchEstimate::Detected { frequency, .. } => Some(*frequency),
            PitchEstimate::Absent => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, PitchEstimate::Detected { .. })
    }
}

/// Estimates the dominant pitch of `buffer`.
///
/// # Returns
/// * `PitchEstimate::Detected` - Median frequency over all voiced frames
/// * `PitchEstimate::Absent` - No frame passed the loudness, clarity and range checks
pub fn estimate_pitch(buffer: &AudioBuffer, settings: &EstimatorSettings) -> PitchEstimate {
    let signal = buffer.samples();
    if signal.len() < MIN_FRAME_SIZE || buffer.sample_rate() == 0 {
        debug!("Clip too short for pitch estimation: {} samples", signal.len());
        return PitchEstimate::Absent;
    }

    let frame_size = signal.len().min(FRAME_SIZE);
    let power_threshold = settings.amplitude_threshold.powi(2) * frame_size as f32;
    let mut detector = McLeodDetector::<f32>::new(frame_size, frame_size / 2);

    let mut frequencies = Vec::new();
    let mut clarity_sum = 0.0;
    let mut total_frames = 0;

    for start in (0..=signal.len() - frame_size).step_by(HOP_SIZE) {
        total_frames += 1;
        let frame = &signal[start..start + frame_size];
        let Some(pitch) = detector.get_pitch(
            frame,
            buffer.sample_rate() as usize,
            power_threshold,
            settings.clarity_threshold,
        ) else {
            continue;
        };

        if pitch.frequency.is_finite() && (MIN_FREQUENCY..=MAX_FREQUENCY).contains(&pitch.frequency) {
            frequencies.push(pitch.frequency);
            clarity_sum += pitch.clarity;
        }
    }

    debug!("{} of {} frames voiced", frequencies.len(), total_frames);

    let voiced_frames = frequencies.len();
    match median(&mut frequencies) {
        Some(frequency) => PitchEstimate::Detected {
            frequency,
            clarity: clarity_sum / voiced_frames as f32,
            voiced_frames,
        },
        None => PitchEstimate::Absent,
    }
}

/// Median of `values`; the mean of the middle pair for an even count.
fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
