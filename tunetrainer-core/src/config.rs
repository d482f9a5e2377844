//! # Settings Module
//!
//! User-adjustable recording and judging parameters, persisted as JSON so the
//! GUI comes back with the same choices on the next start.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::TuneError;
use crate::pitch::EstimatorSettings;
use crate::tuning::{CONCERT_PITCH, TuningSettings};

/// Default file name the GUI reads and writes in its working directory.
pub const SETTINGS_FILE: &str = "tunetrainer_settings.json";

/// Longest recording accepted, in seconds.
pub const MAX_DURATION_SECS: f32 = 30.0;

/// Recording length choices offered by the GUI.
pub const DURATION_RANGE: std::ops::RangeInclusive<f32> = 1.0..=5.0;
pub const DURATION_STEP: f32 = 0.5;

/// Sample rates offered by the GUI.
pub const SAMPLE_RATES: [u32; 2] = [44100, 48000];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSettings {
    pub duration_secs: f32,
    pub sample_rate: u32,
    pub tolerance_cents: f32,
    pub reference_pitch: f32,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            duration_secs: 2.0,
            sample_rate: 44100,
            tolerance_cents: 10.0,
            reference_pitch: CONCERT_PITCH,
        }
    }
}

impl TrainerSettings {
    /// Rejects settings a recording session cannot run with.
    pub fn validate(&self) -> Result<(), TuneError> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(TuneError::InvalidInput(format!(
                "duration must be positive, got {} s",
                self.duration_secs
            )));
        }
        if self.duration_secs > MAX_DURATION_SECS {
            return Err(TuneError::InvalidInput(format!(
                "duration must not exceed {MAX_DURATION_SECS} s, got {} s",
                self.duration_secs
            )));
        }
        if self.sample_rate == 0 {
            return Err(TuneError::InvalidInput("sample rate must be positive".to_string()));
        }
        if !self.tolerance_cents.is_finite() || !(0.0..50.0).contains(&self.tolerance_cents) {
            return Err(TuneError::InvalidInput(format!(
                "tolerance must be between 0 and 50 cents, got {}",
                self.tolerance_cents
            )));
        }
        if !self.reference_pitch.is_finite() || self.reference_pitch <= 0.0 {
            return Err(TuneError::InvalidInput(format!(
                "reference pitch must be positive, got {} Hz",
                self.reference_pitch
            )));
        }
        Ok(())
    }

    pub fn tuning(&self) -> TuningSettings {
        TuningSettings {
            reference_pitch: self.reference_pitch,
            tolerance_cents: self.tolerance_cents,
        }
    }

    pub fn estimator(&self) -> EstimatorSettings {
        EstimatorSettings::default()
    }

    /// Saves the settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json_string = serde_json::to_string_pretty(self).context("serializing settings")?;
        let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        file.write_all(json_string.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Loads settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut data = String::new();
        file.read_to_string(&mut data)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: TrainerSettings =
            serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }
}
