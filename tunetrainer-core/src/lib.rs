// tunetrainer-core/src/lib.rs

//! The core logic for TuneTrainer.
//! This crate records a short clip, estimates the pitch of the sustained
//! note in it and tells how far that pitch is from the nearest note. It is
//! completely headless and contains no GUI code.

pub mod audio;
pub mod config;
pub mod error;
pub mod feedback;
pub mod pitch;
pub mod session;
pub mod tuning;

pub use audio::{AudioBuffer, AudioSource, Microphone};
pub use config::TrainerSettings;
pub use error::{CaptureError, TuneError};
pub use feedback::{Feedback, Tone};
pub use pitch::PitchEstimate;
pub use session::Reading;
pub use tuning::{NoteResult, PitchClass, Verdict};
