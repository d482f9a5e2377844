//! # Error Types
//!
//! Every failure a Record press can end in. None of them are fatal: the GUI
//! shows the message and the user can simply record again.

use thiserror::Error;

/// Failures while opening or reading the audio input device.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("No input device available")]
    NoInputDevice,

    #[error("Microphone access denied: {0}")]
    AccessDenied(String),

    #[error("Input device does not support a sample rate of {0} Hz")]
    UnsupportedSampleRate(u32),

    #[error("Input device offers no supported sample format (f32, i16 or u16)")]
    NoSupportedFormat,

    #[error("Audio backend error: {0}")]
    Backend(String),

    #[error("Audio stream error: {0}")]
    Stream(String),

    /// The stream stopped delivering samples before the recording was full.
    #[error("Audio stream stalled after {captured} of {expected} samples")]
    Stalled { captured: usize, expected: usize },
}

/// Top-level error of a recording session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuneError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The recording contained no clear, sustained pitch.
    #[error("No pitch detected")]
    Silence,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CaptureError {
    /// Classifies a backend-specific error description.
    ///
    /// Backends report OS permission failures only as free text, so the
    /// description is the only thing to go on.
    pub fn from_backend_description(description: impl Into<String>) -> Self {
        let description = description.into();
        let lower = description.to_lowercase();
        if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
            CaptureError::AccessDenied(description)
        } else {
            CaptureError::Backend(description)
        }
    }
}

impl From<cpal::DevicesError> for CaptureError {
    fn from(err: cpal::DevicesError) -> Self {
        match err {
            cpal::DevicesError::BackendSpecific { err } => {
                CaptureError::from_backend_description(err.description)
            }
            #[allow(unreachable_patterns)]
            other => CaptureError::Backend(other.to_string()),
        }
    }
}

impl From<cpal::SupportedStreamConfigsError> for CaptureError {
    fn from(err: cpal::SupportedStreamConfigsError) -> Self {
        match err {
            cpal::SupportedStreamConfigsError::DeviceNotAvailable => CaptureError::NoInputDevice,
            cpal::SupportedStreamConfigsError::BackendSpecific { err } => {
                CaptureError::from_backend_description(err.description)
            }
            other => CaptureError::Backend(other.to_string()),
        }
    }
}

impl From<cpal::BuildStreamError> for CaptureError {
    fn from(err: cpal::BuildStreamError) -> Self {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => CaptureError::NoInputDevice,
            cpal::BuildStreamError::BackendSpecific { err } => {
                CaptureError::from_backend_description(err.description)
            }
            other => CaptureError::Backend(other.to_string()),
        }
    }
}

impl From<cpal::PlayStreamError> for CaptureError {
    fn from(err: cpal::PlayStreamError) -> Self {
        match err {
            cpal::PlayStreamError::DeviceNotAvailable => CaptureError::NoInputDevice,
            cpal::PlayStreamError::BackendSpecific { err } => {
                CaptureError::from_backend_description(err.description)
            }
            #[allow(unreachable_patterns)]
            other => CaptureError::Backend(other.to_string()),
        }
    }
}

impl From<cpal::StreamError> for CaptureError {
    fn from(err: cpal::StreamError) -> Self {
        match err {
            cpal::StreamError::DeviceNotAvailable => CaptureError::NoInputDevice,
            cpal::StreamError::BackendSpecific { err } => {
                CaptureError::from_backend_description(err.description)
            }
            #[allow(unreachable_patterns)]
            other => CaptureError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_messages_are_classified_as_access_denied() {
        let err = CaptureError::from_backend_description("Permission denied (os error 13)");
        assert!(matches!(err, CaptureError::AccessDenied(_)));

        let err = CaptureError::from_backend_description("ALSA function 'snd_pcm_open' failed");
        assert!(matches!(err, CaptureError::Backend(_)));
    }

    #[test]
    fn capture_errors_display_through_tune_error() {
        let err: TuneError = CaptureError::NoInputDevice.into();
        assert_eq!(err.to_string(), "No input device available");
    }
}
