//! # Audio Capture Module
//!
//! This module records fixed-length clips from the default input device using
//! CPAL (Cross-Platform Audio Library). A capture call blocks until the
//! requested number of samples has arrived and releases the device before it
//! returns, on success and on every error path.
//!
//! ## Features
//! - Automatic input device and stream configuration selection
//! - f32, i16 and u16 sample formats, down-mixed to mono
//! - Stall detection when the device stops delivering data
//! - `AudioSource` trait so the rest of the pipeline can run without hardware

use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample, SupportedStreamConfigRange};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, info};

use crate::error::CaptureError;

/// Extra time granted on top of the recording duration before a capture is
/// declared stalled.
pub const CAPTURE_GRACE: Duration = Duration::from_secs(2);

/// A mono recording tagged with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of the recording in seconds.
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Anything that can produce a fixed-length recording on request.
pub trait AudioSource {
    /// Blocks until `duration_secs` of audio at `sample_rate` has been recorded.
    fn capture(&mut self, duration_secs: f32, sample_rate: u32) -> Result<AudioBuffer, CaptureError>;
}

/// The system's default input device.
#[derive(Debug, Default, Clone, Copy)]
pub struct Microphone;

impl AudioSource for Microphone {
    fn capture(&mut self, duration_secs: f32, sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
        record_from_default_device(duration_secs, sample_rate)
    }
}

/// Number of samples a recording of the given length holds.
pub fn expected_sample_count(duration_secs: f32, sample_rate: u32) -> usize {
    (duration_secs as f64 * sample_rate as f64).round().max(0.0) as usize
}

/// Records a mono clip from the default input device.
///
/// This function:
/// 1. Selects the default audio input device
/// 2. Picks a stream configuration that supports `sample_rate`
/// 3. Streams callback data through a channel until the clip is full
/// 4. Drops the stream, releasing the device
///
/// # Returns
/// * `Ok(buffer)` - Exactly `expected_sample_count(duration_secs, sample_rate)` samples
/// * `Err(e)` - No device, access denied, unsupported configuration, or a stream failure
pub fn record_from_default_device(duration_secs: f32, sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(CaptureError::NoInputDevice)?;

    info!(
        "Using audio input device: {}",
        device.name().unwrap_or_else(|_| "<unnamed>".to_string())
    );

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(&configs, sample_rate)?;
    let sample_format = supported_config.sample_format();
    let config: cpal::StreamConfig = supported_config
        .with_sample_rate(cpal::SampleRate(sample_rate))
        .into();

    info!(
        "Selected input config: {} Hz, {} channel(s), {:?}",
        sample_rate, config.channels, sample_format
    );

    let expected = expected_sample_count(duration_secs, sample_rate);
    let (chunk_tx, chunk_rx) = crossbeam_channel::unbounded::<Vec<f32>>();
    let (error_tx, error_rx) = crossbeam_channel::bounded::<CaptureError>(1);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, chunk_tx, error_tx)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, chunk_tx, error_tx)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, chunk_tx, error_tx)?,
        _ => return Err(CaptureError::NoSupportedFormat),
    };

    stream.play()?;
    debug!("Recording {} samples ({:.2} s)", expected, duration_secs);

    let timeout = Duration::from_secs_f32(duration_secs.max(0.0)) + CAPTURE_GRACE;
    let result = collect_samples(&chunk_rx, &error_rx, expected, timeout);

    // The device is released here regardless of how collection ended.
    if let Err(e) = stream.pause() {
        debug!("Error pausing stream: {}", e);
    }
    drop(stream);

    let samples = result?;
    info!("Recording complete: {} samples", samples.len());
    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Finds the best supported input configuration for the target sample rate.
///
/// Among the ranges that contain `target_rate` and carry a convertible sample
/// format, prefers fewer channels (mono first), then f32 over integer formats.
fn find_supported_config(
    configs: &[SupportedStreamConfigRange],
    target_rate: u32,
) -> Result<SupportedStreamConfigRange, CaptureError> {
    let usable: Vec<&SupportedStreamConfigRange> = configs
        .iter()
        .filter(|c| format_rank(c.sample_format()).is_some())
        .collect();

    if usable.is_empty() {
        return Err(CaptureError::NoSupportedFormat);
    }

    usable
        .into_iter()
        .filter(|c| c.min_sample_rate().0 <= target_rate && target_rate <= c.max_sample_rate().0)
        .min_by_key(|c| (c.channels(), format_rank(c.sample_format())))
        .cloned()
        .ok_or(CaptureError::UnsupportedSampleRate(target_rate))
}

fn format_rank(format: cpal::SampleFormat) -> Option<u8> {
    match format {
        cpal::SampleFormat::F32 => Some(0),
        cpal::SampleFormat::I16 => Some(1),
        cpal::SampleFormat::U16 => Some(2),
        _ => None,
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    chunks: Sender<Vec<f32>>,
    errors: Sender<CaptureError>,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            // The receiver goes away once the clip is full; later callbacks are dropped.
            let _ = chunks.send(downmix(data, channels));
        },
        move |err| {
            error!("An error occurred on the audio stream: {}", err);
            let _ = errors.try_send(err.into());
        },
        None,
    )?;

    Ok(stream)
}

/// Converts interleaved samples to mono f32 by averaging each frame.
fn downmix<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: Sample,
    f32: FromSample<T>,
{
    if channels <= 1 {
        return data.iter().map(|s| s.to_sample::<f32>()).collect();
    }

    data.chunks_exact(channels)
        .map(|frame| frame.iter().map(|s| s.to_sample::<f32>()).sum::<f32>() / channels as f32)
        .collect()
}

/// Accumulates callback chunks until `expected` samples have arrived.
fn collect_samples(
    chunks: &Receiver<Vec<f32>>,
    errors: &Receiver<CaptureError>,
    expected: usize,
    timeout: Duration,
) -> Result<Vec<f32>, CaptureError> {
    let deadline = Instant::now() + timeout;
    let mut samples = Vec::with_capacity(expected);

    while samples.len() < expected {
        let captured = samples.len();
        let remaining = deadline.saturating_duration_since(Instant::now());

        crossbeam_channel::select! {
            recv(chunks) -> msg => match msg {
                Ok(chunk) => {
                    let needed = expected - samples.len();
                    samples.extend(chunk.into_iter().take(needed));
                }
                Err(_) => return Err(CaptureError::Stalled { captured, expected }),
            },
            recv(errors) -> msg => match msg {
                Ok(err) => return Err(err),
                Err(_) => return Err(CaptureError::Stalled { captured, expected }),
            },
            default(remaining) => return Err(CaptureError::Stalled { captured, expected }),
        }
    }

    Ok(samples)
}
