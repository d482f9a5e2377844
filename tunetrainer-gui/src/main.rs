//! # TuneTrainer - Intonation Practice GUI
//!
//! This module contains the main GUI application for TuneTrainer. Pressing
//! Record captures a short clip from the microphone, estimates its pitch and
//! shows the nearest note with a sharp / flat / in-tune verdict.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Capture Thread**: One short-lived thread per Record press, running a blocking session
//! - **Communication**: A crossbeam channel carries the session outcome back
//! - **Updates**: A timer subscription polls the channel only while recording

mod ui;

use crossbeam_channel::{Receiver, TryRecvError};
use iced::{Element, Subscription, Theme};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tunetrainer_core::{
    Feedback, Microphone, Reading, Tone, TrainerSettings, TuneError,
    config::SETTINGS_FILE,
    session,
};
use ui::main_display::create_main_view;
use ui::waveform;

/// Interval at which a running capture is polled for its outcome.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main entry point for the TuneTrainer application.
pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting TuneTrainer...");
    let result = iced::application("TuneTrainer", TrainerApp::update, TrainerApp::view)
        .subscription(TrainerApp::subscription)
        .theme(TrainerApp::theme)
        .run();
    info!("Application finished with result: {:?}", result);
    result
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    Record,                  // Start one capture-then-display cycle
    DurationChanged(f32),    // Recording duration in seconds
    SampleRateSelected(u32), // Capture sample rate in Hz
    ToleranceChanged(f32),   // In-tune window in cents
    Tick,                    // Poll the running capture
}

/// UI-specific data needed for rendering the interface.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    pub settings: TrainerSettings,
    pub recording: bool,
    pub feedback: Feedback,
    /// Min/max envelope of the last successful recording.
    pub waveform: Option<Vec<(f32, f32)>>,
}

/// Main application state.
#[derive(Debug)]
struct TrainerApp {
    /// Outcome channel of the capture in progress, if any.
    outcome_receiver: Option<Receiver<Result<Reading, TuneError>>>,
    /// Settings the capture in progress was started with. Slider edits made
    /// meanwhile apply to the next press only.
    recording_settings: Option<TrainerSettings>,
    display_data: AppDisplayData,
}

impl Default for TrainerApp {
    fn default() -> Self {
        let settings = match TrainerSettings::load(SETTINGS_FILE) {
            Ok(settings) => {
                info!("Loaded settings from {}", SETTINGS_FILE);
                settings
            }
            Err(e) => {
                warn!("Using default settings: {:#}", e);
                TrainerSettings::default()
            }
        };

        Self {
            outcome_receiver: None,
            recording_settings: None,
            display_data: AppDisplayData {
                settings,
                recording: false,
                feedback: Feedback::idle(),
                waveform: None,
            },
        }
    }
}

impl TrainerApp {
    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) {
        match message {
            Message::Record => self.start_recording(),
            Message::DurationChanged(duration) => {
                self.display_data.settings.duration_secs = duration;
            }
            Message::SampleRateSelected(rate) => {
                self.display_data.settings.sample_rate = rate;
            }
            Message::ToleranceChanged(tolerance) => {
                self.display_data.settings.tolerance_cents = tolerance;
            }
            Message::Tick => self.poll_recording(),
        }
    }

    /// Spawns the capture thread for one Record press.
    ///
    /// A press while a capture is already running is ignored; the button is
    /// disabled in that state anyway.
    fn start_recording(&mut self) {
        if self.display_data.recording {
            return;
        }

        let settings = self.display_data.settings;
        let (outcome_tx, outcome_rx) = crossbeam_channel::bounded(1);

        thread::spawn(move || {
            let outcome = session::run(&mut Microphone, &settings);
            if let Err(e) = &outcome {
                warn!("Recording session failed: {}", e);
            }
            let _ = outcome_tx.send(outcome);
        });

        self.outcome_receiver = Some(outcome_rx);
        self.recording_settings = Some(settings);
        self.display_data.recording = true;
    }

    /// Picks up the outcome of the running capture once it is available.
    fn poll_recording(&mut self) {
        let Some(receiver) = &self.outcome_receiver else {
            return;
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                error!("Capture thread ended without a result");
                self.finish_recording();
                self.display_data.feedback = Feedback {
                    headline: "Recording stopped unexpectedly. Press Record to try again.".to_string(),
                    tone: Tone::Error,
                    ..Feedback::idle()
                };
                return;
            }
        };

        self.display_data.feedback = Feedback::from_outcome(&outcome);
        self.display_data.waveform = outcome
            .as_ref()
            .ok()
            .map(|reading| waveform::envelope(reading.buffer.samples(), waveform::COLUMNS));

        if let (Ok(_), Some(settings)) = (&outcome, self.recording_settings) {
            if let Err(e) = settings.save(SETTINGS_FILE) {
                warn!("Error saving settings: {:#}", e);
            }
        }

        self.finish_recording();
    }

    fn finish_recording(&mut self) {
        self.outcome_receiver = None;
        self.recording_settings = None;
        self.display_data.recording = false;
    }

    /// Renders the main application interface.
    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    /// Polls for the capture outcome only while a capture is running.
    fn subscription(&self) -> Subscription<Message> {
        if self.display_data.recording {
            iced::time::every(POLL_INTERVAL).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
