//! # UI Module
//!
//! This module contains all UI components for the TuneTrainer application.

pub mod cent_meter;
pub mod main_display;
pub mod waveform;
