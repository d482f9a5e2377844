//! # Main Display Module
//!
//! This module contains the layout of the TuneTrainer window: the output
//! area on the left and the settings sidebar with the Record button on the
//! right.

use iced::widget::{button, column, container, pick_list, row, slider, text, Space};
use iced::{Alignment, Background, Border, Color, Element, Length};
use tunetrainer_core::Tone;
use tunetrainer_core::config::{DURATION_RANGE, DURATION_STEP, SAMPLE_RATES};
use tunetrainer_core::feedback::Feedback;

use super::{cent_meter, waveform};
use crate::{AppDisplayData, Message};

const INSTRUCTIONS: &str = "Press Record and play or sing a single note. TuneTrainer shows the \
nearest note and whether you are sharp or flat. Minimize background noise for clearer results.";

/// Creates the complete main application view
pub fn create_main_view(data: &AppDisplayData) -> Element<'static, Message> {
    let title = text("TuneTrainer").size(28);

    let main_content = row![
        column![
            title,
            text(INSTRUCTIONS).size(14),
            Space::with_height(10),
            create_output_panel(data),
            create_waveform_panel(data),
        ]
        .width(Length::Fill)
        .spacing(10),
        Space::with_width(10),
        create_sidebar(data),
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Color cue for each feedback tone.
fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Idle => Color::from_rgb(0.7, 0.7, 0.7),
        Tone::InTune => Color::from_rgb8(0x34, 0xDB, 0x98),
        Tone::OffPitch => Color::from_rgb8(0xFF, 0xC3, 0x00),
        Tone::Warning => Color::from_rgb8(0xFF, 0x8C, 0x00),
        Tone::Error => Color::from_rgb8(0xFF, 0x33, 0x33),
    }
}

/// Creates the text / color output area for the last outcome.
fn create_output_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let content = if data.recording {
        column![
            text(format!(
                "Recording for {:.1} seconds...",
                data.settings.duration_secs
            ))
            .size(24)
            .color(tone_color(Tone::Idle))
        ]
    } else {
        feedback_column(&data.feedback)
    };

    let color = tone_color(if data.recording { Tone::Idle } else { data.feedback.tone });

    container(content.spacing(8).padding(15))
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            border: Border {
                color,
                width: 2.0,
                radius: 6.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

fn feedback_column(feedback: &Feedback) -> iced::widget::Column<'static, Message> {
    let color = tone_color(feedback.tone);
    let mut content = column![text(feedback.headline.clone()).size(24).color(color)];

    if let Some(status) = &feedback.status {
        content = content.push(text(status.clone()).size(20).color(color));
    }

    if let (Some(_), Some(tolerance)) = (feedback.meter, feedback.tolerance) {
        content = content
            .push(row![
                text("← flat").size(14),
                Space::with_width(Length::Fill),
                text("sharp →").size(14),
            ])
            .push(cent_meter::CentMeter::new(feedback.cents, tolerance).view());
    }

    feedback
        .details
        .iter()
        .fold(content, |col, line| col.push(text(line.clone()).size(14)))
}

/// Creates the waveform panel for the last successful recording.
fn create_waveform_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let Some(columns) = data.waveform.clone().filter(|_| !data.recording) else {
        return Space::with_height(0).into();
    };

    container(
        column![
            text("Waveform").size(18),
            waveform::Waveform::new(columns).view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(200.0))
    .into()
}

/// Creates the settings sidebar with the Record button.
fn create_sidebar(data: &AppDisplayData) -> Element<'static, Message> {
    let settings = data.settings;

    let sections = column![
        text("Settings").size(18),
        text(format!("Recording duration: {:.1} s", settings.duration_secs)).size(14),
        slider(DURATION_RANGE, settings.duration_secs, Message::DurationChanged).step(DURATION_STEP),
        text("Sample rate").size(14),
        pick_list(
            SAMPLE_RATES.to_vec(),
            Some(settings.sample_rate),
            Message::SampleRateSelected
        )
        .width(Length::Fill),
        text(format!("In-tune window: ±{:.0} cents", settings.tolerance_cents)).size(14),
        slider(1.0..=25.0, settings.tolerance_cents, Message::ToleranceChanged).step(1.0),
        Space::with_height(10),
        make_record_button(data.recording),
    ]
    .spacing(8);

    container(sections.padding(15))
        .width(Length::Fixed(250.0))
        .height(Length::Fill)
        .into()
}

/// Creates the large Record button.
///
/// Red and clickable while idle; gold and disabled while a capture runs, so
/// recordings never overlap.
fn make_record_button(recording: bool) -> Element<'static, Message> {
    let color = if recording {
        Color::from_rgb(1.0, 0.84, 0.0) // Gold
    } else {
        Color::from_rgb(0.8, 0.2, 0.2) // Red
    };
    let label = record_button_label(recording);

    button(text(label).size(18).width(Length::Fill))
        .padding([12, 20])
        .width(Length::Fill)
        .style(move |_theme, _status| button::Style {
            background: Some(Background::Color(color)),
            text_color: Color::WHITE,
            ..button::Style::default()
        })
        .on_press_maybe((!recording).then_some(Message::Record))
        .into()
}

fn record_button_label(recording: bool) -> &'static str {
    if recording { "Recording…" } else { "Record" }
}
