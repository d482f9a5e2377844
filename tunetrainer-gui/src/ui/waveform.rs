//! # Waveform Widget
//!
//! Draws the last recording as a min/max envelope, one vertical stroke per
//! column, so a few seconds of audio stay cheap to redraw.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Theme};

/// Number of envelope columns computed per recording.
pub const COLUMNS: usize = 600;

/// Reduces `samples` to at most `columns` (min, max) pairs.
pub fn envelope(samples: &[f32], columns: usize) -> Vec<(f32, f32)> {
    if samples.is_empty() || columns == 0 {
        return Vec::new();
    }

    let chunk_len = samples.len().div_ceil(columns);
    samples
        .chunks(chunk_len)
        .map(|chunk| {
            chunk.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            })
        })
        .collect()
}

/// Waveform widget for the recorded clip.
pub struct Waveform {
    columns: Vec<(f32, f32)>,
}

impl Waveform {
    pub fn new(columns: Vec<(f32, f32)>) -> Self {
        Self { columns }
    }

    pub fn view(self) -> Element<'static, super::super::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fill),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for Waveform {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        if !bounds.width.is_finite() || !bounds.height.is_finite() || self.columns.is_empty() {
            return vec![frame.into_geometry()];
        }

        // Scale so the loudest peak fills the panel
        let peak = self
            .columns
            .iter()
            .fold(0.0f32, |max, &(lo, hi)| max.max(lo.abs()).max(hi.abs()));
        if peak <= 0.0 {
            return vec![frame.into_geometry()];
        }

        let mid_y = bounds.height / 2.0;
        let scale = mid_y / peak;
        let column_width = bounds.width / self.columns.len() as f32;

        let envelope = Path::new(|builder| {
            for (i, &(lo, hi)) in self.columns.iter().enumerate() {
                let x = (i as f32 + 0.5) * column_width;
                builder.move_to(Point::new(x, mid_y - hi * scale));
                builder.line_to(Point::new(x, mid_y - lo * scale));
            }
        });

        frame.stroke(
            &envelope,
            Stroke::default()
                .with_width(column_width.max(1.0))
                .with_color(Color::from_rgb8(0x4A, 0x90, 0xE2)),
        );

        vec![frame.into_geometry()]
    }
}
