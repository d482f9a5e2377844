//! # Cent Meter Widget
//!
//! Visual cent deviation meter for the last recording. The shaded band in
//! the middle is the in-tune window; the needle shows how far the pitch was
//! from the nearest note, clamped to ±50 cents.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use tunetrainer_core::feedback::{METER_RANGE, meter_position};

/// Deviations beyond this are drawn in red, below it in yellow.
const WARNING_RANGE: f32 = 25.0;

/// Cent meter widget for displaying tuning accuracy.
pub struct CentMeter {
    /// Cent deviation of the last reading (None if no pitch detected)
    cents: Option<f32>,
    /// Half-width of the in-tune window in cents
    tolerance: f32,
}

impl CentMeter {
    pub fn new(cents: Option<f32>, tolerance: f32) -> Self {
        Self { cents, tolerance }
    }

    /// Creates the view element for the cent meter.
    pub fn view(self) -> Element<'static, super::super::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(60.0)),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for CentMeter {
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
        let to_x = |cents: f32| meter_position(cents) / (2.0 * METER_RANGE) * bounds.width;

        // Meter background
        let background = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&background, Color::from_rgb8(0x40, 0x40, 0x40));

        // In-tune window
        let band_start = to_x(-self.tolerance);
        let band = Path::rectangle(
            Point::new(band_start, 0.0),
            Size::new(to_x(self.tolerance) - band_start, bounds.height),
        );
        frame.fill(&band, Color::from_rgba8(0x34, 0xDB, 0x98, 0.25));

        // Center line
        let center_x = bounds.width / 2.0;
        let center_line = Path::line(
            Point::new(center_x, 0.0),
            Point::new(center_x, bounds.height),
        );
        frame.stroke(
            &center_line,
            Stroke::default()
                .with_width(2.0)
                .with_color(Color::WHITE),
        );

        if let Some(c) = self.cents {
            let color = if c.abs() <= self.tolerance {
                Color::from_rgb8(0x34, 0xDB, 0x98) // Green
            } else if c.abs() < WARNING_RANGE {
                Color::from_rgb8(0xFF, 0xC3, 0x00) // Yellow
            } else {
                Color::from_rgb8(0xFF, 0x33, 0x33) // Red
            };

            let needle_pos = to_x(c);
            let needle =
                Path::rectangle(Point::new(needle_pos - 2.0, 0.0), Size::new(4.0, bounds.height));
            frame.fill(&needle, color);
        }

        vec![frame.into_geometry()]
    }
}
