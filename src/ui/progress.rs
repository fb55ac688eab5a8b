/// Segmented progress bar across the top of the viewer
/// One segment per story, filled to that story's progress
use iced::mouse::{self, Cursor};
use iced::widget::canvas;
use iced::{Color, Point, Rectangle, Size};

use crate::Message;

/// Horizontal gap between segments
const GAP: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct ProgressStrip {
    /// Progress per story in 0..=100
    pub progress: Vec<f64>,
}

impl canvas::Program<Message> for ProgressStrip {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let count = self.progress.len();
        if count == 0 {
            return vec![frame.into_geometry()];
        }

        let height = bounds.height;
        let gaps = GAP * (count - 1) as f32;
        let segment_width = ((bounds.width - gaps) / count as f32).max(1.0);

        let track = Color::from_rgb(0.27, 0.27, 0.3);
        let fill = Color::WHITE;

        for (idx, &value) in self.progress.iter().enumerate() {
            let x = idx as f32 * (segment_width + GAP);
            frame.fill_rectangle(Point::new(x, 0.0), Size::new(segment_width, height), track);

            let filled = segment_width * (value.clamp(0.0, 100.0) / 100.0) as f32;
            if filled > 0.0 {
                frame.fill_rectangle(Point::new(x, 0.0), Size::new(filled, height), fill);
            }
        }

        vec![frame.into_geometry()]
    }

    /// Swallow presses on the bars so they don't reach the backdrop
    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(_)) if cursor.is_over(bounds) => {
                (canvas::event::Status::Captured, None)
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }
}
