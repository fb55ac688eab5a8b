use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Program};
use iced::{Point, Rectangle, Renderer, Theme};

use crate::Message;

/// Invisible layer over the story image that turns presses into
/// pause/resume and horizontal drags into swipes
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureLayer;

impl Program<Message> for GestureLayer {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        _renderer: &Renderer,
        _theme: &Theme,
        _bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        // Nothing to paint, the image underneath shows through
        vec![]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse button press - pause and start tracking the drag
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_over(bounds) {
                    state.press(pos, None);
                    return (canvas::event::Status::Captured, Some(Message::PointerDown));
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.is_dragging() && state.finger.is_none() {
                    state.last_position = Some(position);
                }
            }

            // Mouse button release - resume and report the horizontal offset
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.finger.is_none() {
                    if let Some(offset_x) = state.release(cursor.position()) {
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::PointerUp { offset_x }),
                        );
                    }
                }
            }

            canvas::Event::Touch(touch::Event::FingerPressed { id, position }) => {
                if !state.is_dragging() && bounds.contains(position) {
                    state.press(position, Some(id));
                    return (canvas::event::Status::Captured, Some(Message::PointerDown));
                }
            }

            canvas::Event::Touch(touch::Event::FingerMoved { id, position }) => {
                if state.finger == Some(id) {
                    state.last_position = Some(position);
                }
            }

            canvas::Event::Touch(
                touch::Event::FingerLifted { id, position } | touch::Event::FingerLost { id, position },
            ) => {
                if state.finger == Some(id) {
                    if let Some(offset_x) = state.release(Some(position)) {
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::PointerUp { offset_x }),
                        );
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub origin: Option<Point>,
    pub last_position: Option<Point>,
    /// Touch that started the drag, `None` for the mouse
    pub finger: Option<touch::Finger>,
}

impl DragState {
    fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    fn press(&mut self, position: Point, finger: Option<touch::Finger>) {
        self.origin = Some(position);
        self.last_position = Some(position);
        self.finger = finger;
    }

    /// End the drag, returning the horizontal offset from the press point
    fn release(&mut self, position: Option<Point>) -> Option<f32> {
        let origin = self.origin.take()?;
        let end = position.or(self.last_position).unwrap_or(origin);
        self.last_position = None;
        self.finger = None;
        Some(end.x - origin.x)
    }
}
