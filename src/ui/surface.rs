use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program, Stroke};
use iced::widget::{image, stack, Canvas};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Theme};

use crate::state::gesture::Gesture;
use crate::state::layer::Pos;
use crate::state::session::CanvasSession;
use crate::Message;

/// Pointer input in canvas-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos),
    Move(Pos),
    Up,
}

/// Input layer over the rendered canvas
///
/// The picture itself is a software-rendered frame shown by an image widget
/// underneath; this program only outlines the surface, picks the cursor and
/// turns mouse events into `PointerEvent`s.
pub struct Surface<'a> {
    pub session: &'a CanvasSession,
}

impl Program<Message> for Surface<'_> {
    type State = PressState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let outline = canvas::Path::rectangle(Point::ORIGIN, bounds.size());
        frame.stroke(
            &outline,
            Stroke::default()
                .with_color(Color::from_rgb(0.45, 0.45, 0.45))
                .with_width(1.0),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Press only counts inside the surface
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    state.is_pressed = true;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Pointer(PointerEvent::Down(to_pos(pos)))),
                    );
                }
            }

            // Release anywhere ends the gesture
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_pressed {
                    state.is_pressed = false;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Pointer(PointerEvent::Up)),
                    );
                }
            }

            // Keep tracking outside the bounds while the button is held
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.is_pressed {
                    let local = Point::new(position.x - bounds.x, position.y - bounds.y);
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Pointer(PointerEvent::Move(to_pos(local)))),
                    );
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.is_pressed {
            match self.session.gesture() {
                Gesture::Dragging { .. } => return mouse::Interaction::Grabbing,
                Gesture::Resizing { .. } => return mouse::Interaction::Crosshair,
                Gesture::Idle => {}
            }
        }

        let Some(pos) = cursor.position_in(bounds).map(to_pos) else {
            return mouse::Interaction::Idle;
        };

        let layers = self.session.layers();
        let hovered = layers
            .hit_test(pos, self.session.settings().hit_test_order)
            .and_then(|id| layers.get(id));

        match hovered {
            Some(layer) if layer.on_resize_handle(pos) => mouse::Interaction::Crosshair,
            Some(_) => mouse::Interaction::Grab,
            None => mouse::Interaction::Idle,
        }
    }
}

/// Whether the left button went down inside the surface
#[derive(Debug, Clone, Default)]
pub struct PressState {
    pub is_pressed: bool,
}

fn to_pos(p: Point) -> Pos {
    Pos::new(p.x, p.y)
}

/// The rendered frame with the input layer stacked on top, both at the
/// canvas's exact pixel size so pointer coordinates map 1:1.
pub fn view<'a>(session: &'a CanvasSession, frame: &image::Handle) -> Element<'a, Message> {
    let settings = session.settings();
    let width = Length::Fixed(settings.canvas_width as f32);
    let height = Length::Fixed(settings.canvas_height as f32);

    stack![
        image(frame.clone()).width(width).height(height),
        Canvas::new(Surface { session }).width(width).height(height),
    ]
    .into()
}
