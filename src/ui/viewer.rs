use iced::widget::{
    button, canvas, column, container, image, mouse_area, row, stack, text, Space,
};
use iced::{Alignment, Color, ContentFit, Element, Length};

use super::gesture::GestureLayer;
use super::progress::ProgressStrip;
use super::ImageCache;
use crate::state::data::Story;
use crate::Message;

/// Full-window modal showing the current story
///
/// Presses that no control captures fall through to the backdrop and close it.
pub fn view<'a>(
    story: &'a Story,
    progress: Vec<f64>,
    paused: bool,
    images: &'a ImageCache,
) -> Element<'a, Message> {
    let bars = canvas(ProgressStrip { progress })
        .width(Length::Fill)
        .height(4);

    let picture: Element<'a, Message> = match images.get(&story.id) {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
        None => container(text("Image unavailable"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    // Gestures sit on top so presses never reach the image
    let stage = stack![
        picture,
        canvas(GestureLayer).width(Length::Fill).height(Length::Fill),
    ]
    .width(Length::Fill)
    .height(Length::Fill);

    let arrow = |label: &'a str, message: Message| {
        button(text(label).size(32))
            .on_press(message)
            .padding(16)
            .style(button::text)
    };

    let close = button(text("✖").size(24))
        .on_press(Message::Close)
        .style(button::text);

    let status = text(if paused { "❚❚ Paused" } else { "" }).size(14);

    let body = column![
        bars,
        row![status, Space::with_width(Length::Fill), close]
            .align_y(Alignment::Center)
            .width(Length::Fill)
            .padding([4, 0]),
        row![arrow("←", Message::Prev), stage, arrow("→", Message::Next)]
            .align_y(Alignment::Center)
            .height(Length::Fill),
    ]
    .spacing(8)
    .padding(12)
    .align_x(Alignment::End);

    let backdrop = container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.9).into()),
            ..container::Style::default()
        });

    mouse_area(backdrop).on_press(Message::Close).into()
}
