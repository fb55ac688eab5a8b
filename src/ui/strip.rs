use iced::widget::{button, column, container, image, row, scrollable, text, Row};
use iced::{Alignment, Border, Color, ContentFit, Element, Length};

use super::ImageCache;
use crate::state::data::Story;
use crate::Message;

/// Diameter of a thumbnail
const THUMB_SIZE: f32 = 72.0;

const UNSEEN_RING: Color = Color::from_rgb(0.23, 0.51, 0.96);
const SEEN_RING: Color = Color::from_rgb(0.61, 0.64, 0.69);

/// Horizontal row: upload button followed by one thumbnail per story
pub fn view<'a>(stories: &'a [Story], images: &'a ImageCache) -> Element<'a, Message> {
    let upload = button(
        container(text("+").size(32))
            .width(THUMB_SIZE)
            .height(THUMB_SIZE)
            .center_x(THUMB_SIZE)
            .center_y(THUMB_SIZE)
            .style(|_theme| ring(Color::from_rgb(0.5, 0.5, 0.5))),
    )
    .on_press(Message::Upload)
    .padding(0)
    .style(button::text);

    let thumbnails = stories
        .iter()
        .enumerate()
        .map(|(idx, story)| thumbnail(idx, story, images));

    let strip: Row<Message> = row![upload]
        .extend(thumbnails)
        .spacing(16)
        .padding(16)
        .align_y(Alignment::Center);

    scrollable(strip)
        .direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::new()))
        .width(Length::Fill)
        .into()
}

fn thumbnail<'a>(idx: usize, story: &'a Story, images: &'a ImageCache) -> Element<'a, Message> {
    let face: Element<'a, Message> = match images.get(&story.id) {
        Some(handle) => image(handle.clone())
            .width(THUMB_SIZE)
            .height(THUMB_SIZE)
            .content_fit(ContentFit::Cover)
            .into(),
        None => text("?").size(24).into(),
    };

    let color = if story.seen { SEEN_RING } else { UNSEEN_RING };
    let open = button(
        container(face)
            .width(THUMB_SIZE)
            .height(THUMB_SIZE)
            .center_x(THUMB_SIZE)
            .center_y(THUMB_SIZE)
            .clip(true)
            .style(move |_theme| ring(color)),
    )
    .on_press(Message::Select(idx))
    .padding(0)
    .style(button::text);

    let delete = button(text("✖").size(12))
        .on_press(Message::Delete(story.id.clone()))
        .padding([2, 6])
        .style(button::danger);

    column![open, delete]
        .spacing(4)
        .align_x(Alignment::Center)
        .into()
}

fn ring(color: Color) -> container::Style {
    container::Style {
        border: Border {
            color,
            width: 2.0,
            radius: (THUMB_SIZE / 2.0).into(),
        },
        ..container::Style::default()
    }
}
