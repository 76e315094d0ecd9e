use iced::widget::{button, column, container, text, Column};
use iced::{Alignment, Element, Length};

use crate::{Message, Route};

/// Start screen: title and a way into the canvas
pub fn view(status: &str) -> Element<'_, Message> {
    let content: Column<Message> = column![
        text("Layer Canvas").size(48),
        text("Drop images on a canvas, then move, reorder and resize them.").size(16),
        button("Open Canvas")
            .on_press(Message::Navigate(Route::Canvas))
            .padding(10),
        text(status).size(14),
    ]
    .spacing(20)
    .padding(40)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
