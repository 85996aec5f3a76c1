/// "Recent Creations" column listing the session history
use chrono::Local;
use iced::widget::{button, column, container, horizontal_space, image, row, scrollable, text, Column};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::history::{HistoryBuffer, HistoryEntry, HISTORY_CAPACITY};
use crate::Message;

pub fn view(history: &HistoryBuffer) -> Element<'_, Message> {
    let body: Element<Message> = if history.is_empty() {
        container(
            column![
                text("No creations yet").size(14),
                text("Generated outfits will appear here for your session.")
                    .size(12)
                    .style(text::secondary),
            ]
            .spacing(4)
            .align_x(Alignment::Center),
        )
        .padding(24)
        .center_x(Length::Fill)
        .center_y(Length::Fixed(240.0))
        .style(container::bordered_box)
        .into()
    } else {
        scrollable(Column::with_children(history.iter().map(card)).spacing(12))
            .height(Length::Fill)
            .into()
    };

    let title = row![
        text("Recent Creations").size(20),
        text(format!("{}/{}", history.len(), HISTORY_CAPACITY))
            .size(12)
            .style(text::secondary),
        horizontal_space(),
        button(text("Clear").size(12))
            .on_press_maybe((!history.is_empty()).then_some(Message::ClearHistory))
            .style(button::text),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    column![title, body].spacing(16).into()
}

/// One clickable history entry
fn card(entry: &HistoryEntry) -> Element<'_, Message> {
    let thumbnail = image(entry.modified().handle().clone())
        .width(Length::Fixed(80.0))
        .height(Length::Fixed(112.0))
        .content_fit(ContentFit::Cover);

    let created = entry.created_at().with_timezone(&Local).format("%H:%M:%S");

    let details = column![
        text(entry.prompt()).size(14),
        text(format!("Created at {}", created)).size(11).style(text::secondary),
        text("VIEW RESULT").size(10).style(text::primary),
    ]
    .spacing(6);

    button(row![thumbnail, details].spacing(12).align_y(Alignment::Center))
        .on_press(Message::SelectHistory(entry.id()))
        .width(Length::Fill)
        .padding(10)
        .style(button::secondary)
        .into()
}
