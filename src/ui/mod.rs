/// User interface components
///
/// - editor.rs: canvas, prompt and generate controls
/// - history.rs: "Recent Creations" column

pub mod editor;
pub mod history;

use iced::widget::{button, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length};

use crate::Message;

/// Top bar with the app name and the Reset action
pub fn header<'a>() -> Element<'a, Message> {
    container(
        row![
            text("Fashion Studio").size(24),
            horizontal_space(),
            button(text("Reset").size(14))
                .on_press(Message::Reset)
                .style(button::text),
        ]
        .align_y(Alignment::Center),
    )
    .padding([12, 24])
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}
