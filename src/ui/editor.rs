/// Editor column: the image canvas and the outfit controls
use iced::widget::{button, column, container, horizontal_space, image, row, stack, text, text_input};
use iced::{Alignment, Color, ContentFit, Element, Length, Theme};
use iced_aw::Wrap;

use crate::state::controller::{Phase, Studio};
use crate::state::edit::EditSession;
use crate::Message;

/// Quick prompts offered under the text field
pub const SUGGESTIONS: [&str; 6] = [
    "Modern Space Suit",
    "Traditional Vietnamese Ao Dai",
    "Classic Tuxedo",
    "Superhero Cape & Armor",
    "Summer Beachwear",
    "Steampunk Gear",
];

const CANVAS_HEIGHT: f32 = 480.0;

/// Build the editor column. `notice` is an app-level message such as a
/// failed file load.
pub fn view<'a>(studio: &'a Studio, notice: Option<&'a str>) -> Element<'a, Message> {
    let session = studio.session();

    let mut image_side = column![
        text(caption(studio)).size(13).style(text::secondary),
        canvas(session),
    ]
    .spacing(12);

    if session.original().is_some() && !session.is_busy() {
        image_side = image_side.push(
            row![
                text("Original image selected").size(12),
                horizontal_space(),
                button(text("Change Image").size(12))
                    .on_press(Message::PickImage)
                    .style(button::text),
            ]
            .align_y(Alignment::Center),
        );
    }

    if let Some(notice) = notice {
        image_side = image_side.push(text(notice).size(12).style(text::danger));
    }

    column![
        row![
            image_side.width(Length::FillPortion(1)),
            controls(studio).width(Length::FillPortion(1)),
        ]
        .spacing(24),
        tip(),
    ]
    .spacing(24)
    .into()
}

fn caption(studio: &Studio) -> &'static str {
    match studio.phase() {
        Phase::Idle => "START HERE",
        _ if studio.session().modified().is_some() => "MODIFIED RESULT",
        _ => "SOURCE IMAGE",
    }
}

/// The picture itself, or an upload prompt when there is nothing to show
fn canvas(session: &EditSession) -> Element<'_, Message> {
    let picture: Element<Message> = match session.displayed() {
        Some(payload) => image(payload.handle().clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => button(
            column![
                text("Upload a photo to begin").size(18),
                text("Portrait or full body shots work best")
                    .size(13)
                    .style(text::secondary),
            ]
            .spacing(6)
            .align_x(Alignment::Center),
        )
        .on_press(Message::PickImage)
        .padding(40)
        .style(button::text)
        .into(),
    };

    let framed = container(picture)
        .center_x(Length::Fill)
        .center_y(Length::Fixed(CANVAS_HEIGHT))
        .style(container::rounded_box);

    if !session.is_busy() {
        return framed.into();
    }

    let overlay = container(
        column![
            text("Tailoring your outfit...").size(20),
            text("This takes about 10-15 seconds").size(13),
        ]
        .spacing(8)
        .align_x(Alignment::Center),
    )
    .center_x(Length::Fill)
    .center_y(Length::Fixed(CANVAS_HEIGHT))
    .style(|_theme: &Theme| container::Style {
        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.7).into()),
        text_color: Some(Color::WHITE),
        ..container::Style::default()
    });

    stack![framed, overlay].into()
}

/// Prompt field, suggestion chips, generate button and the last error
fn controls(studio: &Studio) -> iced::widget::Column<'_, Message> {
    let session = studio.session();

    let prompt = text_input(
        "e.g., A stylish neon cyberpunk leather jacket with glowing trims, black cargo pants, and futuristic sneakers.",
        studio.prompt(),
    )
    .on_input(Message::PromptChanged)
    .on_submit(Message::Generate)
    .padding(12);

    let chips: Vec<Element<Message>> = SUGGESTIONS
        .iter()
        .map(|tag| {
            button(text(*tag).size(12))
                .on_press(Message::SuggestionPicked(*tag))
                .padding([6, 12])
                .style(button::secondary)
                .into()
        })
        .collect();

    let label = if session.is_busy() {
        "Processing..."
    } else {
        "Generate Outfit"
    };

    let generate = button(container(text(label).size(16)).center_x(Length::Fill))
        .on_press_maybe(studio.can_generate().then_some(Message::Generate))
        .width(Length::Fill)
        .padding(16)
        .style(button::primary);

    let mut controls = column![
        text("Describe the new outfit").size(14),
        prompt,
        text("QUICK SUGGESTIONS").size(12).style(text::secondary),
        Wrap::with_elements(chips).spacing(8.0).line_spacing(8.0),
        generate,
    ]
    .spacing(16);

    if let Some(error) = session.error() {
        controls = controls.push(
            container(text(error).size(13).style(text::danger)).center_x(Length::Fill),
        );
    }

    controls
}

fn tip<'a>() -> Element<'a, Message> {
    container(
        text(
            "Pro Tip: For the best results, use a high-quality photo of one person facing the camera. \
             Mention specific colors and materials in your description to guide the AI better.",
        )
        .size(12),
    )
    .padding(16)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}
