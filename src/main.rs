use iced::widget::{column, container, row};
use iced::{Element, Length, Task, Theme};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod files;
mod pipeline;
mod state;
mod ui;

use config::StudioConfig;
use pipeline::{EditFailure, GeminiPipeline, ImagePipeline};
use state::controller::{GenerateRequest, Studio};
use state::history::HistoryId;
use state::image::ImagePayload;

/// Shown when a picked photo arrives while an edit is still running
const UPLOAD_WHILE_BUSY_NOTICE: &str = "Upload ignored while an edit is in progress";

/// Main application state
struct FashionStudio {
    /// Session, history and prompt
    studio: Studio,
    /// Service that performs the outfit edits
    pipeline: Arc<dyn ImagePipeline>,
    /// Problem with the last photo the user picked
    notice: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User asked to choose a photo
    PickImage,
    /// Background file load finished
    ImageLoaded(Result<ImagePayload, String>),
    /// Prompt text edited
    PromptChanged(String),
    /// One of the quick suggestions was clicked
    SuggestionPicked(&'static str),
    /// User clicked "Generate Outfit"
    Generate,
    /// The edit request came back
    GenerateFinished(GenerateRequest, Result<ImagePayload, EditFailure>),
    /// A history card was clicked
    SelectHistory(HistoryId),
    /// User clicked "Clear" above the history
    ClearHistory,
    /// User clicked "Reset"
    Reset,
}

impl FashionStudio {
    fn new(pipeline: Arc<dyn ImagePipeline>) -> (Self, Task<Message>) {
        info!("👗 Fashion Studio ready");

        (
            FashionStudio {
                studio: Studio::new(),
                pipeline,
                notice: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                if self.studio.session().is_busy() {
                    return Task::none();
                }

                // Show the native file picker
                if let Some(path) = files::pick_image() {
                    return Task::perform(files::load_image(path), |result| {
                        Message::ImageLoaded(result.map_err(|e| e.to_string()))
                    });
                }

                Task::none()
            }
            Message::ImageLoaded(Ok(image)) => {
                self.notice = if self.studio.upload(image) {
                    None
                } else {
                    Some(UPLOAD_WHILE_BUSY_NOTICE.to_string())
                };
                Task::none()
            }
            Message::ImageLoaded(Err(e)) => {
                warn!("⚠️  Could not load image: {}", e);
                self.notice = Some(e);
                Task::none()
            }
            Message::PromptChanged(prompt) => {
                self.studio.set_prompt(prompt);
                Task::none()
            }
            Message::SuggestionPicked(suggestion) => {
                self.studio.set_prompt(suggestion);
                Task::none()
            }
            Message::Generate => {
                let Some(request) = self.studio.begin_generate() else {
                    return Task::none();
                };

                let pipeline = Arc::clone(&self.pipeline);
                Task::perform(
                    async move {
                        let result = pipeline.edit(request.original(), request.prompt()).await;
                        (request, result)
                    },
                    |(request, result)| Message::GenerateFinished(request, result),
                )
            }
            Message::GenerateFinished(request, result) => {
                self.studio.finish_generate(request, result);
                Task::none()
            }
            Message::SelectHistory(id) => {
                if self.studio.select_history(id) {
                    self.notice = None;
                }
                Task::none()
            }
            Message::ClearHistory => {
                self.studio.clear_history();
                Task::none()
            }
            Message::Reset => {
                self.studio.reset();
                self.notice = None;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body = row![
            container(ui::editor::view(&self.studio, self.notice.as_deref()))
                .width(Length::FillPortion(2)),
            container(ui::history::view(self.studio.history()))
                .width(Length::FillPortion(1)),
        ]
        .spacing(32)
        .padding(24);

        column![ui::header(), body]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default: this crate at info)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fashion_studio=info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = StudioConfig::load_or_default();
    info!("⚙️  Using model {} at {}", config.model, config.base_url);

    let pipeline: Arc<dyn ImagePipeline> = match GeminiPipeline::new(&config) {
        Ok(pipeline) => Arc::new(pipeline),
        Err(e) => {
            error!("❌ Could not create the image service client: {}", e);
            return Err(e.into());
        }
    };

    iced::application("Fashion Studio", FashionStudio::update, FashionStudio::view)
        .theme(FashionStudio::theme)
        .centered()
        .run_with(move || FashionStudio::new(Arc::clone(&pipeline)))?;

    Ok(())
}
