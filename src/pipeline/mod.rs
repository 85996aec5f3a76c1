/// Boundary to the external image-editing service
///
/// The rest of the application only sees the [`ImagePipeline`] trait: hand
/// over the original photo and a prompt, get back an edited photo or an
/// [`EditFailure`]. One call is one attempt; there are no retries and no
/// partial results.

pub mod gemini;

use crate::state::image::ImagePayload;
use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiPipeline;

/// Shown when a failure carries no message of its own
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to generate new outfit. Please try again.";

/// Why an edit request produced no image
#[derive(Debug, Clone, Error)]
pub enum EditFailure {
    #[error("No API key configured. Set GEMINI_API_KEY and restart the app.")]
    MissingApiKey,

    /// Network-level failure (DNS, TLS, timeout, ...)
    #[error("Could not reach the image service: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("The request was blocked by the service ({0}). Try a different description.")]
    Blocked(String),

    /// The model answered, but without an image. Carries any text it sent instead.
    #[error("{0}")]
    NoImage(String),

    #[error("Invalid response from the image service: {0}")]
    InvalidResponse(String),
}

impl EditFailure {
    /// Text to show the user: the failure's own message, or
    /// [`DEFAULT_FAILURE_MESSAGE`] if it has none
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

// Kept as text so failures can travel inside GUI messages, which must be `Clone`
impl From<reqwest::Error> for EditFailure {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Something that can dress the person in `original` in the outfit
/// described by `prompt`
#[async_trait]
pub trait ImagePipeline: Send + Sync {
    async fn edit(&self, original: &ImagePayload, prompt: &str) -> Result<ImagePayload, EditFailure>;
}

/// In-memory pipeline that replays scripted answers and records every call
#[cfg(test)]
pub mod scripted {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct ScriptedPipeline {
        answers: Mutex<VecDeque<Result<ImagePayload, EditFailure>>>,
        calls: Mutex<Vec<(ImagePayload, String)>>,
    }

    impl ScriptedPipeline {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn succeed_with(self, image: ImagePayload) -> Self {
            self.push(Ok(image))
        }

        pub fn fail_with(self, failure: EditFailure) -> Self {
            self.push(Err(failure))
        }

        fn push(self, answer: Result<ImagePayload, EditFailure>) -> Self {
            self.answers.lock().unwrap().push_back(answer);
            self
        }

        pub fn calls(&self) -> Vec<(ImagePayload, String)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImagePipeline for ScriptedPipeline {
        async fn edit(&self, original: &ImagePayload, prompt: &str) -> Result<ImagePayload, EditFailure> {
            self.calls
                .lock()
                .unwrap()
                .push((original.clone(), prompt.to_string()));
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(EditFailure::NoImage(String::new())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_message_is_verbatim() {
        let failure = EditFailure::Service {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(failure.user_message(), "quota exceeded");
    }

    #[test]
    fn test_default_message_when_none_given() {
        assert_eq!(EditFailure::NoImage(String::new()).user_message(), DEFAULT_FAILURE_MESSAGE);
        assert_eq!(EditFailure::NoImage("  ".to_string()).user_message(), DEFAULT_FAILURE_MESSAGE);
        assert_eq!(
            EditFailure::Service { status: 500, message: String::new() }.user_message(),
            DEFAULT_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_model_text_is_surfaced() {
        let failure = EditFailure::NoImage("I can only edit photos that show a person.".to_string());
        assert_eq!(failure.user_message(), "I can only edit photos that show a person.");
    }
}
