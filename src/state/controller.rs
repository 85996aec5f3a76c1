/// Interaction controller
///
/// `Studio` owns the edit session, the history and the prompt text, and is
/// the only place they change. Every user intent (upload, generate, pick a
/// history entry, reset) is one method here.
///
/// Generating is split in two halves so the GUI can run the network call in
/// the background: [`Studio::begin_generate`] checks the guard and hands out
/// a [`GenerateRequest`], and [`Studio::finish_generate`] applies the result
/// once the call returns. At most one request is outstanding at a time.

use super::edit::EditSession;
use super::history::{HistoryBuffer, HistoryEntry, HistoryId};
use super::image::ImagePayload;
use crate::pipeline::EditFailure;
use tracing::{debug, info, warn};

/// Coarse state of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No photo uploaded
    Idle,
    /// Photo present, nothing in flight
    Ready,
    /// An edit request is in flight
    Busy,
}

/// Everything needed for one call to the image pipeline
///
/// Issued by [`Studio::begin_generate`] and handed back to
/// [`Studio::finish_generate`] together with the call's result.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    original: ImagePayload,
    prompt: String,
    /// Session epoch the request was issued in
    epoch: u64,
}

impl GenerateRequest {
    pub fn original(&self) -> &ImagePayload {
        &self.original
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Application-level state: session, history and prompt
#[derive(Debug)]
pub struct Studio {
    session: EditSession,
    history: HistoryBuffer,
    prompt: String,
    /// Bumped whenever the session is replaced behind an in-flight request
    epoch: u64,
    /// A pipeline call has been issued and has not reported back yet
    in_flight: bool,
}

impl Studio {
    pub fn new() -> Self {
        Self {
            session: EditSession::default(),
            history: HistoryBuffer::new(),
            prompt: String::new(),
            epoch: 0,
            in_flight: false,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn phase(&self) -> Phase {
        if self.session.is_busy() {
            Phase::Busy
        } else if self.session.original().is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Use `image` as the new source photo. Ignored while a request is in
    /// flight; returns whether the upload was applied.
    pub fn upload(&mut self, image: ImagePayload) -> bool {
        if self.session.is_busy() {
            debug!("Upload ignored while an edit is in progress");
            return false;
        }

        info!("📷 New source image ({} bytes, {})", image.len(), image.mime());
        self.session.upload(image);
        true
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Whether [`Studio::begin_generate`] would issue a request right now
    pub fn can_generate(&self) -> bool {
        self.session.original().is_some()
            && !self.prompt.is_empty()
            && !self.session.is_busy()
            && !self.in_flight
    }

    /// Start an edit if the guard allows it.
    ///
    /// Returns `None` (and changes nothing) when there is no photo, the
    /// prompt is empty, or a request is already outstanding.
    pub fn begin_generate(&mut self) -> Option<GenerateRequest> {
        if !self.can_generate() {
            debug!("Generate ignored: guard not satisfied");
            return None;
        }

        let original = self.session.original()?.clone();
        let prompt = self.prompt.clone();

        self.session.begin_generate();
        self.in_flight = true;
        info!("✨ Generating outfit: \"{}\"", prompt);

        Some(GenerateRequest {
            original,
            prompt,
            epoch: self.epoch,
        })
    }

    /// Apply the outcome of a request issued by [`Studio::begin_generate`].
    ///
    /// If the session was reset or replaced by a history entry while the
    /// request was running, the outcome is dropped.
    pub fn finish_generate(&mut self, request: GenerateRequest, result: Result<ImagePayload, EditFailure>) {
        self.in_flight = false;

        if request.epoch != self.epoch {
            debug!("Discarding result of a request from a previous session");
            return;
        }

        match result {
            Ok(modified) => {
                self.session.complete_generate(modified.clone());
                let entry = HistoryEntry::new(request.original, modified, request.prompt);
                info!("✅ Outfit generated, saved to history as {}", entry.id());
                self.history.record(entry);
            }
            Err(failure) => {
                warn!("❌ Outfit generation failed: {}", failure);
                self.session.fail_generate(failure.user_message());
            }
        }
    }

    /// Show a past edit. Returns `false` if no entry has that id.
    pub fn select_history(&mut self, id: HistoryId) -> bool {
        let Some(entry) = self.history.get(id) else {
            return false;
        };

        let (original, modified) = (entry.original().clone(), entry.modified().clone());
        self.session.adopt(original, modified);
        self.epoch += 1;
        info!("🕘 Showing history entry {}", id);
        true
    }

    /// Clear the session and prompt. History is kept.
    pub fn reset(&mut self) {
        self.session.reset();
        self.prompt.clear();
        self.epoch += 1;
        info!("🔄 Session reset");
    }

    /// Forget every history entry. The current session is left alone.
    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("🧹 History cleared");
    }
}
