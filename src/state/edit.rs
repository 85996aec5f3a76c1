/// Live edit session: the photo being worked on and the latest result
///
/// This is the single source of truth for what the canvas renders.
/// It performs no validation of its own; the controller in
/// `controller.rs` decides which transitions are allowed.

use super::image::ImagePayload;

/// Current original/modified pair plus request status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    /// The source photo
    original: Option<ImagePayload>,
    /// Latest successful edit of `original`
    modified: Option<ImagePayload>,
    /// An edit request is in flight
    busy: bool,
    /// Message from the most recent failed edit
    error: Option<String>,
}

impl EditSession {
    /// Replace the source photo; any previous result and error go away
    pub fn upload(&mut self, image: ImagePayload) {
        self.original = Some(image);
        self.modified = None;
        self.error = None;
    }

    /// Mark an edit request as started
    pub fn begin_generate(&mut self) {
        self.busy = true;
        self.error = None;
    }

    /// Store a successful edit result
    pub fn complete_generate(&mut self, result: ImagePayload) {
        self.modified = Some(result);
        self.busy = false;
    }

    /// Record a failed edit. A previous result stays on screen.
    pub fn fail_generate(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.error = Some(message.into());
    }

    /// Back to the initial, empty state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Show a past edit (used when a history entry is selected)
    pub fn adopt(&mut self, original: ImagePayload, modified: ImagePayload) {
        self.original = Some(original);
        self.modified = Some(modified);
        self.busy = false;
        self.error = None;
    }

    pub fn original(&self) -> Option<&ImagePayload> {
        self.original.as_ref()
    }

    pub fn modified(&self) -> Option<&ImagePayload> {
        self.modified.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The image the canvas should show: the result if there is one,
    /// otherwise the source photo
    pub fn displayed(&self) -> Option<&ImagePayload> {
        self.modified.as_ref().or(self.original.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> ImagePayload {
        ImagePayload::new("image/png", name.as_bytes().to_vec())
    }

    #[test]
    fn test_default_is_empty() {
        let session = EditSession::default();
        assert!(session.original().is_none());
        assert!(session.modified().is_none());
        assert!(!session.is_busy());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_upload_clears_result_and_error() {
        let mut session = EditSession::default();
        session.upload(png("a.png"));
        session.begin_generate();
        session.complete_generate(png("a_edit.png"));
        session.begin_generate();
        session.fail_generate("boom");

        session.upload(png("b.png"));

        assert_eq!(session.original(), Some(&png("b.png")));
        assert!(session.modified().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_begin_generate_clears_error() {
        let mut session = EditSession::default();
        session.upload(png("a.png"));
        session.begin_generate();
        session.fail_generate("boom");

        session.begin_generate();

        assert!(session.is_busy());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_failure_preserves_previous_result() {
        let mut session = EditSession::default();
        session.upload(png("a.png"));
        session.begin_generate();
        session.complete_generate(png("a_edit.png"));

        session.begin_generate();
        session.fail_generate("quota exceeded");

        assert!(!session.is_busy());
        assert_eq!(session.modified(), Some(&png("a_edit.png")));
        assert_eq!(session.error(), Some("quota exceeded"));
        assert_eq!(session.displayed(), Some(&png("a_edit.png")));
    }

    #[test]
    fn test_adopt_and_reset() {
        let mut session = EditSession::default();
        session.upload(png("a.png"));
        session.begin_generate();

        session.adopt(png("h.png"), png("h_edit.png"));
        assert_eq!(session.original(), Some(&png("h.png")));
        assert_eq!(session.modified(), Some(&png("h_edit.png")));
        assert!(!session.is_busy());

        session.reset();
        assert_eq!(session, EditSession::default());
    }
}
