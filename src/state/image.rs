/// Image payloads that flow between the file picker, the edit session,
/// the history and the image-edit service.
///
/// A payload is immutable once built: the bytes live behind an `Arc` and the
/// display handle is created once, so cloning into the history or back into
/// the session never copies or re-decodes the picture.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use iced::widget::image::Handle;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while turning raw input into an [`ImagePayload`]
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("The selected file is not a supported image")]
    UnsupportedFormat,

    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// An encoded image (PNG, JPEG, ...) together with its MIME type
#[derive(Clone)]
pub struct ImagePayload {
    mime: Arc<str>,
    bytes: Arc<[u8]>,
    /// Ready-to-draw handle for the image widget
    handle: Handle,
}

impl ImagePayload {
    /// Wrap already-encoded bytes whose MIME type is known
    pub fn new(mime: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let mime: String = mime.into();
        let bytes: Vec<u8> = bytes.into();
        let handle = Handle::from_bytes(bytes.clone());

        Self {
            mime: Arc::from(mime),
            bytes: Arc::from(bytes),
            handle,
        }
    }

    /// Build a payload from file contents, detecting the format from the
    /// magic bytes rather than trusting the file extension
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        let format = image::guess_format(&bytes).map_err(|_| ImageError::UnsupportedFormat)?;
        Ok(Self::new(format.to_mime_type(), bytes))
    }

    /// Decode standard base64 image data whose MIME type is known
    pub fn from_base64(mime: impl Into<String>, data: &str) -> Result<Self, ImageError> {
        let bytes = BASE64.decode(data.trim())?;
        Ok(Self::new(mime, bytes))
    }

    /// The raw bytes as standard base64 (no URI header)
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Handle for `iced::widget::image`
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl PartialEq for ImagePayload {
    fn eq(&self, other: &Self) -> bool {
        self.mime == other.mime && self.bytes == other.bytes
    }
}

impl Eq for ImagePayload {}

// Printing a multi-megabyte byte array is never useful
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest valid PNG signature plus a few bytes of junk
    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_from_bytes_sniffs_mime() {
        let payload = ImagePayload::from_bytes(PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(payload.mime(), "image/png");
        assert_eq!(payload, ImagePayload::new("image/png", PNG_MAGIC));
    }

    #[test]
    fn test_from_bytes_rejects_text() {
        let result = ImagePayload::from_bytes(b"just some notes".to_vec());
        assert!(matches!(result, Err(ImageError::UnsupportedFormat)));
    }

    #[test]
    fn test_base64_encoding() {
        let payload = ImagePayload::new("image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0]);
        assert_eq!(payload.to_base64(), "/9j/4A==");

        let decoded = ImagePayload::from_base64("image/jpeg", "/9j/4A==\n").unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        assert!(matches!(
            ImagePayload::from_base64("image/png", "@@@"),
            Err(ImageError::Base64(_))
        ));
    }

    #[test]
    fn test_equality_ignores_handle() {
        let a = ImagePayload::new("image/png", b"cat.png".to_vec());
        let b = ImagePayload::new("image/png", b"cat.png".to_vec());
        let c = ImagePayload::new("image/jpeg", b"cat.png".to_vec());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
